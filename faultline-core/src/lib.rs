//! Faultline core library: architecture detection, layer inference,
//! analysis and stress propagation over a repository snapshot.
//!
//! The main entry point is [`pipeline::AnalysisPipeline`], which turns a
//! [`snapshot::RepoSnapshot`] into an [`pipeline::AnalysisReport`].

pub mod analyze;
pub mod config;
pub mod detect;
pub mod error;
pub mod layers;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod stress;
pub mod types;
