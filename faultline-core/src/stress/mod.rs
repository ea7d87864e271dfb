// Stress scenarios and their propagation through the dependency graph.
//
// A stress test resolves a vector's target layers to start files, walks the
// traversal graph for the vector's propagation mode, and grades what it
// reached. Each run reads a shared `StressContext` and writes nothing back.

pub mod bottleneck;
pub mod engine;
pub mod models;
pub mod propagation;
pub mod scenarios;

pub use bottleneck::{BOTTLENECK_RULES, BottleneckRule, analyze_bottlenecks, build_recommendations};
pub use engine::{StressContext, confidence_for, run_stress_test};
pub use models::{BottleneckAnalysis, ImpactEvidence, PropagationType, StressResult, StressVector};
pub use propagation::{FileRole, StartResolution, propagate, resolve_start_files};
pub use scenarios::{catalog, get_applicable_scenarios};
