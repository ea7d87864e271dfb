use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::warn;

use faultline_core::pipeline::AnalysisPipeline;
use faultline_graphs::{BlastRadius, blast_radius};

use super::OutputFormat;

#[derive(Args, Debug)]
pub struct BlastArgs {
    /// Path to a repository snapshot (JSON)
    pub snapshot: PathBuf,

    /// File key (or raw import specifier) to inspect
    pub file: String,

    /// Config file (default: faultline.toml next to the snapshot)
    #[arg(long, env = "FAULTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct BlastOutput<'a> {
    file: &'a str,
    #[serde(flatten)]
    radius: BlastRadius,
}

pub fn run(args: &BlastArgs) -> anyhow::Result<()> {
    let snapshot = super::load_snapshot(&args.snapshot)?;
    let config = super::load_config(args.config.as_deref(), &args.snapshot)?;
    let pipeline = AnalysisPipeline::new(config);
    let graph = pipeline.build_graph(&snapshot, &snapshot.file_list());

    if !graph.contains(&args.file) {
        warn!(file = %args.file, "Not a graph key; counting importers of the raw name");
    }
    let radius = blast_radius(&graph, &args.file);

    match args.format {
        OutputFormat::Json => super::print_json(&BlastOutput {
            file: &args.file,
            radius,
        })?,
        OutputFormat::Text => {
            println!(
                "{}: {} direct dependents ({:.1}% of files)",
                args.file, radius.blast_radius, radius.blast_radius_pct
            );
            for dep in &radius.direct_dependents {
                println!("  {dep}");
            }
        }
    }
    Ok(())
}
