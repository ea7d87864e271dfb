use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use faultline_core::pipeline::AnalysisPipeline;
use faultline_core::render::{Renderer, enabled_renderers, renderer_for};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to a repository snapshot (JSON)
    pub snapshot: PathBuf,

    /// Config file (default: faultline.toml next to the snapshot)
    #[arg(long, env = "FAULTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format: markdown or json
    #[arg(long)]
    pub format: Option<String>,

    /// Write reports into this directory instead of printing one.
    /// Existing report files there are overwritten
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let snapshot = super::load_snapshot(&args.snapshot)?;
    let config = super::load_config(args.config.as_deref(), &args.snapshot)?;

    let renderers: Vec<Box<dyn Renderer>> = match &args.format {
        Some(name) => vec![
            renderer_for(name).with_context(|| format!("Unknown render format '{name}' (expected markdown or json)"))?,
        ],
        None => enabled_renderers(&config.renderers).context("Invalid [renderers] config")?,
    };

    let report = AnalysisPipeline::new(config).run(&snapshot);

    if let Some(dir) = &args.output {
        for renderer in &renderers {
            let path = renderer
                .write(&report, dir)
                .with_context(|| format!("{} rendering failed", renderer.name()))?;
            info!(renderer = renderer.name(), path = %path.display(), "Report written");
            println!("{}", path.display());
        }
        return Ok(());
    }

    let Some(renderer) = renderers.first() else {
        anyhow::bail!("No renderer enabled in config");
    };
    let content = renderer
        .render(&report)
        .with_context(|| format!("{} rendering failed", renderer.name()))?;
    println!("{content}");
    Ok(())
}
