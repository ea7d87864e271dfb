pub mod analyze;
pub mod blast;
pub mod scenarios;
pub mod stress;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use tracing::debug;

use faultline_core::config::{CONFIG_FILE_NAME, FaultlineConfig};
use faultline_core::snapshot::RepoSnapshot;
use faultline_core::types::Severity;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full analysis and render a report
    Analyze(analyze::AnalyzeArgs),
    /// Run one catalog scenario or an ad hoc stress vector
    Stress(stress::StressArgs),
    /// List the built-in stress scenarios
    Scenarios(scenarios::ScenariosArgs),
    /// Show the direct dependents of one file
    Blast(blast::BlastArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Analyze(args) => analyze::run(&args),
        Command::Stress(args) => stress::run(&args),
        Command::Scenarios(args) => scenarios::run(&args),
        Command::Blast(args) => blast::run(&args),
    }
}

/// Returned when `--fail-on` finds bottlenecks at or above its level.
#[derive(Debug)]
pub struct StressFindings {
    pub level: Severity,
    pub count: usize,
}

impl std::fmt::Display for StressFindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bottleneck(s) at or above {} severity", self.count, self.level)
    }
}

impl std::error::Error for StressFindings {}

/// Output format shared by the commands that print results.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<RepoSnapshot> {
    if !path.exists() {
        anyhow::bail!("Snapshot not found: {}", path.display());
    }
    RepoSnapshot::load(path).with_context(|| format!("Cannot load snapshot: {}", path.display()))
}

/// Explicit `--config`, else `faultline.toml` next to the snapshot, else
/// defaults.
pub fn load_config(explicit: Option<&Path>, snapshot: &Path) -> anyhow::Result<FaultlineConfig> {
    let candidate: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => snapshot
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|p| p.exists()),
    };
    match candidate {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            FaultlineConfig::load(&path).with_context(|| format!("Cannot load config: {}", path.display()))
        }
        None => Ok(FaultlineConfig::default()),
    }
}

pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Cannot serialize output")?);
    Ok(())
}
