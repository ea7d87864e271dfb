use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use faultline_core::pipeline::AnalysisPipeline;
use faultline_core::stress::{PropagationType, StressResult, StressVector, scenarios};
use faultline_core::types::Severity;

use super::{OutputFormat, StressFindings};

#[derive(Args, Debug)]
pub struct StressArgs {
    /// Path to a repository snapshot (JSON)
    pub snapshot: PathBuf,

    /// Config file (default: faultline.toml next to the snapshot)
    #[arg(long, env = "FAULTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog scenario to run (default: every applicable one)
    #[arg(long, conflicts_with = "layers")]
    pub scenario: Option<String>,

    /// Comma-separated target layers for an ad hoc vector
    #[arg(long, value_delimiter = ',')]
    pub layers: Option<Vec<String>>,

    /// Ad hoc vector severity (0.0-1.0)
    #[arg(long, default_value = "0.7", requires = "layers")]
    pub severity: f64,

    /// Ad hoc propagation mode: traffic, dependency, data or auth
    #[arg(long, default_value = "dependency", requires = "layers")]
    pub mode: String,

    /// Ad hoc vector name
    #[arg(long, default_value = "ad_hoc", requires = "layers")]
    pub name: String,

    /// Fail (exit 10) if any bottleneck is at or above this severity
    #[arg(long)]
    pub fail_on: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: &StressArgs) -> anyhow::Result<()> {
    let fail_on = args
        .fail_on
        .as_deref()
        .map(|s| Severity::parse(s).with_context(|| format!("Unknown severity '{s}' for --fail-on")))
        .transpose()?;

    let snapshot = super::load_snapshot(&args.snapshot)?;
    let config = super::load_config(args.config.as_deref(), &args.snapshot)?;
    let pipeline = AnalysisPipeline::new(config);
    let prepared = pipeline.prepare(&snapshot);

    let results = if let Some(layers) = &args.layers {
        let mode = PropagationType::parse(&args.mode)
            .with_context(|| format!("Unknown propagation mode '{}'", args.mode))?;
        let layers: Vec<&str> = layers.iter().map(String::as_str).collect();
        let vector = StressVector::ad_hoc(&args.name, &layers, args.severity, mode)?;
        pipeline.run_vectors(&prepared.context, &[vector])
    } else if let Some(name) = &args.scenario {
        let vector = scenarios::get(name).with_context(|| {
            let known: Vec<&str> = scenarios::catalog().iter().map(|v| v.name.as_str()).collect();
            format!("Unknown scenario '{name}' (known: {})", known.join(", "))
        })?;
        pipeline.run_vectors(&prepared.context, &[vector])
    } else {
        let vectors = pipeline.select_vectors(prepared.context.detection.architecture_type);
        pipeline.run_vectors(&prepared.context, &vectors)
    };

    match args.format {
        OutputFormat::Json => super::print_json(&results)?,
        OutputFormat::Text => print_text(&results),
    }

    if let Some(level) = fail_on {
        let count = count_at_or_above(&results, level);
        if count > 0 {
            return Err(StressFindings { level, count }.into());
        }
    }
    Ok(())
}

/// Bottlenecks in applicable results whose severity is `level` or worse.
pub fn count_at_or_above(results: &[StressResult], level: Severity) -> usize {
    results
        .iter()
        .filter(|r| r.is_applicable)
        .flat_map(|r| &r.bottlenecks)
        .filter(|b| b.severity <= level)
        .count()
}

fn print_text(results: &[StressResult]) {
    for r in results {
        if !r.is_applicable {
            println!("{}: not applicable ({})", r.stress, r.failure_mode);
            continue;
        }
        println!(
            "{}: {} files affected, confidence {:.2}",
            r.stress,
            r.affected_files.len(),
            r.confidence
        );
        println!("  failure mode: {}", r.failure_mode);
        if !r.impact_path.is_empty() {
            println!("  impact path:  {}", r.impact_path.join(" → "));
        }
        for b in &r.bottlenecks {
            println!("  [{}] {}: {}", b.severity, b.component, b.reason);
        }
        for rec in &r.recommendations {
            println!("  - {rec}");
        }
    }
}

#[cfg(test)]
mod tests {
    use faultline_core::stress::BottleneckAnalysis;
    use faultline_core::types::{ArchitectureType, TechStack};

    use super::*;

    fn result(applicable: bool, severities: &[Severity]) -> StressResult {
        let vector = StressVector::ad_hoc("x", &["api"], 0.5, PropagationType::Traffic).unwrap();
        let mut r = StressResult::not_applicable(&vector, ArchitectureType::BackendApi, TechStack::default(), String::new());
        r.is_applicable = applicable;
        r.bottlenecks = severities
            .iter()
            .map(|s| BottleneckAnalysis {
                component: "c".into(),
                reason: "r".into(),
                severity: *s,
                recommendation: "fix".into(),
                file_path: None,
            })
            .collect();
        r
    }

    #[test]
    fn fail_on_counts_at_or_above() {
        let results = vec![
            result(true, &[Severity::Critical, Severity::Medium]),
            result(false, &[Severity::Critical]),
            result(true, &[Severity::High]),
        ];
        assert_eq!(count_at_or_above(&results, Severity::Critical), 1);
        assert_eq!(count_at_or_above(&results, Severity::High), 2);
        assert_eq!(count_at_or_above(&results, Severity::Low), 3);
    }
}
