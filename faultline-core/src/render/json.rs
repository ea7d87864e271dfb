// JSON renderer: produces `faultline-report.json`, the full report with a
// schema version on top.

use serde::Serialize;
use tracing::info;

use crate::error::{RenderError, Result};
use crate::pipeline::AnalysisReport;

use super::traits::Renderer;

pub const SCHEMA_VERSION: &str = "1";

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    version: &'static str,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

#[derive(Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn output_path(&self) -> &'static str {
        "faultline-report.json"
    }

    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let json = serde_json::to_string_pretty(&Envelope {
            version: SCHEMA_VERSION,
            report,
        })
        .map_err(|e| RenderError::Template(e.to_string()))?;
        info!(
            stress_results = report.stress_results.len(),
            bytes = json.len(),
            "JSON report rendered"
        );
        Ok(json)
    }
}
