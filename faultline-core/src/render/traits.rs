use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::pipeline::AnalysisReport;

/// Common interface for report generators.
pub trait Renderer: Send + Sync {
    /// Human-readable name for this renderer.
    fn name(&self) -> &'static str;

    /// Output file name relative to the output directory.
    fn output_path(&self) -> &'static str;

    /// Generate the artifact content.
    fn render(&self, report: &AnalysisReport) -> Result<String>;

    /// Write the artifact under `out_dir`, replacing any previous run's
    /// file. Returns the written path.
    fn write(&self, report: &AnalysisReport, out_dir: &Path) -> Result<PathBuf> {
        let content = self.render(report)?;
        let output = out_dir.join(self.output_path());
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(RenderError::Io)?;
        }
        std::fs::write(&output, content).map_err(RenderError::Io)?;
        Ok(output)
    }
}
