use super::AnalysisInput;

/// Common interface for all analyzers.
pub trait Analyzer: Send + Sync {
    type Output;

    /// Human-readable name for this analyzer.
    fn name(&self) -> &'static str;

    /// Run analysis. Analyzers are total: an empty result is a valid outcome.
    fn analyze(&self, input: &AnalysisInput<'_>) -> Vec<Self::Output>;
}
