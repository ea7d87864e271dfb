// Architecture hypotheses and assumption inference.
//
// Both run over the same read-only view of a repository and are purely
// structural: path markers, layer sizes, graph metrics and detection output.

pub mod assumptions;
pub mod hypotheses;
pub mod traits;

use std::collections::BTreeMap;

use serde_json::Value;

use faultline_graphs::GraphMetrics;

use crate::detect::EvidenceIndex;
use crate::types::{ArchitectureDetection, Category, Layers};

pub use assumptions::{ASSUMPTION_RULES, Assumption, AssumptionAnalyzer, AssumptionRule};
pub use hypotheses::{HYPOTHESIS_RULES, Hypothesis, HypothesisAnalyzer, HypothesisRule, HypothesisScope};
pub use traits::Analyzer;

/// Structured evidence attached to a hypothesis or assumption.
pub type EvidenceMap = BTreeMap<String, Value>;

pub(crate) fn evidence<const N: usize>(pairs: [(&str, Value); N]) -> EvidenceMap {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Shared input for every analyzer.
#[derive(Debug)]
pub struct AnalysisInput<'a> {
    pub files: &'a [String],
    pub index: &'a EvidenceIndex,
    pub layers: &'a Layers,
    pub metrics: &'a GraphMetrics,
    pub detection: &'a ArchitectureDetection,
    lowered: Vec<String>,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(
        files: &'a [String],
        index: &'a EvidenceIndex,
        layers: &'a Layers,
        metrics: &'a GraphMetrics,
        detection: &'a ArchitectureDetection,
    ) -> Self {
        Self {
            files,
            index,
            layers,
            metrics,
            detection,
            lowered: files.iter().map(|f| f.to_lowercase()).collect(),
        }
    }

    pub fn category(&self) -> Category {
        self.detection.archetype
    }

    /// Case-insensitive substring over every file path.
    pub fn any_file_contains(&self, needle: &str) -> bool {
        self.lowered.iter().any(|f| f.contains(needle))
    }

    /// Original paths of files containing any of `needles`.
    pub fn files_containing(&self, needles: &[&str]) -> Vec<&'a str> {
        self.files
            .iter()
            .zip(&self.lowered)
            .filter(|(_, lower)| needles.iter().any(|n| lower.contains(n)))
            .map(|(file, _)| file.as_str())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use faultline_graphs::{DependencyGraph, GraphMetrics, compute_graph_metrics};

    use crate::detect::EvidenceIndex;
    use crate::layers::infer_layers;
    use crate::types::{ArchitectureDetection, ArchitectureType, Layers};

    /// Owned backing storage for an [`AnalysisInput`](super::AnalysisInput).
    pub struct Fixture {
        pub files: Vec<String>,
        pub index: EvidenceIndex,
        pub layers: Layers,
        pub metrics: GraphMetrics,
        pub detection: ArchitectureDetection,
    }

    impl Fixture {
        pub fn new(files: &[&str], architecture_type: ArchitectureType) -> Self {
            Self::with_graph(files, architecture_type, &DependencyGraph::new())
        }

        pub fn with_graph(files: &[&str], architecture_type: ArchitectureType, graph: &DependencyGraph) -> Self {
            let files: Vec<String> = files.iter().map(|f| (*f).to_string()).collect();
            let index = EvidenceIndex::new(&files, &[], &BTreeMap::new());
            let category = architecture_type.category();
            let layers = infer_layers(&files, category);
            let detection = ArchitectureDetection {
                architecture_type,
                archetype: category,
                ..ArchitectureDetection::default()
            };
            Self {
                files,
                index,
                layers,
                metrics: compute_graph_metrics(graph),
                detection,
            }
        }

        pub fn input(&self) -> super::AnalysisInput<'_> {
            super::AnalysisInput::new(&self.files, &self.index, &self.layers, &self.metrics, &self.detection)
        }
    }
}
