use serde::{Deserialize, Serialize};

use faultline_graphs::EdgeDirection;

use crate::analyze::Assumption;
use crate::error::{AnalyzeError, Result};
use crate::types::{ArchitectureType, Severity, TechStack};

// ── Propagation type ───────────────────────────────────────────────

/// How stress travels through the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationType {
    Traffic,
    Dependency,
    Data,
    Auth,
}

impl PropagationType {
    pub const ALL: [Self; 4] = [Self::Traffic, Self::Dependency, Self::Data, Self::Auth];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Dependency => "dependency",
            Self::Data => "data",
            Self::Auth => "auth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s.to_ascii_lowercase())
    }

    /// Dependency failures flow from the imported file to its importers;
    /// everything else follows imports as declared.
    pub fn edge_direction(self) -> EdgeDirection {
        match self {
            Self::Dependency => EdgeDirection::Reverse,
            Self::Traffic | Self::Data | Self::Auth => EdgeDirection::Forward,
        }
    }
}

impl std::fmt::Display for PropagationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Stress vector ──────────────────────────────────────────────────

/// A named stress scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressVector {
    pub name: String,
    pub description: String,
    pub target_layers: Vec<String>,
    pub severity: f64,
    pub propagation_type: PropagationType,
    /// Types the scenario is meaningful for; `unknown` is a wildcard.
    pub architecture_types: Vec<ArchitectureType>,
    pub min_severity_threshold: f64,
}

impl StressVector {
    /// User-defined vector that applies to every architecture.
    pub fn ad_hoc(
        name: &str,
        target_layers: &[&str],
        severity: f64,
        propagation_type: PropagationType,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnalyzeError::InvalidVector("name must not be empty".into()).into());
        }
        if !(0.0..=1.0).contains(&severity) {
            return Err(AnalyzeError::InvalidVector(format!("severity must be in [0, 1], got {severity}")).into());
        }
        let layers: Vec<String> = target_layers
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if layers.is_empty() {
            return Err(AnalyzeError::InvalidVector(format!("'{name}' has no target layers")).into());
        }

        Ok(Self {
            name: name.to_string(),
            description: format!("Ad hoc {propagation_type} stress on {}", layers.join(", ")),
            target_layers: layers,
            severity,
            propagation_type,
            architecture_types: vec![ArchitectureType::Unknown],
            min_severity_threshold: 0.0,
        })
    }

    pub fn applies_to(&self, architecture: ArchitectureType) -> bool {
        self.architecture_types
            .iter()
            .any(|t| *t == architecture || *t == ArchitectureType::Unknown)
    }

    pub fn meets_threshold(&self) -> bool {
        self.severity >= self.min_severity_threshold
    }
}

impl AsRef<StressVector> for StressVector {
    fn as_ref(&self) -> &StressVector {
        self
    }
}

// ── Results ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleneckAnalysis {
    pub component: String,
    pub reason: String,
    pub severity: Severity,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Why an impacted file is in the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEvidence {
    pub file: String,
    pub layer: String,
    pub depth: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    pub stress: String,
    pub architecture_type: ArchitectureType,
    pub tech_stack: TechStack,
    pub is_applicable: bool,
    pub violated_assumptions: Vec<Assumption>,
    /// BFS order, capped.
    pub affected_files: Vec<String>,
    pub impact_path: Vec<String>,
    pub bottlenecks: Vec<BottleneckAnalysis>,
    pub failure_mode: String,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub safe_components: Vec<String>,
    pub evidence: Vec<ImpactEvidence>,
    pub severity: f64,
    pub propagation_type: PropagationType,
}

impl StressResult {
    /// Result for a vector that could not be run, with `failure_mode`
    /// carrying the diagnostic.
    pub fn not_applicable(
        vector: &StressVector,
        architecture_type: ArchitectureType,
        tech_stack: TechStack,
        diagnostic: String,
    ) -> Self {
        Self {
            stress: vector.name.clone(),
            architecture_type,
            tech_stack,
            is_applicable: false,
            violated_assumptions: Vec::new(),
            affected_files: Vec::new(),
            impact_path: Vec::new(),
            bottlenecks: Vec::new(),
            failure_mode: diagnostic,
            confidence: 0.0,
            recommendations: Vec::new(),
            safe_components: Vec::new(),
            evidence: Vec::new(),
            severity: vector.severity,
            propagation_type: vector.propagation_type,
        }
    }

    /// Most severe bottleneck level, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.bottlenecks.iter().map(|b| b.severity).min()
    }
}
