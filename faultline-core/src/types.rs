use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Architecture type ──────────────────────────────────────────────

/// Coarse classification of a repository's overall shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureType {
    StaticSpa,
    SsrApp,
    RestApi,
    GraphqlApi,
    Microservices,
    FullStack,
    BackendApi,
    CliTool,
    Library,
    Monorepo,
    Unknown,
}

impl ArchitectureType {
    pub const ALL: [Self; 11] = [
        Self::StaticSpa,
        Self::SsrApp,
        Self::RestApi,
        Self::GraphqlApi,
        Self::Microservices,
        Self::FullStack,
        Self::BackendApi,
        Self::CliTool,
        Self::Library,
        Self::Monorepo,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaticSpa => "static_spa",
            Self::SsrApp => "ssr_app",
            Self::RestApi => "rest_api",
            Self::GraphqlApi => "graphql_api",
            Self::Microservices => "microservices",
            Self::FullStack => "full_stack",
            Self::BackendApi => "backend_api",
            Self::CliTool => "cli_tool",
            Self::Library => "library",
            Self::Monorepo => "monorepo",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Top-level category that selects the layer rule set.
    pub fn category(self) -> Category {
        match self {
            Self::StaticSpa | Self::SsrApp => Category::Frontend,
            Self::BackendApi | Self::RestApi | Self::GraphqlApi | Self::Microservices => {
                Category::Backend
            }
            Self::FullStack => Category::Fullstack,
            Self::CliTool | Self::Library | Self::Monorepo | Self::Unknown => Category::Unknown,
        }
    }
}

impl std::fmt::Display for ArchitectureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Fullstack,
    Unknown,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Fullstack => "fullstack",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of application a framework builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkCategory {
    Frontend,
    Backend,
    Fullstack,
    Mobile,
    Desktop,
    #[default]
    Unknown,
}

// ── Severity ───────────────────────────────────────────────────────

/// Ordered most severe first, so an ascending sort ranks critical on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Detection results ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    pub framework: Option<String>,
    pub language: Option<String>,
    pub backend: Option<String>,
    pub database: Option<String>,
    pub orm: Option<String>,
    pub has_ssr: bool,
    pub has_api_routes: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkDetection {
    pub name: String,
    pub category: FrameworkCategory,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDetection {
    pub name: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

/// Complete classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureDetection {
    pub architecture_type: ArchitectureType,
    pub archetype: Category,
    pub tech_stack: TechStack,
    pub confidence: f64,
    pub evidence: Vec<String>,
    /// Every above-threshold framework, highest confidence first.
    pub frameworks: Vec<FrameworkDetection>,
    pub database: Option<DatabaseDetection>,
}

impl ArchitectureDetection {
    pub fn primary_framework(&self) -> Option<&FrameworkDetection> {
        self.frameworks.first()
    }
}

impl Default for ArchitectureDetection {
    fn default() -> Self {
        Self {
            architecture_type: ArchitectureType::Unknown,
            archetype: Category::Unknown,
            tech_stack: TechStack::default(),
            confidence: 0.0,
            evidence: Vec::new(),
            frameworks: Vec::new(),
            database: None,
        }
    }
}

// ── Layers ─────────────────────────────────────────────────────────

/// Layer name → files, as produced by layer inference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layers(BTreeMap<String, Vec<String>>);

impl Layers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a (possibly empty) bucket exists.
    pub fn add_bucket(&mut self, layer: &str) {
        self.0.entry(layer.to_string()).or_default();
    }

    pub fn push(&mut self, layer: &str, file: impl Into<String>) {
        self.0.entry(layer.to_string()).or_default().push(file.into());
    }

    /// Files in `layer`; empty when the bucket does not exist.
    pub fn files(&self, layer: &str) -> &[String] {
        self.0.get(layer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_files(&self, layer: &str) -> bool {
        !self.files(layer).is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Bucket names that hold at least one file.
    pub fn non_empty_names(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The bucket holding `file`, if any.
    pub fn layer_of(&self, file: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, files)| files.iter().any(|f| f == file))
            .map(|(name, _)| name.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_type_round_trips_names() {
        for t in ArchitectureType::ALL {
            assert_eq!(ArchitectureType::parse(t.as_str()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(ArchitectureType::parse("spaceship"), None);
    }

    #[test]
    fn category_mapping() {
        assert_eq!(ArchitectureType::StaticSpa.category(), Category::Frontend);
        assert_eq!(ArchitectureType::SsrApp.category(), Category::Frontend);
        assert_eq!(ArchitectureType::GraphqlApi.category(), Category::Backend);
        assert_eq!(ArchitectureType::Microservices.category(), Category::Backend);
        assert_eq!(ArchitectureType::FullStack.category(), Category::Fullstack);
        assert_eq!(ArchitectureType::Library.category(), Category::Unknown);
    }

    #[test]
    fn severity_orders_most_severe_first() {
        let mut levels = vec![Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        levels.sort();
        assert_eq!(
            levels,
            vec![Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
        );
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
    }

    #[test]
    fn layers_lookup() {
        let mut layers = Layers::new();
        layers.add_bucket("hooks");
        layers.push("ui", "src/components/Button.tsx");
        assert_eq!(layers.files("ui").len(), 1);
        assert!(layers.files("missing").is_empty());
        assert!(!layers.has_files("hooks"));
        assert_eq!(layers.non_empty_names(), vec!["ui"]);
        assert_eq!(layers.layer_of("src/components/Button.tsx"), Some("ui"));
        assert_eq!(layers.names().count(), 2);
    }
}
