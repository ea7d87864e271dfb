pub mod dependency_graph;
pub mod metrics;
pub mod resolve;
pub mod traversal;

use serde::{Deserialize, Serialize};

pub use dependency_graph::{DependencyGraph, build_dependency_graph};
pub use metrics::{BlastRadius, GraphMetrics, HubDetail, MetricsConfig, blast_radius, compute_graph_metrics};
pub use resolve::{ImportResolver, normalize_path};
pub use traversal::{EdgeDirection, TraversalGraph, Visit};

// ── Symbol kind ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    Method,
    Variable,
    Import,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Import => "import",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Symbol records (extractor output) ──────────────────────────────

/// One symbol produced by an external extractor.
///
/// Import records carry the raw import specifier in `name` (`"./utils"`,
/// `"django.db"`, `"react"`), never a resolved file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,
    pub language: String,
    /// Enclosing class or module, when the extractor knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_in: Option<String>,
}

impl SymbolRecord {
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        file: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            language: language.into(),
            defined_in: None,
        }
    }

    /// Shorthand for an import record.
    pub fn import(
        specifier: impl Into<String>,
        file: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::new(specifier, SymbolKind::Import, file, language)
    }

    pub fn is_import(&self) -> bool {
        self.kind == SymbolKind::Import
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_kind_serde_is_lowercase() {
        let json = serde_json::to_string(&SymbolKind::Import).unwrap();
        assert_eq!(json, "\"import\"");
        let back: SymbolKind = serde_json::from_str("\"method\"").unwrap();
        assert_eq!(back, SymbolKind::Method);
    }

    #[test]
    fn symbol_record_defaults_defined_in() {
        let json = r#"{"name":"react","kind":"import","file":"src/App.tsx","language":"typescript"}"#;
        let rec: SymbolRecord = serde_json::from_str(json).unwrap();
        assert!(rec.is_import());
        assert!(rec.defined_in.is_none());
        assert_eq!(rec.kind.to_string(), "import");
    }
}
