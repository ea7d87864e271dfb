// File-level dependency graph folded from extractor symbol records.
//
// Keys are canonical file paths; values are the raw import specifiers the
// source used. Values are not guaranteed to match any key until the graph
// has been passed through `ImportResolver::resolve_graph`.

use std::collections::{BTreeSet, HashMap};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::SymbolRecord;

/// Mapping `file → set(import specifier)`.
///
/// Key iteration follows first-insertion order so that every derived
/// ordering (hub ties, BFS neighbour order) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    order: Vec<String>,
    imports: HashMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from explicit `(file, [imports])` pairs.
    pub fn from_edges<K, I, V>(edges: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut graph = Self::new();
        for (file, targets) in edges {
            let file = file.into();
            graph.ensure_file(&file);
            for target in targets {
                graph.add_import(&file, target);
            }
        }
        graph
    }

    /// Register `file` as a key with no imports, if it is not already present.
    pub fn ensure_file(&mut self, file: &str) {
        if !self.imports.contains_key(file) {
            self.order.push(file.to_string());
            self.imports.insert(file.to_string(), BTreeSet::new());
        }
    }

    /// Add one edge `file → specifier`. Set semantics: duplicates are ignored.
    pub fn add_import(&mut self, file: &str, specifier: impl Into<String>) {
        self.ensure_file(file);
        if let Some(set) = self.imports.get_mut(file) {
            set.insert(specifier.into());
        }
    }

    /// Graph keys in first-insertion order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.imports.contains_key(file)
    }

    /// Imports declared by `file`, or `None` when `file` is not a key.
    pub fn imports(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.imports.get(file)
    }

    /// `(file, imports)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.order
            .iter()
            .filter_map(|k| self.imports.get(k).map(|set| (k.as_str(), set)))
    }

    /// Number of keys (not the number of distinct import targets).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.imports.values().map(BTreeSet::len).sum()
    }

    /// Keys whose import set contains `node`, in key order.
    pub fn dependents_of(&self, node: &str) -> Vec<&str> {
        self.iter()
            .filter(|(_, deps)| deps.contains(node))
            .map(|(src, _)| src)
            .collect()
    }
}

impl Serialize for DependencyGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (file, deps) in self.iter() {
            map.serialize_entry(file, deps)?;
        }
        map.end()
    }
}

/// Fold import-kind symbol records into a [`DependencyGraph`].
///
/// Only import records contribute; a file that imports nothing does not
/// become a key. No resolution or existence checks are performed.
pub fn build_dependency_graph(symbols: &[SymbolRecord]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for record in symbols.iter().filter(|s| s.is_import()) {
        graph.add_import(&record.file, record.name.clone());
    }
    graph
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolKind;

    #[test]
    fn folds_only_import_records() {
        let symbols = vec![
            SymbolRecord::import("react", "src/App.tsx", "typescript"),
            SymbolRecord::import("./utils", "src/App.tsx", "typescript"),
            SymbolRecord::new("App", SymbolKind::Function, "src/App.tsx", "typescript"),
            SymbolRecord::new("helper", SymbolKind::Function, "src/utils.ts", "typescript"),
        ];

        let graph = build_dependency_graph(&symbols);
        assert_eq!(graph.len(), 1, "utils.ts has no imports and is not a key");
        let deps = graph.imports("src/App.tsx").unwrap();
        assert!(deps.contains("react"));
        assert!(deps.contains("./utils"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn duplicate_imports_collapse() {
        let symbols = vec![
            SymbolRecord::import("os", "a.py", "python"),
            SymbolRecord::import("os", "a.py", "python"),
        ];
        let graph = build_dependency_graph(&symbols);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn keys_keep_insertion_order() {
        let graph = DependencyGraph::from_edges([
            ("z.py", vec!["a"]),
            ("a.py", vec![]),
            ("m.py", vec!["z.py"]),
        ]);
        let files: Vec<_> = graph.files().collect();
        assert_eq!(files, vec!["z.py", "a.py", "m.py"]);
    }

    #[test]
    fn dependents_of_lists_importers() {
        let graph = DependencyGraph::from_edges([
            ("a.py", vec!["utils.py"]),
            ("b.py", vec!["utils.py", "os"]),
            ("utils.py", vec![]),
        ]);
        assert_eq!(graph.dependents_of("utils.py"), vec!["a.py", "b.py"]);
        assert!(graph.dependents_of("missing").is_empty());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let graph = DependencyGraph::from_edges([("b.py", vec!["x"]), ("a.py", vec![])]);
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"b.py":["x"],"a.py":[]}"#);
    }
}
