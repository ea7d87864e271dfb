// Repository snapshot: the extractor output an analysis run consumes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use faultline_graphs::SymbolRecord;

use crate::error::{Result, SnapshotError};

/// File list, symbols and (optionally) file contents of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<SymbolRecord>,
    /// Path → text, used only for content heuristics.
    #[serde(default)]
    pub contents: BTreeMap<String, String>,
}

impl RepoSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(SnapshotError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(text).map_err(SnapshotError::Json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        if let Some(bad) = self.symbols.iter().find(|s| s.file.trim().is_empty()) {
            return Err(SnapshotError::Invalid(format!("symbol '{}' has an empty file path", bad.name)).into());
        }
        if self.files.iter().any(|f| f.trim().is_empty()) {
            return Err(SnapshotError::Invalid("file list contains an empty path".into()).into());
        }
        Ok(())
    }

    /// Explicit file list, or the sorted union of content keys and symbol
    /// files when none was given.
    pub fn file_list(&self) -> Vec<String> {
        if !self.files.is_empty() {
            return self.files.clone();
        }
        let mut all: BTreeSet<&str> = self.contents.keys().map(String::as_str).collect();
        all.extend(self.symbols.iter().map(|s| s.file.as_str()));
        all.into_iter().map(str::to_string).collect()
    }

    /// Files that produced at least one symbol, in first-seen order.
    pub fn symbol_files(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.symbols
            .iter()
            .map(|s| s.file.as_str())
            .filter(|f| seen.insert(*f))
            .collect()
    }
}
