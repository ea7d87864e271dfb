// Weighted multi-signal evidence scoring.
//
// Every candidate (framework, database, ORM) lists import names, file
// name fragments and content substrings. A class contributes
// `matches / patterns * weight`; the total is capped at 1.0.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use faultline_graphs::SymbolRecord;

use crate::error::{AnalyzeError, Result};
use crate::types::FrameworkCategory;

/// Evidence strings kept per candidate.
pub const MAX_EVIDENCE: usize = 5;

/// Separators that may follow an import prefix (`django.db`, `next/router`, `std::io`).
const IMPORT_SEPARATORS: &[char] = &['.', '/', ':'];

// ── Pattern tables ─────────────────────────────────────────────────

/// One detection candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePatterns {
    pub name: String,
    #[serde(default)]
    pub category: FrameworkCategory,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

impl CandidatePatterns {
    pub fn new(
        name: &str,
        category: FrameworkCategory,
        imports: &[&str],
        files: &[&str],
        content: &[&str],
    ) -> Self {
        let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| (*s).to_string()).collect() };
        Self {
            name: name.to_string(),
            category,
            imports: owned(imports),
            files: owned(files),
            content: owned(content),
        }
    }

    fn validate(&self) -> Result<()> {
        let malformed = |reason: &str| AnalyzeError::MalformedPattern {
            candidate: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(malformed("empty candidate name").into());
        }
        if self.imports.is_empty() && self.files.is_empty() && self.content.is_empty() {
            return Err(malformed("no patterns in any evidence class").into());
        }
        for (class, patterns) in [("imports", &self.imports), ("files", &self.files), ("content", &self.content)] {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(malformed(&format!("blank pattern in {class}")).into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvidenceWeights {
    pub imports: f64,
    pub files: f64,
    pub content: f64,
}

pub const FRAMEWORK_WEIGHTS: EvidenceWeights = EvidenceWeights {
    imports: 0.4,
    files: 0.3,
    content: 0.3,
};

pub const DATABASE_WEIGHTS: EvidenceWeights = EvidenceWeights {
    imports: 0.5,
    files: 0.3,
    content: 0.2,
};

// ── Evidence index ─────────────────────────────────────────────────

/// Lower-cased view of a repository, built once per analysis run and
/// shared by every detector.
#[derive(Debug, Clone, Default)]
pub struct EvidenceIndex {
    /// Lower-cased paths with a leading `/` so that `/dir/` markers match
    /// top-level directories too.
    paths: Vec<String>,
    imports: BTreeSet<String>,
    content: String,
}

impl EvidenceIndex {
    pub fn new(
        files: &[String],
        symbols: &[SymbolRecord],
        contents: &BTreeMap<String, String>,
    ) -> Self {
        let paths = files.iter().map(|f| normalize_path(f)).collect();
        let imports = symbols
            .iter()
            .filter(|s| s.is_import())
            .map(|s| s.name.to_lowercase())
            .collect();

        let mut content = String::with_capacity(contents.values().map(String::len).sum::<usize>() + contents.len());
        for text in contents.values() {
            content.push_str(&text.to_lowercase());
            content.push('\n');
        }

        Self {
            paths,
            imports,
            content,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.paths.len()
    }

    /// Exact import, or an import that extends `pattern` past a separator.
    pub fn has_import(&self, pattern: &str) -> bool {
        let p = pattern.to_lowercase();
        if self.imports.contains(&p) {
            return true;
        }
        self.imports
            .range(p.clone()..)
            .take_while(|imp| imp.starts_with(&p))
            .any(|imp| imp[p.len()..].starts_with(IMPORT_SEPARATORS))
    }

    /// Path fragment aligned to a segment start. Patterns that begin with
    /// `.` (extensions) or `/` match anywhere.
    pub fn has_file(&self, pattern: &str) -> bool {
        let p = pattern.to_lowercase();
        let needle = if p.starts_with('.') || p.starts_with('/') {
            p
        } else {
            format!("/{p}")
        };
        self.paths.iter().any(|path| path.contains(&needle))
    }

    pub fn has_content(&self, pattern: &str) -> bool {
        self.content.contains(&pattern.to_lowercase())
    }

    /// Number of files whose normalized path satisfies `pred`.
    pub fn count_paths(&self, pred: impl Fn(&str) -> bool) -> usize {
        self.paths.iter().filter(|p| pred(p)).count()
    }

    pub fn any_path(&self, pred: impl Fn(&str) -> bool) -> bool {
        self.paths.iter().any(|p| pred(p))
    }

    /// A file named exactly `name` at the repository root.
    pub fn has_root_file(&self, name: &str) -> bool {
        let needle = format!("/{}", name.to_lowercase());
        self.paths.iter().any(|p| *p == needle)
    }

    /// A file whose basename is `name`, at any depth.
    pub fn has_basename(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.paths.iter().any(|p| basename(p) == needle)
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    let lower = path.replace('\\', "/").to_lowercase();
    if lower.starts_with('/') {
        lower
    } else {
        format!("/{lower}")
    }
}

pub(crate) fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ── Scoring ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub name: String,
    pub category: FrameworkCategory,
    pub score: f64,
    pub evidence: Vec<String>,
}

/// Score one candidate against `index`.
#[allow(clippy::cast_precision_loss)]
pub fn score_candidate(
    index: &EvidenceIndex,
    candidate: &CandidatePatterns,
    weights: EvidenceWeights,
) -> Result<CandidateScore> {
    candidate.validate()?;

    let classes: [(&[String], f64, &str, fn(&EvidenceIndex, &str) -> bool); 3] = [
        (&candidate.imports, weights.imports, "Import", EvidenceIndex::has_import),
        (&candidate.files, weights.files, "File", EvidenceIndex::has_file),
        (&candidate.content, weights.content, "Pattern", EvidenceIndex::has_content),
    ];

    let mut score = 0.0;
    let mut evidence = Vec::new();
    for (patterns, weight, label, matches) in classes {
        if patterns.is_empty() {
            continue;
        }
        let mut hits = 0usize;
        for pattern in patterns {
            if matches(index, pattern) {
                hits += 1;
                evidence.push(format!("{label}: {pattern}"));
            }
        }
        score += hits as f64 / patterns.len() as f64 * weight;
    }
    evidence.truncate(MAX_EVIDENCE);

    Ok(CandidateScore {
        name: candidate.name.clone(),
        category: candidate.category,
        score: score.min(1.0),
        evidence,
    })
}

/// Score every candidate in table order. A malformed entry is logged and
/// scored 0 without affecting the others.
pub fn score_all<'a>(
    index: &EvidenceIndex,
    candidates: impl IntoIterator<Item = &'a CandidatePatterns>,
    weights: EvidenceWeights,
) -> Vec<CandidateScore> {
    candidates
        .into_iter()
        .map(|candidate| {
            score_candidate(index, candidate, weights).unwrap_or_else(|e| {
                warn!(candidate = %candidate.name, error = %e, "Skipping malformed detection candidate");
                CandidateScore {
                    name: candidate.name.clone(),
                    category: candidate.category,
                    score: 0.0,
                    evidence: Vec::new(),
                }
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────
