// Import-specifier resolution.
//
// Maps the raw strings an extractor reports (`./utils`, `..models`,
// `@/lib/api`, `app.services.billing`) onto canonical file keys so that
// fan-in is counted against files instead of spellings. Anything that
// cannot be pinned to exactly one file (third-party packages, ambiguous
// suffixes) is left untouched.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::DependencyGraph;

/// Entry-point basenames that stand for their parent directory.
const PACKAGE_ENTRIES: &[&str] = &["__init__", "index", "mod"];

/// Prefixes that alias the source root in JS/TS projects.
const ROOT_ALIASES: &[&str] = &["@/", "~/"];

#[derive(Debug, Clone, Default)]
pub struct ImportResolver {
    /// Slash-form alias → files it names, in indexing order.
    aliases: HashMap<String, Vec<String>>,
    /// Segment-aligned alias suffix → distinct files.
    suffixes: HashMap<String, BTreeSet<String>>,
}

impl ImportResolver {
    pub fn new<S: AsRef<str>>(files: impl IntoIterator<Item = S>) -> Self {
        let mut resolver = Self::default();
        for file in files {
            resolver.index(file.as_ref());
        }
        resolver
    }

    fn index(&mut self, file: &str) {
        let file = normalize_path(file);
        let stem = strip_extension(&file);

        let mut keys = vec![file.clone()];
        if stem != file {
            keys.push(stem.to_string());
        }
        if let Some((parent, base)) = stem.rsplit_once('/') {
            if PACKAGE_ENTRIES.contains(&base) {
                keys.push(parent.to_string());
            }
        }

        for key in keys {
            let files = self.aliases.entry(key.clone()).or_default();
            if !files.contains(&file) {
                files.push(file.clone());
            }
            let segments: Vec<&str> = key.split('/').collect();
            for start in 1..segments.len() {
                self.suffixes
                    .entry(segments[start..].join("/"))
                    .or_default()
                    .insert(file.clone());
            }
        }
    }

    /// Resolve `specifier` as written in `from_file` to a canonical file key.
    pub fn resolve(&self, from_file: &str, specifier: &str) -> Option<String> {
        let spec = specifier.trim();
        if spec.is_empty() {
            return None;
        }
        let from_dir = parent_dir(from_file);

        if spec.starts_with("./") || spec.starts_with("../") {
            let joined = join_normalized(from_dir, spec)?;
            return self.lookup(&joined);
        }

        if spec.starts_with('.') {
            let dots = spec.chars().take_while(|c| *c == '.').count();
            let rest = spec[dots..].replace('.', "/");
            let mut base = from_dir.to_string();
            for _ in 1..dots {
                base = parent_dir(&base).to_string();
            }
            let target = match (base.is_empty(), rest.is_empty()) {
                (_, true) => base,
                (true, false) => rest,
                (false, false) => format!("{base}/{rest}"),
            };
            return self.lookup(&target);
        }

        for alias in ROOT_ALIASES {
            if let Some(rest) = spec.strip_prefix(alias) {
                return self
                    .lookup(&format!("src/{rest}"))
                    .or_else(|| self.lookup(rest));
            }
        }

        let slashed = if spec.contains('/') {
            spec.to_string()
        } else {
            spec.replace("::", "/").replace('.', "/")
        };

        if !slashed.contains('/') {
            // Single segment: a sibling module first, then a top-level one.
            let sibling = if from_dir.is_empty() {
                slashed.clone()
            } else {
                format!("{from_dir}/{slashed}")
            };
            return self.lookup(&sibling).or_else(|| self.lookup(&slashed));
        }

        self.lookup(&slashed).or_else(|| self.lookup_suffix(&slashed))
    }

    /// Return a new graph with every resolvable specifier replaced by its
    /// file key. Unresolved specifiers are kept verbatim.
    pub fn resolve_graph(&self, graph: &DependencyGraph) -> DependencyGraph {
        let mut resolved = DependencyGraph::new();
        let mut hits = 0usize;
        for (file, specs) in graph.iter() {
            resolved.ensure_file(file);
            for spec in specs {
                match self.resolve(file, spec) {
                    Some(target) if target != file => {
                        hits += 1;
                        resolved.add_import(file, target);
                    }
                    _ => resolved.add_import(file, spec.clone()),
                }
            }
        }
        debug!(
            resolved = hits,
            total = graph.edge_count(),
            "Resolved import specifiers"
        );
        resolved
    }

    fn lookup(&self, path: &str) -> Option<String> {
        self.aliases
            .get(path)
            .and_then(|files| files.first())
            .cloned()
    }

    fn lookup_suffix(&self, path: &str) -> Option<String> {
        let files = self.suffixes.get(path)?;
        if files.len() == 1 {
            files.iter().next().cloned()
        } else {
            None
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────

/// Canonical spelling of a repository path: forward slashes, no leading
/// `./`. Graph keys and resolver keys both use it.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

fn strip_extension(path: &str) -> &str {
    let base_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[base_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..base_start + dot],
        _ => path,
    }
}

fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

/// Join a relative specifier onto `dir`, collapsing `.` and `..`.
/// Returns `None` when the path escapes the repository root.
fn join_normalized(dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

// ── Tests ─────────────────────────────────────────────────────────────
