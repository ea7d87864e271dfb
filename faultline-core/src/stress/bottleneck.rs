// Bottleneck classification, recommendations and impact evidence.

use std::collections::HashSet;

use faultline_graphs::{GraphMetrics, Visit};

use crate::detect::evidence::{basename, normalize_path};
use crate::layers::UNKNOWN_LAYER;
use crate::types::{Layers, Severity};

use super::models::{BottleneckAnalysis, ImpactEvidence, PropagationType, StressVector};

/// Dependents above which any impacted file is a coupling hotspot.
pub const GENERIC_FAN_IN_THRESHOLD: usize = 15;

const BUNDLE_FAN_IN: usize = 5;
const HIGH_COUPLING: f64 = 0.6;

// ── Rule table ─────────────────────────────────────────────────────

/// What a rule sees about one impacted file.
#[derive(Debug, Clone, Copy)]
pub struct FileFacts<'a> {
    /// Lower-cased, leading `/`.
    pub path: &'a str,
    pub fan_in: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BottleneckRule {
    pub name: &'static str,
    pub severity: Severity,
    pub reason: &'static str,
    pub recommendation: &'static str,
    scenario: fn(&StressVector) -> bool,
    file: fn(&FileFacts<'_>) -> bool,
}

impl BottleneckRule {
    pub fn matches(&self, vector: &StressVector, facts: &FileFacts<'_>) -> bool {
        (self.scenario)(vector) && (self.file)(facts)
    }
}

fn name_has(vector: &StressVector, needles: &[&str]) -> bool {
    needles.iter().any(|n| vector.name.contains(n))
}

fn path_has(facts: &FileFacts<'_>, needles: &[&str]) -> bool {
    needles.iter().any(|n| facts.path.contains(n))
}

fn is_ui_file(facts: &FileFacts<'_>) -> bool {
    path_has(facts, &["/components/", "/ui/"])
        || [".tsx", ".jsx", ".vue", ".svelte"].iter().any(|e| facts.path.ends_with(e))
}

/// Tried in order; the first match classifies the file.
pub static BOTTLENECK_RULES: &[BottleneckRule] = &[
    BottleneckRule {
        name: "api_overload",
        severity: Severity::Critical,
        reason: "API entry point takes the full request surge",
        recommendation: "Add rate limiting and response caching in front of this endpoint",
        scenario: |v| {
            v.propagation_type == PropagationType::Traffic
                || name_has(v, &["traffic", "concurrency", "spike", "load"])
        },
        file: |f| {
            path_has(f, &["/api/", "/routes/", "/controllers/", "/handlers/", "/endpoints/", "views.py", "urls.py"])
        },
    },
    BottleneckRule {
        name: "data_exhaustion",
        severity: Severity::Critical,
        reason: "Data access point competes for a bounded connection pool",
        recommendation: "Introduce connection pooling limits and batch queries",
        scenario: |v| v.propagation_type == PropagationType::Data || name_has(v, &["database"]),
        file: |f| path_has(f, &["/models/", "/model/", "/db/", "/repository/", "/schema", "models.py", "database", "prisma"]),
    },
    BottleneckRule {
        name: "bundle_bloat",
        severity: Severity::High,
        reason: "Widely imported UI module is pulled into every bundle",
        recommendation: "Code-split this component and lazy-load it where possible",
        scenario: |v| name_has(v, &["bundle"]),
        file: |f| is_ui_file(f) && f.fan_in >= BUNDLE_FAN_IN,
    },
    BottleneckRule {
        name: "memory_leak",
        severity: Severity::High,
        reason: "Long-lived state holder can retain memory across views",
        recommendation: "Audit subscriptions and release state on unmount",
        scenario: |v| name_has(v, &["memory"]),
        file: |f| path_has(f, &["store", "state", "context", "/hooks/", "use-"]),
    },
    BottleneckRule {
        name: "auth",
        severity: Severity::Critical,
        reason: "Every authenticated request funnels through this check",
        recommendation: "Cache token verification and keep the auth path free of I/O",
        scenario: |v| v.propagation_type == PropagationType::Auth || name_has(v, &["auth"]),
        file: |f| path_has(f, &["auth", "login", "session", "jwt", "oauth", "middleware"]),
    },
    BottleneckRule {
        name: "form",
        severity: Severity::Medium,
        reason: "Form handler receives bursty writes",
        recommendation: "Debounce submissions and validate on the client first",
        scenario: |v| name_has(v, &["form"]),
        file: |f| path_has(f, &["form"]),
    },
    BottleneckRule {
        name: "service_cascade",
        severity: Severity::High,
        reason: "Consumers fail together when this service fails",
        recommendation: "Add timeouts, retries and a circuit breaker around calls to this service",
        scenario: |v| v.propagation_type == PropagationType::Dependency,
        file: |f| path_has(f, &["/services/", "/service/", "services.py"]),
    },
];

// ── Analysis ───────────────────────────────────────────────────────

fn component_name(file: &str) -> String {
    basename(file).to_string()
}

/// Classify the first `limit` impacted files. Sorted most severe first;
/// ties keep impact order.
pub fn analyze_bottlenecks(
    vector: &StressVector,
    affected: &[String],
    metrics: &GraphMetrics,
    limit: usize,
) -> Vec<BottleneckAnalysis> {
    let mut found: Vec<BottleneckAnalysis> = affected
        .iter()
        .take(limit)
        .filter_map(|file| {
            let path = normalize_path(file);
            let facts = FileFacts {
                path: &path,
                fan_in: metrics.fan_in(file),
            };
            if let Some(rule) = BOTTLENECK_RULES.iter().find(|r| r.matches(vector, &facts)) {
                return Some(BottleneckAnalysis {
                    component: component_name(file),
                    reason: rule.reason.to_string(),
                    severity: rule.severity,
                    recommendation: rule.recommendation.to_string(),
                    file_path: Some(file.clone()),
                });
            }
            (facts.fan_in > GENERIC_FAN_IN_THRESHOLD).then(|| BottleneckAnalysis {
                component: component_name(file),
                reason: format!("Single point of failure: {} files depend on it", facts.fan_in),
                severity: Severity::High,
                recommendation: "Split responsibilities so fewer files depend on one module".to_string(),
                file_path: Some(file.clone()),
            })
        })
        .collect();

    found.sort_by_key(|b| b.severity);
    found
}

/// Structural recommendations for one result, deduplicated and capped.
pub fn build_recommendations(
    vector: &StressVector,
    affected: &[String],
    bottlenecks: &[BottleneckAnalysis],
    metrics: &GraphMetrics,
    limit: usize,
) -> Vec<String> {
    let mut out: Vec<String> = bottlenecks
        .iter()
        .map(|b| format!("{}: {}", b.component, b.recommendation))
        .collect();

    for file in affected.iter().filter(|f| metrics.is_god_module(f)) {
        out.push(format!(
            "Break up {} ({} dependents) before it fails under {}",
            component_name(file),
            metrics.fan_in(file),
            vector.name
        ));
    }
    if metrics.coupling_score > HIGH_COUPLING {
        out.push(format!(
            "Coupling score {:.2} is high; put interfaces between layers to contain failures",
            metrics.coupling_score
        ));
    }
    if metrics.total_nodes > 0 && affected.len() * 2 > metrics.total_nodes {
        #[allow(clippy::cast_precision_loss)]
        let pct = affected.len() as f64 / metrics.total_nodes as f64 * 100.0;
        out.push(format!("Stress reaches {pct:.0}% of files; add isolation boundaries"));
    }
    out.push(
        match vector.propagation_type {
            PropagationType::Traffic => "Load-test the entry points and add back-pressure",
            PropagationType::Dependency => "Pin dependency versions and add contract tests at module boundaries",
            PropagationType::Data => "Monitor connection pool saturation and slow queries",
            PropagationType::Auth => "Rate-limit authentication endpoints and alert on failure spikes",
        }
        .to_string(),
    );

    let mut seen = HashSet::new();
    out.retain(|r| seen.insert(r.clone()));
    out.truncate(limit);
    out
}

/// Non-empty layers none of whose files were impacted.
pub fn safe_components(layers: &Layers, affected: &[String]) -> Vec<String> {
    let hit: HashSet<&str> = affected.iter().map(String::as_str).collect();
    layers
        .iter()
        .filter(|(name, files)| {
            *name != UNKNOWN_LAYER && !files.is_empty() && files.iter().all(|f| !hit.contains(f.as_str()))
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

/// One evidence record per impacted file that belongs to a named layer.
pub fn map_evidence(visits: &[Visit], layers: &Layers) -> Vec<ImpactEvidence> {
    visits
        .iter()
        .filter_map(|visit| {
            let layer = layers.layer_of(&visit.node)?;
            let reason = if visit.depth == 0 {
                "Stress enters here".to_string()
            } else {
                format!("Affected by stress propagation ({} hops)", visit.depth)
            };
            Some(ImpactEvidence {
                file: visit.node.clone(),
                layer: layer.to_string(),
                depth: visit.depth,
                reason,
            })
        })
        .collect()
}
