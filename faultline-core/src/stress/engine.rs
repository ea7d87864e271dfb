// Stress propagation engine: one vector in, one result out.

use faultline_graphs::{DependencyGraph, EdgeDirection, GraphMetrics, TraversalGraph};
use tracing::{debug, instrument};

use crate::analyze::Assumption;
use crate::config::StressSection;
use crate::types::{ArchitectureDetection, Layers};

use super::bottleneck::{analyze_bottlenecks, build_recommendations, map_evidence, safe_components};
use super::models::{PropagationType, StressResult, StressVector};
use super::propagation::{propagate, resolve_start_files};

const IMPACT_PATH_LEN: usize = 5;
const MAX_CONFIDENCE: f64 = 0.95;

/// Immutable inputs shared by every stress test of one analysis run.
///
/// Traversal graphs for both edge directions are built once up front.
#[derive(Debug, Clone)]
pub struct StressContext {
    pub graph: DependencyGraph,
    pub metrics: GraphMetrics,
    pub layers: Layers,
    pub detection: ArchitectureDetection,
    pub assumptions: Vec<Assumption>,
    pub settings: StressSection,
    forward: TraversalGraph,
    reverse: TraversalGraph,
}

impl StressContext {
    pub fn new(
        graph: DependencyGraph,
        metrics: GraphMetrics,
        layers: Layers,
        detection: ArchitectureDetection,
        assumptions: Vec<Assumption>,
        settings: StressSection,
    ) -> Self {
        let forward = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Forward);
        let reverse = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Reverse);
        Self {
            graph,
            metrics,
            layers,
            detection,
            assumptions,
            settings,
            forward,
            reverse,
        }
    }

    pub fn traversal(&self, mode: PropagationType) -> &TraversalGraph {
        match mode.edge_direction() {
            EdgeDirection::Forward => &self.forward,
            EdgeDirection::Reverse => &self.reverse,
        }
    }
}

/// Monotonic in severity, capped.
pub fn confidence_for(severity: f64) -> f64 {
    (0.5 + severity / 2.0).min(MAX_CONFIDENCE)
}

/// Run one stress vector. Never fails: inapplicable vectors come back with
/// `is_applicable == false` and a diagnostic in `failure_mode`.
#[instrument(skip_all, name = "stress_test", fields(vector = %vector.name))]
pub fn run_stress_test(ctx: &StressContext, vector: &StressVector) -> StressResult {
    let architecture = ctx.detection.architecture_type;
    let tech_stack = ctx.detection.tech_stack.clone();

    if !vector.applies_to(architecture) {
        let types: Vec<&str> = vector.architecture_types.iter().map(|t| t.as_str()).collect();
        debug!(%architecture, "vector not applicable");
        return StressResult::not_applicable(
            vector,
            architecture,
            tech_stack,
            format!("Not applicable to {architecture}; applies to: {}", types.join(", ")),
        );
    }

    if !vector.meets_threshold() {
        return StressResult::not_applicable(
            vector,
            architecture,
            tech_stack,
            format!(
                "Severity {:.2} is below the scenario threshold {:.2}",
                vector.severity, vector.min_severity_threshold
            ),
        );
    }

    let starts = resolve_start_files(&vector.target_layers, &ctx.layers, &ctx.graph);
    if starts.is_empty() {
        let available = ctx.layers.non_empty_names();
        debug!(targets = ?vector.target_layers, "no start files");
        return StressResult::not_applicable(
            vector,
            architecture,
            tech_stack,
            format!(
                "No files matched target layers [{}]; available layers: {}",
                vector.target_layers.join(", "),
                if available.is_empty() { "none".to_string() } else { available.join(", ") }
            ),
        );
    }

    let settings = &ctx.settings;
    let visits = propagate(
        ctx.traversal(vector.propagation_type),
        &ctx.graph,
        &starts.files,
        vector.propagation_type,
        settings.max_depth,
    );
    let reached = visits.len();
    let visits = &visits[..reached.min(settings.max_affected_files)];
    let affected: Vec<String> = visits.iter().map(|v| v.node.clone()).collect();

    let bottlenecks = analyze_bottlenecks(vector, &affected, &ctx.metrics, settings.max_bottleneck_files);
    let recommendations = build_recommendations(
        vector,
        &affected,
        &bottlenecks,
        &ctx.metrics,
        settings.max_recommendations,
    );
    let failure_mode = bottlenecks.first().map_or_else(
        || format!("Cascading {} failure", vector.propagation_type),
        |b| format!("{}: {}", b.component, b.reason),
    );

    let mut keys: Vec<&str> = vector.target_layers.iter().map(String::as_str).collect();
    keys.extend(starts.matched_layers.iter().map(String::as_str));
    let violated_assumptions: Vec<Assumption> = ctx
        .assumptions
        .iter()
        .filter(|a| a.is_violated_by(&keys))
        .cloned()
        .collect();

    debug!(
        starts = starts.files.len(),
        reached,
        affected = affected.len(),
        bottlenecks = bottlenecks.len(),
        "stress propagated"
    );

    StressResult {
        stress: vector.name.clone(),
        architecture_type: architecture,
        tech_stack,
        is_applicable: true,
        violated_assumptions,
        impact_path: affected.iter().take(IMPACT_PATH_LEN).cloned().collect(),
        safe_components: safe_components(&ctx.layers, &affected),
        evidence: map_evidence(visits, &ctx.layers),
        affected_files: affected,
        bottlenecks,
        failure_mode,
        confidence: confidence_for(vector.severity),
        recommendations,
        severity: vector.severity,
        propagation_type: vector.propagation_type,
    }
}
