// Structural metrics over a dependency graph: fan-in/fan-out, hubs,
// leaves, coupling, god modules, cycles and blast radius.
//
// Ratios are computed in f64 from counts.
#![allow(clippy::cast_precision_loss)]

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DependencyGraph;

// ── Configuration ──────────────────────────────────────────────────

/// Limits and calibration constants for [`compute_graph_metrics_with`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Number of hub names reported.
    pub hub_limit: usize,
    /// Number of hubs that get a [`HubDetail`] entry.
    pub hub_detail_limit: usize,
    pub leaf_limit: usize,
    /// Fan-in strictly above this marks a god module.
    pub god_module_threshold: usize,
    pub god_module_limit: usize,
    /// Average fan-in that maps to a coupling score of 1.0.
    pub coupling_calibration: f64,
    pub cycle_limit: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            hub_limit: 10,
            hub_detail_limit: 20,
            leaf_limit: 10,
            god_module_threshold: 15,
            god_module_limit: 5,
            coupling_calibration: 5.0,
            cycle_limit: 10,
        }
    }
}

// ── Results ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubDetail {
    pub fan_in: usize,
    pub fan_out: usize,
    pub blast_radius_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Importer count per import target. Nodes nobody imports are absent.
    pub fan_in: BTreeMap<String, usize>,
    /// Declared import count per graph key (explicit zero included).
    pub fan_out: BTreeMap<String, usize>,
    /// Highest fan-in first; ties keep discovery order.
    pub hubs: Vec<String>,
    pub hubs_with_counts: Vec<(String, usize)>,
    pub hub_details: BTreeMap<String, HubDetail>,
    /// Keys that import something but are imported by nothing.
    pub leaves: Vec<String>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub avg_fan_in: f64,
    pub avg_fan_out: f64,
    pub max_fan_in: usize,
    pub max_fan_in_module: Option<String>,
    pub coupling_score: f64,
    pub god_modules: Vec<String>,
    /// Import cycles among graph keys, members in key order.
    pub cycles: Vec<Vec<String>>,
}

impl GraphMetrics {
    pub fn fan_in(&self, node: &str) -> usize {
        self.fan_in.get(node).copied().unwrap_or(0)
    }

    pub fn fan_out(&self, node: &str) -> usize {
        self.fan_out.get(node).copied().unwrap_or(0)
    }

    pub fn is_god_module(&self, node: &str) -> bool {
        self.god_modules.iter().any(|g| g == node)
    }
}

/// Direct-dependents view of one node, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastRadius {
    pub direct_dependents: Vec<String>,
    pub blast_radius: usize,
    pub blast_radius_pct: f64,
}

// ── Computation ────────────────────────────────────────────────────

pub fn compute_graph_metrics(graph: &DependencyGraph) -> GraphMetrics {
    compute_graph_metrics_with(graph, &MetricsConfig::default())
}

pub fn compute_graph_metrics_with(graph: &DependencyGraph, config: &MetricsConfig) -> GraphMetrics {
    if graph.is_empty() {
        return GraphMetrics::default();
    }

    let mut fan_out = BTreeMap::new();
    let mut fan_in: HashMap<&str, usize> = HashMap::new();
    // First-seen order of import targets, used to break hub ties.
    let mut discovery: Vec<&str> = Vec::new();

    for (src, deps) in graph.iter() {
        fan_out.insert(src.to_string(), deps.len());
        for dep in deps {
            let count = fan_in.entry(dep.as_str()).or_insert_with(|| {
                discovery.push(dep.as_str());
                0
            });
            *count += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = discovery.iter().map(|n| (*n, fan_in[n])).collect();
    // Stable sort: equal fan-in keeps discovery order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total_nodes = graph.len();
    let total_edges = graph.edge_count();
    let sum_fan_in: usize = fan_in.values().sum();
    let sum_fan_out: usize = fan_out.values().sum();
    let avg_fan_in = sum_fan_in as f64 / total_nodes as f64;
    let avg_fan_out = sum_fan_out as f64 / total_nodes as f64;

    let hubs_with_counts: Vec<(String, usize)> = ranked
        .iter()
        .take(config.hub_limit)
        .map(|(n, c)| ((*n).to_string(), *c))
        .collect();

    let hub_details = ranked
        .iter()
        .take(config.hub_detail_limit)
        .map(|(n, c)| {
            let detail = HubDetail {
                fan_in: *c,
                fan_out: fan_out.get(*n).copied().unwrap_or(0),
                blast_radius_pct: round_to(*c as f64 / total_nodes as f64 * 100.0, 1),
            };
            ((*n).to_string(), detail)
        })
        .collect();

    let leaves = graph
        .iter()
        .filter(|(n, deps)| !deps.is_empty() && !fan_in.contains_key(n))
        .map(|(n, _)| n.to_string())
        .take(config.leaf_limit)
        .collect();

    let god_modules = ranked
        .iter()
        .filter(|(_, c)| *c > config.god_module_threshold)
        .take(config.god_module_limit)
        .map(|(n, _)| (*n).to_string())
        .collect();

    let coupling_score = if config.coupling_calibration > 0.0 {
        (avg_fan_in / config.coupling_calibration).min(1.0)
    } else {
        0.0
    };

    let (max_fan_in_module, max_fan_in) = ranked
        .first()
        .map_or((None, 0), |(n, c)| (Some((*n).to_string()), *c));

    let cycles = find_cycles(graph, config.cycle_limit);

    debug!(
        nodes = total_nodes,
        edges = total_edges,
        hubs = hubs_with_counts.len(),
        cycles = cycles.len(),
        "Computed graph metrics"
    );

    GraphMetrics {
        fan_in: fan_in.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        fan_out,
        hubs: hubs_with_counts.iter().map(|(n, _)| n.clone()).collect(),
        hubs_with_counts,
        hub_details,
        leaves,
        total_nodes,
        total_edges,
        avg_fan_in: round_to(avg_fan_in, 2),
        avg_fan_out: round_to(avg_fan_out, 2),
        max_fan_in,
        max_fan_in_module,
        coupling_score: round_to(coupling_score, 2),
        god_modules,
        cycles,
    }
}

/// Direct dependents of `node` and their share of all graph keys.
pub fn blast_radius(graph: &DependencyGraph, node: &str) -> BlastRadius {
    let direct_dependents: Vec<String> =
        graph.dependents_of(node).into_iter().map(str::to_string).collect();
    let total = graph.len();
    let pct = if total == 0 {
        0.0
    } else {
        direct_dependents.len() as f64 / total as f64 * 100.0
    };
    BlastRadius {
        blast_radius: direct_dependents.len(),
        blast_radius_pct: round_to(pct, 1),
        direct_dependents,
    }
}

/// Strongly connected components of size > 1, plus self-importing files.
///
/// Only edges whose target is itself a graph key participate.
pub fn find_cycles(graph: &DependencyGraph, limit: usize) -> Vec<Vec<String>> {
    let mut digraph: DiGraph<usize, ()> = DiGraph::new();
    let mut node_to_index: HashMap<&str, NodeIndex> = HashMap::new();
    for (pos, file) in graph.files().enumerate() {
        node_to_index.insert(file, digraph.add_node(pos));
    }
    let keys: Vec<&str> = graph.files().collect();

    for (src, deps) in graph.iter() {
        let Some(&from) = node_to_index.get(src) else {
            continue;
        };
        for dep in deps {
            if let Some(&to) = node_to_index.get(dep.as_str()) {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<usize>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || digraph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<usize> = scc.iter().map(|i| digraph[*i]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    cycles.sort();

    cycles
        .into_iter()
        .take(limit)
        .map(|members| members.into_iter().map(|p| keys[p].to_string()).collect())
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn star(center: &str, spokes: usize) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.ensure_file(center);
        for i in 0..spokes {
            graph.add_import(&format!("mod_{i}.py"), center);
        }
        graph
    }

    #[test]
    fn empty_graph_is_zeroed() {
        let m = compute_graph_metrics(&DependencyGraph::new());
        assert_eq!(m.total_nodes, 0);
        assert!(m.hubs.is_empty());
        assert!(m.leaves.is_empty());
        assert!(m.god_modules.is_empty());
        assert!(m.max_fan_in_module.is_none());
        assert!(m.coupling_score.abs() < f64::EPSILON);
    }

    #[test]
    fn raw_specifier_is_distinct_from_file_key() {
        let graph = DependencyGraph::from_edges([("a.py", vec!["b"]), ("b.py", vec![])]);
        let m = compute_graph_metrics(&graph);
        assert_eq!(m.fan_in("b.py"), 0);
        assert_eq!(m.fan_in("b"), 1);
        assert_eq!(m.fan_out("b.py"), 0);
        assert_eq!(m.total_nodes, 2);
    }

    #[test]
    fn central_utils_at_twelve_is_not_god_module() {
        let m = compute_graph_metrics(&star("utils.py", 12));
        assert_eq!(m.max_fan_in, 12);
        assert_eq!(m.max_fan_in_module.as_deref(), Some("utils.py"));
        assert!(m.god_modules.is_empty(), "12 is below the >15 threshold");
        assert_eq!(m.hubs.first().map(String::as_str), Some("utils.py"));
    }

    #[test]
    fn god_modules_capped_and_sorted() {
        let mut graph = DependencyGraph::new();
        let targets = [("t16a", 16), ("t16b", 16), ("big", 20), ("t16c", 16), ("t16d", 16), ("t15", 15)];
        for (target, count) in targets {
            for i in 0..count {
                graph.add_import(&format!("src_{i}.py"), target);
            }
        }
        let m = compute_graph_metrics(&graph);
        assert!(m.god_modules.len() <= 5);
        assert_eq!(m.god_modules[0], "big");
        let counts: Vec<usize> = m.god_modules.iter().map(|g| m.fan_in(g)).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "descending: {counts:?}");
        assert!(!m.is_god_module("t15"));
        // Ties keep discovery order.
        assert_eq!(&m.god_modules[1..], &["t16a", "t16b", "t16c", "t16d"]);
    }

    #[test]
    fn leaves_are_outward_only() {
        let graph = DependencyGraph::from_edges([
            ("main.py", vec!["app.py"]),
            ("app.py", vec!["db.py"]),
            ("db.py", vec![]),
        ]);
        let m = compute_graph_metrics(&graph);
        assert_eq!(m.leaves, vec!["main.py"]);
    }

    #[test]
    fn averages_and_coupling_use_key_count() {
        let graph = DependencyGraph::from_edges([
            ("a.py", vec!["x", "y", "z"]),
            ("b.py", vec!["x"]),
            ("c.py", vec![]),
        ]);
        let m = compute_graph_metrics(&graph);
        assert_eq!(m.total_edges, 4);
        assert!((m.avg_fan_in - 1.33).abs() < 1e-9);
        assert!((m.avg_fan_out - 1.33).abs() < 1e-9);
        assert!((m.coupling_score - 0.27).abs() < 1e-9);
    }

    #[test]
    fn coupling_score_caps_at_one() {
        let mut graph = DependencyGraph::new();
        for i in 0..4 {
            for j in 0..8 {
                graph.add_import(&format!("f{i}"), format!("t{j}"));
            }
        }
        let m = compute_graph_metrics(&graph);
        assert!((m.coupling_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hub_details_carry_blast_pct() {
        let m = compute_graph_metrics(&star("core.ts", 3));
        let detail = &m.hub_details["core.ts"];
        assert_eq!(detail.fan_in, 3);
        assert_eq!(detail.fan_out, 0);
        assert!((detail.blast_radius_pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn blast_radius_lists_direct_dependents() {
        let graph = DependencyGraph::from_edges([
            ("a.py", vec!["core.py"]),
            ("b.py", vec!["core.py"]),
            ("core.py", vec![]),
        ]);
        let br = blast_radius(&graph, "core.py");
        assert_eq!(br.direct_dependents, vec!["a.py", "b.py"]);
        assert_eq!(br.blast_radius, 2);
        assert!((br.blast_radius_pct - 66.7).abs() < 1e-9);

        let none = blast_radius(&DependencyGraph::new(), "core.py");
        assert_eq!(none.blast_radius, 0);
    }

    #[test]
    fn detects_cycles_and_self_loops() {
        let graph = DependencyGraph::from_edges([
            ("a.py", vec!["b.py"]),
            ("b.py", vec!["c.py"]),
            ("c.py", vec!["a.py"]),
            ("d.py", vec!["d.py"]),
            ("e.py", vec!["a.py", "os"]),
        ]);
        let m = compute_graph_metrics(&graph);
        assert_eq!(m.cycles.len(), 2);
        assert_eq!(m.cycles[0], vec!["a.py", "b.py", "c.py"]);
        assert_eq!(m.cycles[1], vec!["d.py"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let m = compute_graph_metrics(&star("hub.py", 4));
        assert!(m.cycles.is_empty());
    }

    // ── Property-based invariants ─────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
            prop::collection::vec((0usize..8, prop::collection::vec(0usize..12, 0..6)), 0..10)
                .prop_map(|entries| {
                    DependencyGraph::from_edges(entries.into_iter().map(|(src, targets)| {
                        (
                            format!("f{src}.py"),
                            targets.into_iter().map(|t| format!("f{t}.py")).collect::<Vec<_>>(),
                        )
                    }))
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn fan_in_counts_importers(graph in arb_graph()) {
                let m = compute_graph_metrics(&graph);
                for i in 0..12 {
                    let node = format!("f{i}.py");
                    let importers = graph.iter().filter(|(_, deps)| deps.contains(&node)).count();
                    prop_assert_eq!(m.fan_in(&node), importers);
                }
                prop_assert_eq!(m.total_nodes, graph.len());
                prop_assert_eq!(m.fan_in.values().sum::<usize>(), graph.edge_count());
            }

            #[test]
            fn coupling_stays_in_unit_range(graph in arb_graph()) {
                let m = compute_graph_metrics(&graph);
                prop_assert!((0.0..=1.0).contains(&m.coupling_score));
                prop_assert!(m.hubs.len() <= 10);
                prop_assert!(m.leaves.len() <= 10);
            }
        }
    }
}
