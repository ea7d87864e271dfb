// Directed traversal graph and bounded breadth-first propagation.
//
// The traversal graph is a petgraph projection of a `DependencyGraph` whose
// edge direction is chosen by the caller: forward (importer → imported) or
// reverse (imported → importer, i.e. failure flows to consumers).

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// `A imports B` becomes `A → B`.
    Forward,
    /// `A imports B` becomes `B → A`.
    Reverse,
}

/// One node reached by [`TraversalGraph::bfs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub node: String,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct TraversalGraph {
    graph: DiGraph<String, ()>,
    node_to_index: HashMap<String, NodeIndex>,
}

impl TraversalGraph {
    /// Project `deps` into a digraph. Import targets that are not keys
    /// still become nodes.
    pub fn from_dependency_graph(deps: &DependencyGraph, direction: EdgeDirection) -> Self {
        let mut tg = Self {
            graph: DiGraph::new(),
            node_to_index: HashMap::new(),
        };
        for file in deps.files() {
            tg.intern(file);
        }
        for (src, targets) in deps.iter() {
            let src_idx = tg.intern(src);
            for target in targets {
                let dst_idx = tg.intern(target);
                match direction {
                    EdgeDirection::Forward => tg.graph.add_edge(src_idx, dst_idx, ()),
                    EdgeDirection::Reverse => tg.graph.add_edge(dst_idx, src_idx, ()),
                };
            }
        }
        tg
    }

    fn intern(&mut self, node: &str) -> NodeIndex {
        if let Some(&idx) = self.node_to_index.get(node) {
            return idx;
        }
        let idx = self.graph.add_node(node.to_string());
        self.node_to_index.insert(node.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.node_to_index.contains_key(node)
    }

    /// Outgoing neighbours of `node` in node-insertion order.
    pub fn neighbors(&self, node: &str) -> Vec<&str> {
        let Some(&idx) = self.node_to_index.get(node) else {
            return Vec::new();
        };
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.sort_unstable();
        out.dedup();
        out.into_iter().map(|i| self.graph[i].as_str()).collect()
    }

    /// Bounded BFS from `starts`.
    ///
    /// Every start is emitted at depth 0, even when it is not a node of the
    /// graph. A node is emitted at most once. Nodes at `max_depth` are not
    /// expanded. `allow(from, to)` filters which edges may be followed.
    pub fn bfs<'a, F>(
        &self,
        starts: impl IntoIterator<Item = &'a str>,
        max_depth: usize,
        allow: F,
    ) -> Vec<Visit>
    where
        F: Fn(&str, &str) -> bool,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        let mut order = Vec::new();

        for start in starts {
            if visited.insert(start) {
                queue.push_back((start, 0));
            }
        }

        while let Some((node, depth)) = queue.pop_front() {
            order.push(Visit {
                node: node.to_string(),
                depth,
            });
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors(node) {
                if !visited.contains(next) && allow(node, next) {
                    visited.insert(next);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        order
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
