// Benchmark graph metrics and bounded BFS at varying graph sizes.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use faultline_graphs::{DependencyGraph, EdgeDirection, TraversalGraph, compute_graph_metrics};

/// Build a synthetic import graph: `node_count` files, ~`edge_factor`
/// imports each, plus a shared `utils.py` hub imported by every tenth file.
fn build_synthetic_graph(node_count: usize, edge_factor: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let primes = [7, 13, 31, 61, 127, 251];

    for i in 0..node_count {
        let file = format!("pkg/mod_{i}.py");
        graph.ensure_file(&file);
        for &prime in &primes[..edge_factor.min(primes.len())] {
            let target = (i.wrapping_mul(prime).wrapping_add(1)) % node_count;
            if target != i {
                graph.add_import(&file, format!("pkg/mod_{target}.py"));
            }
        }
        if i % 10 == 0 {
            graph.add_import(&file, "pkg/utils.py");
        }
    }

    graph
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_metrics");

    for node_count in [1_000, 10_000, 50_000] {
        let graph = build_synthetic_graph(node_count, 3);
        group.bench_with_input(BenchmarkId::new("nodes", node_count), &graph, |b, g| {
            b.iter(|| compute_graph_metrics(g));
        });
    }

    group.finish();
}

fn bench_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_bfs");

    for node_count in [1_000, 10_000, 50_000] {
        let graph = build_synthetic_graph(node_count, 3);
        let tg = TraversalGraph::from_dependency_graph(&graph, EdgeDirection::Reverse);

        group.bench_with_input(BenchmarkId::new("depth3_nodes", node_count), &tg, |b, tg| {
            b.iter(|| tg.bfs(["pkg/utils.py"], 3, |_, _| true));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_metrics, bench_bfs);
criterion_main!(benches);
