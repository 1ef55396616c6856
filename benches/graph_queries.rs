//! Benchmarks for graph queries and export
//!
//! Builds layered solution graphs where every project references a few
//! projects in the next layer plus a handful of packages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dependify::export::{export_to_string, ExportFormat, MermaidOptions};
use dependify::graph::{DependencyGraph, Edge, Node};

/// Create a layered graph with roughly `total_projects` projects
fn create_layered_graph(total_projects: usize, width: usize, fan_out: usize) -> DependencyGraph {
    let root = Node::solution(Some("/repo/Bench.sln")).unwrap();
    let projects: Vec<Node> = (0..total_projects)
        .map(|i| Node::project(&format!("/repo/src/P{i}/P{i}.csproj")).unwrap())
        .collect();
    let packages: Vec<Node> = (0..50)
        .map(|i| Node::package(&format!("Package{i}"), Some("1.0.0")).unwrap())
        .collect();

    let mut builder = DependencyGraph::builder(root.clone());
    builder.with_nodes(projects.iter().cloned());
    builder.with_nodes(packages.iter().cloned());

    for project in projects.iter().take(width) {
        builder.with_edge(Edge::new(root.clone(), project.clone()));
    }

    for (i, project) in projects.iter().enumerate() {
        let next_layer = (i / width + 1) * width;
        for j in 0..fan_out {
            if let Some(child) = projects.get(next_layer + (i + j) % width) {
                builder.with_edge(Edge::new(project.clone(), child.clone()));
            }
        }
        for j in 0..3 {
            let package = &packages[(i * 7 + j) % packages.len()];
            builder.with_edge(Edge::new(project.clone(), package.clone()));
        }
    }

    builder.build()
}

/// Benchmark transitive subgraph extraction from the root
fn bench_subgraph(c: &mut Criterion) {
    let mut group = c.benchmark_group("subgraph");

    for size in [100, 500, 1000, 2000].iter() {
        let graph = create_layered_graph(*size, 20, 3);
        let root = graph.root().cloned().unwrap();

        group.bench_with_input(BenchmarkId::new("nodes", size), size, |b, _| {
            b.iter(|| black_box(graph.subgraph(&root)));
        });

        group.bench_with_input(BenchmarkId::new("nodes_no_packages", size), size, |b, _| {
            b.iter(|| black_box(graph.subgraph_filtered(&root, |n| !n.is_package())));
        });
    }

    group.finish();
}

/// Benchmark direct descendant and ascendant lookups for every node
fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");

    for size in [500, 2000].iter() {
        let graph = create_layered_graph(*size, 20, 3);
        let nodes: Vec<Node> = graph.nodes().cloned().collect();

        group.bench_with_input(BenchmarkId::new("all_nodes", size), &nodes, |b, nodes| {
            b.iter(|| {
                for node in nodes {
                    black_box(graph.find_descendants(node));
                    black_box(graph.find_ascendants(node));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark rendering in each export format
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let graph = create_layered_graph(1000, 20, 3);
    let options = MermaidOptions::default();

    for format in [
        ExportFormat::Dot,
        ExportFormat::Mermaid,
        ExportFormat::MermaidC4,
        ExportFormat::Json,
    ] {
        group.bench_function(format.to_string(), |b| {
            b.iter(|| black_box(export_to_string(format, &graph, &options).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_subgraph, bench_neighbors, bench_export);
criterion_main!(benches);
