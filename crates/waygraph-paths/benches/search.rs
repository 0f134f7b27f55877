use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use waygraph_core::{CompactGraph, NodeId};
use waygraph_mesh::{Mesh, MeshConfig};
use waygraph_paths::{Algorithm, MinHeap, Searcher};

fn mesh_graph(side: usize) -> CompactGraph {
    let config = MeshConfig::with_size(side, side).seeded(42);
    Mesh::generate(&config)
        .and_then(|m| m.to_graph())
        .expect("mesh generation")
}

/// Fixed spread of query pairs across the node range.
fn queries(graph: &CompactGraph, count: usize) -> Vec<(NodeId, NodeId)> {
    let n = graph.node_count() as u64;
    (0..count as u64)
        .map(|i| {
            let o = (i * 7919) % n;
            let d = (n - 1 - (i * 104_729) % n) % n;
            (o as NodeId, d as NodeId)
        })
        .collect()
}

fn bench_algorithms(c: &mut Criterion) {
    let graph = mesh_graph(300);
    let pairs = queries(&graph, 8);
    let mut searcher = Searcher::for_graph(&graph);

    let mut group = c.benchmark_group("Search 300x300 mesh");
    group.sample_size(20);
    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &algorithm,
            |b, &algorithm| {
                b.iter(|| {
                    for &(o, d) in &pairs {
                        let p = searcher.search(&graph, o, d, algorithm).expect("valid nodes");
                        black_box(p.len());
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_scratch_reuse(c: &mut Criterion) {
    let graph = mesh_graph(300);
    let pairs = queries(&graph, 4);

    let mut group = c.benchmark_group("Scratch reuse");
    group.sample_size(20);
    group.bench_function("reused searcher", |b| {
        let mut searcher = Searcher::for_graph(&graph);
        b.iter(|| {
            for &(o, d) in &pairs {
                black_box(searcher.dijkstra_path(&graph, o, d).expect("valid nodes"));
            }
        })
    });
    group.bench_function("fresh searcher", |b| {
        b.iter(|| {
            for &(o, d) in &pairs {
                black_box(waygraph_paths::search(&graph, o, d, Algorithm::Dijkstra).expect("valid nodes"));
            }
        })
    });
    group.finish();
}

fn bench_heap(c: &mut Criterion) {
    let size = 100_000u32;
    c.bench_function("MinHeap insert+drain 100k", |b| {
        let mut heap = MinHeap::new(size as usize);
        b.iter(|| {
            for i in 0..size {
                heap.insert(i, f64::from(i.wrapping_mul(2_654_435_761) % size));
            }
            while let Some(id) = heap.extract_min() {
                black_box(id);
            }
        })
    });
}

criterion_group!(benches, bench_algorithms, bench_scratch_reuse, bench_heap);
criterion_main!(benches);
