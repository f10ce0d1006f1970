use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use plex::prelude::*;

fn random_graph(n: u32, p: f64, seed: u64) -> CsrGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            if rng.gen_bool(p) {
                edges.push((a, b));
            }
        }
    }
    CsrGraph::from_edges(n, edges)
}

fn preprocess(c: &mut Criterion) {
    let sparse = random_graph(2_000, 0.005, 42);
    c.bench_function("preprocess_sparse_2000", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::new(black_box(sparse.clone()), SolverConfig::new(2));
            pipeline.preprocess();
            black_box(pipeline.lb())
        })
    });

    let dense = random_graph(300, 0.2, 42);
    c.bench_function("preprocess_dense_300", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::new(black_box(dense.clone()), SolverConfig::new(3));
            pipeline.preprocess();
            black_box(pipeline.lb())
        })
    });
}

fn exclusion_loop(c: &mut Criterion) {
    let graph = random_graph(400, 0.05, 7);
    c.bench_function("exclusion_loop_400", |b| {
        b.iter(|| {
            let mut cfg = SolverConfig::new(2);
            cfg.matrix_max_nodes = 0;
            let mut reduced = ReducedGraph::from_csr(black_box(&graph), &VertexSet::new(), &cfg);
            reduced.init_before_search();
            reduced.ctcp(2, None);
            while let Some(seed) = reduced.min_degree_vertex() {
                reduced.exclude(seed, 2, false);
            }
            black_box(reduced.node_count())
        })
    });
}

criterion_group!(benches, preprocess, exclusion_loop);
criterion_main!(benches);
