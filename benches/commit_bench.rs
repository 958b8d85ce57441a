use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use strata_graph::prelude::*;

fn build_chain(len: usize) -> Graph {
    Graph::<(), ()>::new()
        .with_mutations(|m| {
            m.add_nodes((0..len).map(|i| Node::bare(format!("n{i}"))));
            m.add_edges(
                (1..len).map(|i| Edge::between(format!("n{}", i - 1), format!("n{i}"))),
            );
        })
        .expect("chain is acyclic")
}

fn build_random_dag(nodes: usize, edges: usize, seed: u64) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    Graph::<(), ()>::new()
        .with_mutations(|m| {
            m.add_nodes((0..nodes).map(|i| Node::bare(format!("n{i}"))));
            for _ in 0..edges {
                let a = rng.gen_range(0..nodes - 1);
                let b = rng.gen_range(a + 1..nodes);
                m.add_edge(Edge::between(format!("n{a}"), format!("n{b}")));
            }
        })
        .expect("forward edges cannot cycle")
}

fn bench_batched_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("batched_construction");
    for &len in &[100usize, 1000usize] {
        group.bench_with_input(BenchmarkId::new("chain", len), &len, |b, &len| {
            b.iter(|| black_box(build_chain(len)));
        });
        group.bench_with_input(BenchmarkId::new("random_dag", len), &len, |b, &len| {
            b.iter(|| black_box(build_random_dag(len, len * 2, 42)));
        });
    }
    group.finish();
}

fn bench_incremental_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_commit");
    for &len in &[100usize, 1000usize] {
        let base = build_chain(len);

        // one forward edge: probe skips, only local re-layering
        group.bench_with_input(BenchmarkId::new("skip_edge", len), &len, |b, _| {
            b.iter(|| {
                let next = base
                    .add_edge(Edge::between("n0", format!("n{}", len - 1)))
                    .expect("forward edge");
                black_box(next);
            });
        });

        // cut the chain in the middle: half the nodes cascade back to layer 0
        group.bench_with_input(BenchmarkId::new("relayer_half", len), &len, |b, _| {
            let mid = len / 2;
            b.iter(|| {
                let next = base
                    .remove_edge(format!("n{}-n{}", mid - 1, mid))
                    .expect("removal is total");
                black_box(next);
            });
        });

        // rejected commit: probe walks the whole chain, then unwinds
        group.bench_with_input(BenchmarkId::new("reject_cycle", len), &len, |b, _| {
            b.iter(|| {
                let err = base
                    .add_edge(Edge::between(format!("n{}", len - 1), "n0"))
                    .unwrap_err();
                black_box(err);
            });
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let g = build_random_dag(1000, 2000, 7);
    group.bench_function("layer_of", |b| {
        b.iter(|| {
            for i in (0..1000).step_by(37) {
                black_box(g.layer_of(&format!("n{i}")));
            }
        });
    });
    group.bench_function("node_ids_cached", |b| {
        b.iter(|| black_box(g.node_ids().len()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_batched_construction,
    bench_incremental_commit,
    bench_queries
);
criterion_main!(benches);
