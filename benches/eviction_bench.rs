//! Benchmarks for eviction key computation and victim selection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kv_cache_evict::{EvictionStrategy, Evictor, NodeStats, PolicyKind, StrategyParams};

fn make_nodes(count: u64) -> Vec<(u64, NodeStats)> {
    (0..count)
        .map(|i| {
            let created = i as f64;
            let node = NodeStats::new(created)
                .with_last_access(created + ((i * 7_919) % 10_000) as f64)
                .with_hits(i % 37)
                .with_priority((i % 5) as i64 - 2)
                .with_seq_start_offset((i % 64) * 16);
            (i, node)
        })
        .collect()
}

fn bench_priority(c: &mut Criterion) {
    let nodes = make_nodes(10_000);

    for kind in PolicyKind::ALL {
        let strategy = EvictionStrategy::from_kind(kind, StrategyParams::default()).unwrap();
        c.bench_function(&format!("priority_{kind}_10k"), |b| {
            b.iter(|| {
                for (_, node) in &nodes {
                    black_box(strategy.priority(black_box(node)));
                }
            })
        });
    }
}

fn bench_select_victims(c: &mut Criterion) {
    let nodes = make_nodes(10_000);
    let evictor = Evictor::new(EvictionStrategy::sink_lru());

    c.bench_function("select_100_from_10k", |b| {
        b.iter(|| {
            let victims = evictor.select_victims(
                black_box(nodes.iter().map(|(id, n)| (*id, n))),
                100,
                &[],
            );
            black_box(victims);
        })
    });

    c.bench_function("rank_10k", |b| {
        b.iter(|| {
            let ranked = evictor.rank(black_box(nodes.iter().map(|(id, n)| (*id, n))), &[]);
            black_box(ranked);
        })
    });
}

criterion_group!(benches, bench_priority, bench_select_victims);
criterion_main!(benches);
