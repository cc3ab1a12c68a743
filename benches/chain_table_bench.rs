use chained_hashmap::chain_table::ChainTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn filled(n: usize, buckets: usize) -> (ChainTable<u64, u64>, Vec<u64>) {
    let mut t = ChainTable::with_buckets(buckets).unwrap();
    let hashes: Vec<u64> = lcg(3).take(n).collect();
    for (i, &h) in hashes.iter().enumerate() {
        t.insert_front(h, h, i as u64);
    }
    (t, hashes)
}

fn bench_insert_front(c: &mut Criterion) {
    c.bench_function("table::insert_front_100k", |b| {
        b.iter_batched(
            || ChainTable::<u64, u64>::with_buckets(1 << 17).unwrap(),
            |mut t| {
                for (i, h) in lcg(1).take(100_000).enumerate() {
                    t.insert_front(h, h, i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_grow(c: &mut Criterion) {
    c.bench_function("table::grow_100k_entries", |b| {
        b.iter_batched(
            || filled(100_000, 1 << 16).0,
            |mut t| {
                t.grow(1 << 17).unwrap();
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_long_chains(c: &mut Criterion) {
    // 16 buckets for 10k entries: ~625 per chain.
    let (t, hashes) = filled(10_000, 16);
    c.bench_function("table::find_long_chains", |b| {
        b.iter(|| {
            for &h in hashes.iter().step_by(100) {
                black_box(t.find(h, |k| *k == h));
            }
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_front, bench_grow, bench_find_long_chains
}
criterion_main!(benches);
