use chained_hashmap::ChainedHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn string_hash(key: &&str) -> u64 {
    key.bytes().fold(37u64, |hash, b| {
        hash.wrapping_mul(54059) ^ u64::from(b).wrapping_mul(76963)
    })
}

fn string_equals(left: &&str, right: &&str) -> bool {
    left == right
}

fn bench_put(c: &mut Criterion) {
    let keys: Vec<String> = lcg(1).take(10_000).map(key).collect();
    let mut group = c.benchmark_group("chained::put");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("fresh_10k_growing", |b| {
        b.iter_batched(
            || ChainedHashMap::initialize(0.75, string_hash, string_equals).unwrap(),
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.put(k.as_str(), i).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("fresh_10k_fixed_capacity", |b| {
        b.iter_batched(
            || ChainedHashMap::initialize(f64::MAX, string_hash, string_equals).unwrap(),
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.put(k.as_str(), i).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("overwrite_10k", |b| {
        let mut m = ChainedHashMap::initialize(0.75, string_hash, string_equals).unwrap();
        for (i, k) in keys.iter().enumerate() {
            m.put(k.as_str(), i).unwrap();
        }
        b.iter(|| {
            for (i, k) in keys.iter().enumerate() {
                black_box(m.put(k.as_str(), i + 1).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(20_000).map(key).collect();
    let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
    let mut m = ChainedHashMap::initialize(0.75, string_hash, string_equals).unwrap();
    for (i, k) in keys.iter().enumerate() {
        m.put(k.as_str(), i as u64).unwrap();
    }

    let mut group = c.benchmark_group("chained::get");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("hit_10k_on_20k", |b| {
        b.iter(|| {
            for k in keys.iter().take(10_000) {
                black_box(m.get(&k.as_str()));
            }
        })
    });
    group.bench_function("miss_10k_on_20k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(m.contains(&k.as_str()));
            }
        })
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys: Vec<String> = lcg(11).take(10_000).map(key).collect();
    c.bench_function("chained::remove_all_10k", |b| {
        b.iter_batched(
            || {
                let mut m = ChainedHashMap::initialize(0.75, string_hash, string_equals).unwrap();
                for (i, k) in keys.iter().enumerate() {
                    m.put(k.as_str(), i).unwrap();
                }
                m
            },
            |mut m| {
                for k in &keys {
                    black_box(m.remove(&k.as_str()));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_keys_values(c: &mut Criterion) {
    let keys: Vec<String> = lcg(13).take(10_000).map(key).collect();
    let mut m = ChainedHashMap::initialize(0.75, string_hash, string_equals).unwrap();
    for (i, k) in keys.iter().enumerate() {
        m.put(k.as_str(), i).unwrap();
    }
    c.bench_function("chained::keys_values_10k", |b| {
        b.iter(|| black_box((m.keys(), m.values())))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_put, bench_get, bench_remove, bench_keys_values
}
criterion_main!(benches);
