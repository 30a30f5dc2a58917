//! Criterion micro-benchmarks for the Robin-Hood hash map.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use sara_bench::large_arena;
use sara_map::TaggedMap;

/// Benchmark: insert throughput including the growth schedule.
fn bench_map_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_put");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("put_10k", |b| {
        b.iter(|| {
            let mut arena = large_arena();
            let mut map = TaggedMap::new(&mut arena, 0).unwrap();
            for key in 1..=10_000u64 {
                map.put(&mut arena, std::hint::black_box(key), key, true)
                    .unwrap();
            }
        });
    });
    group.finish();
}

/// Benchmark: steady-state lookups on a pre-populated map.
fn bench_map_get(c: &mut Criterion) {
    let mut arena = large_arena();
    let mut map = TaggedMap::new(&mut arena, 10_000).unwrap();
    for key in 1..=10_000u64 {
        map.put(&mut arena, key, key * 3, true).unwrap();
    }

    let mut key = 1u64;
    c.bench_function("get_hit_10k", |b| {
        b.iter(|| {
            key = key % 10_000 + 1;
            std::hint::black_box(map.get(&mut arena, key).unwrap());
        });
    });

    let mut miss = 0u64;
    c.bench_function("get_miss_10k", |b| {
        b.iter(|| {
            miss = miss.wrapping_add(1);
            std::hint::black_box(map.get(&mut arena, 1_000_000 + miss).is_err());
        });
    });
}

/// Benchmark: put/remove churn at a stable occupancy.
fn bench_map_churn(c: &mut Criterion) {
    let mut arena = large_arena();
    let mut map = TaggedMap::new(&mut arena, 10_000).unwrap();
    for key in 1..=8_000u64 {
        map.put(&mut arena, key, key, true).unwrap();
    }

    let mut next = 8_000u64;
    c.bench_function("churn_put_remove", |b| {
        b.iter(|| {
            next += 1;
            map.put(&mut arena, next, next, true).unwrap();
            map.remove(&mut arena, std::hint::black_box(next - 8_000)).unwrap();
        });
    });
}

criterion_group!(benches, bench_map_put, bench_map_get, bench_map_churn);
criterion_main!(benches);
