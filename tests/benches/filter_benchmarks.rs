//! # Membership Store Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | `contains_or_update`, fresh keys | < 1µs |
//! | `contains_or_update`, 8 threads, 5 shards | scales with shard count |
//! | shard flush at default size | < 1ms |

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use metrics_meta_filter::{ShardedBloomFilter, StoreConfig};
use rand::Rng;

fn random_keys(n: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| format!("servers.host{}.cpu.load", rng.gen::<u32>()).into_bytes())
        .collect()
}

fn filter(shards: usize) -> ShardedBloomFilter {
    let config = StoreConfig::new(100_000, 0.01, shards, Duration::from_secs(600))
        .expect("valid benchmark config");
    ShardedBloomFilter::new(&config).expect("valid benchmark config")
}

fn bench_contains_or_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains-or-update");
    let keys = random_keys(10_000);

    for shards in [1, 5, 16] {
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("sequential", shards), &shards, |b, &shards| {
            b.iter_batched(
                || filter(shards),
                |filter| {
                    for key in &keys {
                        black_box(filter.contains_or_update(key));
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    const THREADS: usize = 8;
    let mut group = c.benchmark_group("contains-or-update-contended");
    group.measurement_time(Duration::from_secs(10));

    let keys = Arc::new(random_keys(THREADS * 2_000));
    for shards in [1, 5, 16] {
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::new("threads-8", shards), &shards, |b, &shards| {
            b.iter(|| {
                let filter = Arc::new(filter(shards));
                let handles: Vec<_> = (0..THREADS)
                    .map(|t| {
                        let filter = Arc::clone(&filter);
                        let keys = Arc::clone(&keys);
                        thread::spawn(move || {
                            for key in keys.iter().skip(t).step_by(THREADS) {
                                black_box(filter.contains_or_update(key));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("benchmark thread panicked");
                }
            })
        });
    }
    group.finish();
}

fn bench_flush(c: &mut Criterion) {
    let filter = filter(5);
    for key in random_keys(20_000) {
        filter.insert(&key);
    }

    c.bench_function("flush-default-shard", |b| {
        b.iter(|| black_box(filter.flush(0)))
    });
}

criterion_group!(benches, bench_contains_or_update, bench_contended, bench_flush);
criterion_main!(benches);
