//! Benchmarks for the affinity pool's hot paths: queue enqueue/dequeue,
//! router convergence, and end-to-end submission throughput.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use prometheus_affinity_pool::config::{AffinityPoolConfig, WaitStrategyKind};
use prometheus_affinity_pool::core::{AffinityRouter, BoundedQueue, Pool};
use prometheus_affinity_pool::runtime::NativeThreadFactory;

fn bench_queue_enqueue_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_enqueue_dequeue");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let queue = BoundedQueue::new(size as usize);
                for i in 0..size {
                    queue.add(Box::new(move || { black_box(i); })).unwrap();
                }
                while let Some(task) = queue.poll() {
                    task();
                }
            });
        });
    }
    group.finish();
}

fn bench_queue_add_under_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_add_under_contention");

    for producers in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let queue = Arc::new(BoundedQueue::new(4096));
                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            std::thread::spawn(move || {
                                for _ in 0..256 {
                                    let _ = queue.add(Box::new(|| {}));
                                }
                            })
                        })
                        .collect();
                    for h in handles {
                        h.join().unwrap();
                    }
                    while queue.poll().is_some() {}
                });
            },
        );
    }
    group.finish();
}

fn bench_router_first_seen_vs_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("router_route");

    group.bench_function("first_seen", |b| {
        b.iter(|| {
            let router = AffinityRouter::new(16);
            for i in 0..1000u64 {
                black_box(router.route(&i));
            }
        });
    });

    group.bench_function("steady_state_repeat", |b| {
        let router = AffinityRouter::new(16);
        router.route(&42u64);
        b.iter(|| {
            for _ in 0..1000 {
                black_box(router.route(&42u64));
            }
        });
    });

    group.finish();
}

fn bench_pool_submit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_submit_throughput");

    for parallelism in [1usize, 4, 8] {
        group.throughput(Throughput::Elements(500));
        group.bench_with_input(
            BenchmarkId::from_parameter(parallelism),
            &parallelism,
            |b, &parallelism| {
                let config = AffinityPoolConfig::new()
                    .with_parallelism(parallelism, 1.0, parallelism)
                    .with_affinity_group_size(4096)
                    .with_wait_strategy(WaitStrategyKind::BusySpin);
                let pool = Pool::new(config, NativeThreadFactory::default()).unwrap();
                let completed = Arc::new(AtomicUsize::new(0));

                b.iter(|| {
                    completed.store(0, Ordering::Relaxed);
                    for i in 0..500u64 {
                        let completed = Arc::clone(&completed);
                        let _ = pool.execute(i % (parallelism as u64 * 4), move || {
                            completed.fetch_add(1, Ordering::Relaxed);
                        });
                    }
                    while completed.load(Ordering::Relaxed) < 500 {
                        std::thread::yield_now();
                    }
                });

                pool.shutdown();
                pool.await_termination(Duration::from_secs(5));
            },
        );
    }
    group.finish();
}

criterion_group!(
    queue_benches,
    bench_queue_enqueue_dequeue,
    bench_queue_add_under_contention
);

criterion_group!(router_benches, bench_router_first_seen_vs_steady_state);

criterion_group!(pool_benches, bench_pool_submit_throughput);

criterion_main!(queue_benches, router_benches, pool_benches);
