//! Benchmarks for the resource pool hot paths
//!
//! This benchmark measures:
//! - Weighted selection over pools of different sizes
//! - Single-key weight updates (snapshot rebuild + swap)
//! - A full synchronous retry round trip

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use weighted_retry::{predicate, ResourceManager, ResourcePoolExt};

fn pool_of(size: usize) -> ResourceManager<String> {
    ResourceManager::from_sources((0..size).map(|i| format!("https://backend-{}.example.com", i)))
        .unwrap()
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.throughput(Throughput::Elements(1));

    for size in [2usize, 8, 64] {
        let pool = pool_of(size);
        group.bench_with_input(BenchmarkId::new("thread_rng", size), &pool, |b, pool| {
            b.iter(|| black_box(pool.select_randomly()))
        });

        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::new("seeded", size), &pool, |b, pool| {
            b.iter(|| black_box(pool.select_with(&mut rng)))
        });
    }

    group.finish();
}

fn bench_update_weight(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_weight");

    for size in [2usize, 8, 64] {
        let pool = pool_of(size);
        let target = "https://backend-0.example.com".to_string();
        let mut success = false;
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| {
                // alternate so every call changes the weight
                success = !success;
                pool.update_weight(black_box(&target), success)
            })
        });
    }

    group.finish();
}

fn bench_execute_action(c: &mut Criterion) {
    let pool = pool_of(8);
    c.bench_function("execute_action_first_try", |b| {
        b.iter(|| {
            let result: Result<usize, ()> = pool.execute_action(
                |source, attempt| Ok(source.len() + attempt as usize),
                predicate::max_attempts(3),
                None,
            );
            black_box(result)
        })
    });
}

criterion_group!(
    benches,
    bench_selection,
    bench_update_weight,
    bench_execute_action
);
criterion_main!(benches);
