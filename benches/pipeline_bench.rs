//! Pipeline throughput benchmarks

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seqlane::{ActiveSequence, IntSequence, LazySequence};

const SIZES: [usize; 2] = [1_000, 100_000];

fn benchmark_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_map_sum");
    for size in SIZES {
        let data: Arc<[i64]> = (0..size as i64).collect::<Vec<_>>().into();

        group.bench_with_input(BenchmarkId::new("array", size), &data, |b, data| {
            b.iter(|| {
                ActiveSequence::from_array(Arc::clone(data))
                    .filter(|x| x % 3 == 0)
                    .map(|x| x * 2)
                    .fold(0i64, |acc, x| acc + x)
            });
        });

        group.bench_with_input(BenchmarkId::new("host_iter", size), &size, |b, &size| {
            b.iter(|| {
                ActiveSequence::from_host(0..size as i64)
                    .filter(|x| x % 3 == 0)
                    .map(|x| x * 2)
                    .fold(0i64, |acc, x| acc + x)
            });
        });

        group.bench_with_input(BenchmarkId::new("int_lane", size), &size, |b, &size| {
            b.iter(|| {
                IntSequence::range(0, size as i32)
                    .filter(|x| x % 3 == 0)
                    .map(|x| x * 2)
                    .sum()
            });
        });
    }
    group.finish();
}

fn benchmark_bulk_extraction(c: &mut Criterion) {
    let data: Vec<u32> = (0..100_000).collect();
    let lazy = LazySequence::from_vec(data);

    c.bench_function("lazy_to_vec_100k", |b| {
        b.iter(|| black_box(lazy.to_vec()));
    });

    c.bench_function("lazy_sorted_desc_100k", |b| {
        let descending = lazy.sorted_by(|a, b| b.cmp(a));
        b.iter(|| black_box(descending.first()));
    });
}

criterion_group!(benches, benchmark_backends, benchmark_bulk_extraction);
criterion_main!(benches);
