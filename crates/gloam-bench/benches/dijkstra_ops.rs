//! Criterion micro-benchmarks for distance-map searches.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gloam_bench::pillar_hall;
use gloam_core::Pos;
use gloam_path::{DistanceMap, ExploreCache, ExplorePath, NoisePath, NormalPath};

/// Benchmark: unbounded movement map from one source over a 100x100 hall.
fn bench_normal_single_source_10k(c: &mut Criterion) {
    let d = pillar_hall(100);
    let model = NormalPath::new(&d);

    c.bench_function("normal_single_source_10k", |b| {
        b.iter(|| {
            let map = DistanceMap::compute(&model, &[Pos::new(50, 50)], u32::MAX);
            black_box(map.len());
        });
    });
}

/// Benchmark: bounded noise map, walls at cost 4, radius 20.
fn bench_noise_radius_20(c: &mut Criterion) {
    let d = pillar_hall(100);
    let model = NoisePath::new(&d, 4);

    c.bench_function("noise_radius_20", |b| {
        b.iter(|| {
            let map = DistanceMap::compute(&model, &[Pos::new(50, 50)], 20);
            black_box(map.len());
        });
    });
}

/// Benchmark: exploration map seeded from 64 scattered sources.
fn bench_explore_multi_source(c: &mut Criterion) {
    let d = pillar_hall(100);
    let model = ExplorePath::new(&d);
    let sources: Vec<Pos> = (0..64)
        .map(|i| Pos::new((i * 37) % 100, (i * 53) % 100))
        .collect();

    c.bench_function("explore_multi_source_64", |b| {
        b.iter(|| {
            let map = DistanceMap::compute(&model, &sources, u32::MAX);
            black_box(map.bands().len());
        });
    });
}

/// Benchmark: repeated exploration lookups against an unchanged level.
fn bench_explore_cache_hit(c: &mut Criterion) {
    let d = pillar_hall(100);
    let mut cache = ExploreCache::new();
    let sources = [Pos::new(0, 0), Pos::new(99, 99)];
    cache.get_or_compute(&d, &sources);

    c.bench_function("explore_cache_hit", |b| {
        b.iter(|| {
            let map = cache.get_or_compute(&d, &sources);
            black_box(map.len());
        });
    });
}

criterion_group!(
    benches,
    bench_normal_single_source_10k,
    bench_noise_radius_20,
    bench_explore_multi_source,
    bench_explore_cache_hit,
);
criterion_main!(benches);
