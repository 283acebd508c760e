//! Criterion benchmarks for the event queue and whole-simulation turns.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gloam_bench::{reference_profile, stress_profile};
use gloam_core::{MonsterId, Tick};
use gloam_engine::{Action, Command, EventQueue};

/// Benchmark: push 10K events at scattered ranks, then drain them.
fn bench_queue_push_pop_10k(c: &mut Criterion) {
    c.bench_function("queue_push_pop_10k", |b| {
        b.iter(|| {
            let mut q = EventQueue::new();
            for i in 0u64..10_000 {
                let rank = Tick(i.wrapping_mul(2862933555777941757) % 1000);
                let monster = MonsterId((i % 64) as u32);
                q.push(rank, Action::MonsterTurn { monster });
            }
            while let Some(e) = q.pop_next() {
                black_box(e);
            }
        });
    });
}

/// Benchmark: 100 player waits on the 64x64 reference profile.
fn bench_reference_100_turns(c: &mut Criterion) {
    c.bench_function("reference_100_turns", |b| {
        b.iter_batched(
            || reference_profile(42),
            |mut sim| {
                for _ in 0..100 {
                    let _ = sim.act(Command::Wait);
                }
                black_box(sim.now());
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: 20 ticks of the 200x200 stress profile with 256 monsters.
fn bench_stress_20_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("stress_20_ticks", |b| {
        b.iter_batched(
            || stress_profile(42),
            |mut sim| {
                sim.run_until(Tick(20));
                black_box(sim.metrics());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_queue_push_pop_10k,
    bench_reference_100_turns,
    bench_stress_20_ticks,
);
criterion_main!(benches);
