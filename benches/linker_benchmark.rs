use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sparselap_rs::cost::{DistanceCostConfig, SquareDistanceCost};
use sparselap_rs::{AlternativeCost, JaqamanLinker, Point};

/* ----------------------------------------------------------------------------
 * Synthetic frame pairs
 * ---------------------------------------------------------------------------- */

fn random_frame(rng: &mut StdRng, n: usize, frame: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            Point::new_2d(
                (frame * n + i) as u64,
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                frame,
            )
        })
        .collect()
}

fn bench_frame_to_frame_linking(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_to_frame_linking");
    for n in [10usize, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(42);
            let sources = random_frame(&mut rng, n, 0);
            let targets = random_frame(&mut rng, n, 1);
            b.iter(|| {
                let cost_fn = SquareDistanceCost::new(DistanceCostConfig {
                    max_distance: 15.0,
                });
                let mut linker = JaqamanLinker::new(
                    sources.clone(),
                    targets.clone(),
                    cost_fn,
                    AlternativeCost::Constant(15.0 * 15.0 * 1.05),
                );
                linker.process().unwrap();
                linker.result().unwrap().len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frame_to_frame_linking);
criterion_main!(benches);
