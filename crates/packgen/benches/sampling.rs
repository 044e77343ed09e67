mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use packgen::placement::sampler::species_for_draw;
use packgen::prelude::{Composition, GridLayout, StackedLayout, WeightedSampler};

const SPECIES_COUNTS: [usize; 4] = [2, 8, 64, 512];
const GRID_SIDES: [usize; 4] = [4, 8, 16, 32];

fn uniform_composition(n: usize) -> Composition {
    let weights: Vec<f64> = (0..n).map(|i| 1.0 + (i % 7) as f64).collect();
    Composition::from_weights(&weights).expect("valid weights")
}

fn sampling_draw_species_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/draw_species");

    for &n in &SPECIES_COUNTS {
        let mut sampler = WeightedSampler::seeded(uniform_composition(n), common::BENCH_SEED);
        group.throughput(common::elements_throughput(1));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(sampler.draw_species()));
        });
    }

    group.finish();
}

fn sampling_cumulative_lookup_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/cumulative_lookup");

    for &n in &SPECIES_COUNTS {
        let composition = uniform_composition(n);
        let draws: Vec<f64> = (0..1024).map(|i| i as f64 / 1024.0).collect();
        group.throughput(common::elements_throughput(draws.len()));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                for &u in &draws {
                    black_box(species_for_draw(composition.cumulative_sums(), u));
                }
            });
        });
    }

    group.finish();
}

fn placement_grid_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/grid");

    for &side in &GRID_SIDES {
        let grid = GridLayout::new([side, side, side], 0.25);
        group.throughput(common::elements_throughput(grid.slot_count()));

        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| {
                let mut sampler =
                    WeightedSampler::seeded(uniform_composition(2), common::BENCH_SEED);
                let plan = grid.plan(&mut sampler).expect("valid grid");
                black_box(plan.requests.len());
            });
        });
    }

    group.finish();
}

fn placement_stacked_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/stacked");
    let footprints = [0.1, 0.15];

    for &count in &[100usize, 1_000, 10_000] {
        let layout = StackedLayout::new(count, 4.0);
        group.throughput(common::elements_throughput(count));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut sampler =
                    WeightedSampler::seeded(uniform_composition(2), common::BENCH_SEED);
                let plan = layout
                    .plan(&mut sampler, &footprints, 0.2)
                    .expect("valid layout");
                black_box(plan.container.height);
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_draw_species_benches,
        sampling_cumulative_lookup_benches,
        placement_grid_benches,
        placement_stacked_benches
}
criterion_main!(benches);
