//! Criterion benchmarks for swag_core analysis
//!
//! Run with: cargo bench -p swag_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use swag_core::allocation::optimize_all;
use swag_core::analyzer::{analyze, create_default_input, quick_analyze};
use swag_core::config::HouseholdInput;
use swag_core::generate::{generate_ensemble, generate_scenario};
use swag_core::rng::driver_rng;
use swag_core::simulation::{PathOptions, SimulationContext, simulate_path};

fn create_bench_input(n_paths: usize, horizon_years: usize) -> HouseholdInput {
    let mut input = create_default_input("bench-household");
    input.scenario.master_seed = "bench".to_string();
    input.scenario.n_paths = n_paths;
    input.scenario.horizon_years = horizon_years;
    input.scenario.stress.per_stress_paths = 25;
    input
}

fn bench_scenario_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario_generation");
    let config = create_bench_input(1000, 40).scenario;

    group.bench_function("single_path_40yr", |b| {
        b.iter(|| generate_scenario(black_box(&config), black_box(7)))
    });

    for paths in [100, 500, 1000] {
        group.bench_with_input(BenchmarkId::new("ensemble", paths), &paths, |b, &paths| {
            b.iter(|| generate_ensemble(black_box(&config), black_box(paths)))
        });
    }

    group.finish();
}

fn bench_allocation(c: &mut Criterion) {
    let input = create_bench_input(100, 40);
    let scenarios = generate_ensemble(&input.scenario, 100).unwrap();

    c.bench_function("optimize_all_phases", |b| {
        b.iter(|| optimize_all(black_box(&input.risk), black_box(&scenarios)))
    });
}

fn bench_path_simulation(c: &mut Criterion) {
    let input = create_bench_input(100, 40);
    let scenarios = generate_ensemble(&input.scenario, 100).unwrap();
    let allocations = optimize_all(&input.risk, &scenarios).unwrap();
    let ctx = SimulationContext::new(&input, &allocations);

    c.bench_function("simulate_single_path_40yr", |b| {
        b.iter(|| {
            let mut rng = driver_rng("bench", "path0_ltc");
            simulate_path(
                black_box(&ctx),
                black_box(&scenarios[0]),
                PathOptions::default(),
                &mut rng,
            )
        })
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    group.sample_size(20);

    for paths in [100, 250] {
        let input = create_bench_input(paths, 40);
        group.bench_with_input(BenchmarkId::new("analyze", paths), &input, |b, input| {
            b.iter(|| analyze(black_box(input)))
        });
    }

    let input = create_bench_input(1000, 40);
    group.bench_function("quick_analyze_1000_paths", |b| {
        b.iter(|| quick_analyze(black_box(&input)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scenario_generation,
    bench_allocation,
    bench_path_simulation,
    bench_full_analysis,
);
criterion_main!(benches);
