//! Criterion benchmarks for the difference operator and whole runs.

use std::hint::black_box;

use awfd::grid::*;
use awfd::model::*;
use awfd::solver::*;
use awfd::stencil::*;
use awfd::util::*;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_difference(c: &mut Criterion) {
    let coefficients =
        StencilCoefficients::solve(4, GridType::Staggered).unwrap();
    let field = Grid::from_fn(
        vector![512, 512],
        |c: Coord<2>| ((c[0] * 7 + c[1] * 13) % 17) as f64,
        4096,
    );

    c.bench_function("difference_z_512", |b| {
        b.iter(|| {
            let d = difference(&field, coefficients.weights(), 10.0, 0)
                .unwrap();
            black_box(&d);
        });
    });
    c.bench_function("difference_x_512", |b| {
        b.iter(|| {
            let d = difference(&field, coefficients.weights(), 10.0, 1)
                .unwrap();
            black_box(&d);
        });
    });
}

fn bench_forward(c: &mut Criterion) {
    let (nz, nx, nt) = (200, 240, 20);
    let velocity = homogeneous_velocity(nz, nx, 2000.0, 4096);
    let wavelet = ricker(15.0, 0.08, 1e-3, nt);
    let source = point_source(nz, nx, 100, 120, &wavelet).unwrap();
    let input = ModelInput::new(velocity, source).unwrap();
    let params = SimulationParameters {
        chunk_size: 4096,
        ..Default::default()
    };

    let mut group = c.benchmark_group("forward_200x240x20");
    group.sample_size(10);
    for workers in [1, 4] {
        group.bench_function(format!("workers_{workers}"), |b| {
            b.iter(|| {
                let output =
                    run_forward_model(workers, &params, &input).unwrap();
                black_box(&output);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_difference, bench_forward);
criterion_main!(benches);
