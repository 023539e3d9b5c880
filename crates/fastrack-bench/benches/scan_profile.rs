//! Criterion benchmarks for whole scans.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fastrack_bench::{reference_profile, stress_profile};
use fastrack_engine::{Solver, WorkerConfig};

fn bench_reference_scan(c: &mut Criterion) {
    let p = reference_profile().unwrap();
    let solver = Solver::new(p.geometry, p.config).unwrap();

    c.bench_function("scan_its3_40", |b| {
        b.iter(|| {
            let report = solver.solve(&p.grid).unwrap();
            black_box(&report);
        });
    });
}

fn bench_reference_scan_serial(c: &mut Criterion) {
    let mut p = reference_profile().unwrap();
    p.config.workers = WorkerConfig {
        worker_count: Some(1),
    };
    let solver = Solver::new(p.geometry, p.config).unwrap();

    c.bench_function("scan_its3_40_serial", |b| {
        b.iter(|| {
            let report = solver.solve(&p.grid).unwrap();
            black_box(&report);
        });
    });
}

fn bench_stress_scan(c: &mut Criterion) {
    let p = stress_profile().unwrap();
    let solver = Solver::new(p.geometry, p.config).unwrap();

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("scan_its3_tpc_trd_500", |b| {
        b.iter(|| {
            let report = solver.solve(&p.grid).unwrap();
            black_box(&report);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_reference_scan,
    bench_reference_scan_serial,
    bench_stress_scan
);
criterion_main!(benches);
