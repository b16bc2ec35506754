//! Benchmarks for feature assembly
//!
//! Covers the per-event cost of:
//! - Building race and qualifying windows (calendar walk plus hydration)
//! - Assembling records once the windows exist
//! - Rolling means over a full window
//!
//! Platform: Cross-platform (generated fixtures, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use paddock::features::{finish_position, rolling_mean, team_points};
use paddock::test_utils::{fixture_provider, fixture_round};
use paddock::{
    DriverNumber, FeatureAssembler, RollingWindowBuilder, RollingWindowSpec, SessionType,
};
use std::hint::black_box;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("Failed to build runtime")
}

fn bench_window_build(c: &mut Criterion) {
    let rt = runtime();
    let provider = fixture_provider(&[(2023, 22), (2024, 24)]);
    let [race, _] = fixture_round(2024, 3);

    let mut group = c.benchmark_group("window_build");
    for size in [1usize, 5, 10, 20] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(size));
            b.iter(|| {
                let window = rt.block_on(builder.build(black_box(&race), SessionType::Race));
                black_box(window)
            })
        });
    }
    group.finish();
}

fn bench_event_assembly(c: &mut Criterion) {
    let rt = runtime();
    let provider = fixture_provider(&[(2024, 24)]);
    let [race, quali] = fixture_round(2024, 12);
    let assembler = FeatureAssembler::new(&provider, RollingWindowSpec::new(5), 0.2);
    let windows = rt.block_on(assembler.event_windows(&race));
    let drivers = race.drivers();

    c.bench_function("assemble_event", |b| {
        b.iter(|| {
            let records = rt.block_on(assembler.assemble_event(black_box(&race), black_box(&quali)));
            black_box(records)
        })
    });

    c.bench_function("assemble_records_prebuilt_windows", |b| {
        b.iter(|| {
            for driver in &drivers {
                black_box(assembler.assemble(driver, &race, &quali, &windows));
            }
        })
    });
}

fn bench_rolling_mean(c: &mut Criterion) {
    let rt = runtime();
    let provider = fixture_provider(&[(2024, 24)]);
    let [race, _] = fixture_round(2024, 24);
    let builder = RollingWindowBuilder::new(&provider, RollingWindowSpec::new(20));
    let window = rt.block_on(builder.build(&race, SessionType::Race));
    let driver = DriverNumber::from("44");

    let mut group = c.benchmark_group("rolling_mean");
    group.throughput(Throughput::Elements(window.len() as u64));
    group.bench_function("finish_position", |b| {
        b.iter(|| black_box(rolling_mean(black_box(&window), &driver, finish_position)))
    });
    group.bench_function("team_points", |b| {
        b.iter(|| black_box(rolling_mean(black_box(&window), &driver, team_points)))
    });
    group.finish();
}

criterion_group!(benches, bench_window_build, bench_event_assembly, bench_rolling_mean);
criterion_main!(benches);
