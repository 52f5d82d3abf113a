//! Aggregation benchmarks.
//!
//! Run with: `cargo bench --package candela-bench`

use candela_bench::{Workload, prices, single_tick_candles};
use candela_lib::{
    CandlePeriod, MemorySinkProvider, Pipeline, PipelineConfig, aggregate_candles,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use tokio::sync::mpsc;

fn workloads() -> Vec<(&'static str, Workload)> {
    vec![
        (
            "4x10k",
            Workload {
                tickers: 4,
                ticks: 10_000,
                step_secs: 1,
            },
        ),
        (
            "64x1k",
            Workload {
                tickers: 64,
                ticks: 1_000,
                step_secs: 5,
            },
        ),
    ]
}

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for (name, workload) in workloads() {
        let series = prices(workload, 7);
        group.throughput(Throughput::Elements(series.len() as u64));

        for period in CandlePeriod::all() {
            let candles = single_tick_candles(&series, *period);
            group.bench_with_input(
                BenchmarkId::new(period.as_str(), name),
                &candles,
                |b, candles| {
                    b.iter(|| aggregate_candles(*period, candles.iter().cloned()));
                },
            );
        }

        // Coarse candles from fine ones, as the cascade does
        let minutes = aggregate_candles(
            CandlePeriod::Minute1,
            single_tick_candles(&series, CandlePeriod::Minute1),
        )
        .unwrap_or_default();
        group.bench_with_input(
            BenchmarkId::new("1m->10m", name),
            &minutes,
            |b, minutes| {
                b.iter(|| aggregate_candles(CandlePeriod::Minute10, minutes.iter().cloned()));
            },
        );
    }

    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    for (name, workload) in workloads() {
        let series = prices(workload, 11);
        group.throughput(Throughput::Elements(series.len() as u64));

        group.bench_with_input(BenchmarkId::new("cascade", name), &series, |b, series| {
            b.to_async(&runtime).iter(|| async {
                let provider = Arc::new(MemorySinkProvider::new());
                let pipeline = Pipeline::new(PipelineConfig::default(), provider).unwrap();
                let (tx, rx) = mpsc::channel(256);
                let run = tokio::spawn(pipeline.run(rx));
                for price in series.iter().cloned() {
                    tx.send(price).await.unwrap();
                }
                drop(tx);
                run.await.unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, pipeline_benchmark);
criterion_main!(benches);
