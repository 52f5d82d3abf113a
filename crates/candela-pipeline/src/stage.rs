//! Aggregation stage tasks.

use candela_aggregate::{CandleAggregator, Update};
use candela_types::{Candle, CandlePeriod, Price};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::PipelineError;
use crate::error::report;
use crate::forward::Downstream;

/// Channels and task handle of a running stage.
#[derive(Debug)]
pub struct StageOutput {
    /// Candles emitted by the stage.
    pub candles: mpsc::Receiver<Candle>,
    /// Errors reported by the stage.
    pub errors: mpsc::Receiver<PipelineError>,
    /// The stage task; resolves once the stage has flushed and closed.
    pub task: JoinHandle<StageStats>,
}

/// Counters collected by a stage over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Period of the stage.
    pub period: CandlePeriod,
    /// Items read from the input channel.
    pub received: u64,
    /// Candles sent downstream, including the final flush.
    pub emitted: u64,
    /// Errors reported.
    pub errors: u64,
}

impl StageStats {
    const fn new(period: CandlePeriod) -> Self {
        Self {
            period,
            received: 0,
            emitted: 0,
            errors: 0,
        }
    }
}

/// Spawns the task that wraps each price into a single-tick candle.
///
/// A price whose bucket cannot be computed is reported and dropped.
pub fn spawn_price_adapter(
    period: CandlePeriod,
    mut prices: mpsc::Receiver<Price>,
    capacity: usize,
) -> StageOutput {
    let (tx, candles) = mpsc::channel(capacity);
    let (err_tx, errors) = mpsc::channel(capacity);

    let task = tokio::spawn(async move {
        let mut downstream = Downstream::new(period, Some(tx));
        let mut stats = StageStats::new(period);

        while let Some(price) = prices.recv().await {
            stats.received += 1;
            match Candle::from_price(&price, period) {
                Ok(candle) => {
                    if downstream.send(candle).await {
                        stats.emitted += 1;
                    }
                }
                Err(source) => {
                    stats.errors += 1;
                    report(&err_tx, PipelineError::Adapter { period, source }).await;
                }
            }
        }

        tracing::debug!(%period, received = stats.received, "price adapter finished");
        stats
    });

    StageOutput {
        candles,
        errors,
        task,
    }
}

/// Spawns an aggregation stage for `period`.
///
/// The stage owns its candle map. It emits a closed candle whenever a
/// ticker crosses into a new bucket, and on input closure flushes every
/// open candle before closing its own output and error channels.
pub fn spawn_stage(
    period: CandlePeriod,
    mut input: mpsc::Receiver<Candle>,
    capacity: usize,
) -> StageOutput {
    let (tx, candles) = mpsc::channel(capacity);
    let (err_tx, errors) = mpsc::channel(capacity);

    let task = tokio::spawn(async move {
        let mut aggregator = CandleAggregator::new(period);
        let mut downstream = Downstream::new(period, Some(tx));
        let mut stats = StageStats::new(period);
        tracing::info!(%period, "aggregation stage started");

        while let Some(candle) = input.recv().await {
            stats.received += 1;
            match aggregator.update(candle) {
                Ok(Update::Closed(closed)) => {
                    tracing::debug!(
                        %period,
                        ticker = %closed.ticker,
                        bucket = %closed.bucket_start,
                        "candle closed"
                    );
                    if downstream.send(closed).await {
                        stats.emitted += 1;
                    }
                }
                Ok(Update::Opened | Update::Merged) => {}
                Err(source) => {
                    stats.errors += 1;
                    report(&err_tx, PipelineError::Aggregate { period, source }).await;
                }
            }
        }

        let remaining = aggregator.flush();
        tracing::debug!(%period, open = remaining.len(), "flushing open candles");
        for candle in remaining {
            if downstream.send(candle).await {
                stats.emitted += 1;
            }
        }

        tracing::info!(
            %period,
            received = stats.received,
            emitted = stats.emitted,
            errors = stats.errors,
            "aggregation stage finished"
        );
        stats
    });

    StageOutput {
        candles,
        errors,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use candela_aggregate::AggregateError;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn epoch_plus(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap() + TimeDelta::seconds(seconds)
    }

    async fn collect<T>(mut rx: mpsc::Receiver<T>) -> Vec<T> {
        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_stage_emits_on_boundary_and_flushes() {
        let (price_tx, price_rx) = mpsc::channel(8);
        let adapter = spawn_price_adapter(CandlePeriod::Minute1, price_rx, 8);
        let mut stage = spawn_stage(CandlePeriod::Minute1, adapter.candles, 8);

        price_tx.send(Price::new("AAPL", 100.0, epoch_plus(10))).await.unwrap();
        price_tx.send(Price::new("AAPL", 105.0, epoch_plus(40))).await.unwrap();
        price_tx.send(Price::new("AAPL", 90.0, epoch_plus(65))).await.unwrap();

        // Closed as soon as the third tick crosses the boundary
        let first = stage.candles.recv().await.unwrap();
        assert_eq!(first.bucket_start, epoch_plus(0));
        assert_relative_eq!(first.open, 100.0);
        assert_relative_eq!(first.high, 105.0);
        assert_relative_eq!(first.low, 100.0);
        assert_relative_eq!(first.close, 105.0);

        drop(price_tx);
        let rest = collect(stage.candles).await;
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].bucket_start, epoch_plus(60));
        assert_relative_eq!(rest[0].high, 90.0);

        assert!(collect(stage.errors).await.is_empty());
        let stats = stage.task.await.unwrap();
        assert_eq!(stats.received, 3);
        assert_eq!(stats.emitted, 2);
        assert_eq!(adapter.task.await.unwrap().emitted, 3);
    }

    #[tokio::test]
    async fn test_stage_reports_regression_and_continues() {
        let (tx, rx) = mpsc::channel(8);
        let stage = spawn_stage(CandlePeriod::Minute2, rx, 8);

        let make = |value: f64, seconds: i64| {
            Candle::from_price(&Price::new("NVDA", value, epoch_plus(seconds)), CandlePeriod::Minute1)
                .unwrap()
        };
        tx.send(make(10.0, 300)).await.unwrap();
        tx.send(make(99.0, 10)).await.unwrap();
        tx.send(make(12.0, 330)).await.unwrap();
        drop(tx);

        let candles = collect(stage.candles).await;
        let errors = collect(stage.errors).await;

        assert_eq!(candles.len(), 1);
        assert_relative_eq!(candles[0].high, 12.0);
        assert_relative_eq!(candles[0].low, 10.0);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            PipelineError::Aggregate {
                period: CandlePeriod::Minute2,
                source: AggregateError::BucketRegression { .. },
            }
        ));
        assert_eq!(stage.task.await.unwrap().errors, 1);
    }

    #[tokio::test]
    async fn test_flush_once_per_ticker_with_open_candle() {
        let (tx, rx) = mpsc::channel(16);
        let stage = spawn_stage(CandlePeriod::Minute10, rx, 16);

        for (ticker, seconds) in [("AAPL", 0), ("SBER", 30), ("AAPL", 90), ("TSLA", 500)] {
            let price = Price::new(ticker, 1.0, epoch_plus(seconds));
            tx.send(Candle::from_price(&price, CandlePeriod::Minute1).unwrap())
                .await
                .unwrap();
        }
        drop(tx);

        let tickers: Vec<String> = collect(stage.candles)
            .await
            .into_iter()
            .map(|c| c.ticker)
            .collect();
        assert_eq!(tickers, vec!["AAPL", "SBER", "TSLA"]);
    }

    #[tokio::test]
    async fn test_stage_drains_when_downstream_dropped() {
        let (tx, rx) = mpsc::channel(1);
        let stage = spawn_stage(CandlePeriod::Minute1, rx, 1);
        drop(stage.candles);

        for minute in 0..20 {
            let price = Price::new("AAPL", 1.0, epoch_plus(minute * 60));
            tx.send(Candle::from_price(&price, CandlePeriod::Minute1).unwrap())
                .await
                .unwrap();
        }
        drop(tx);

        let stats = stage.task.await.unwrap();
        assert_eq!(stats.received, 20);
        assert_eq!(stats.emitted, 0);
    }
}
