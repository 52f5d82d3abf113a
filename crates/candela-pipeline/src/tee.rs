//! Persistence tee and terminal drain.

use candela_format::{CandleSink, SinkError, SinkProvider};
use candela_types::{Candle, CandlePeriod};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::PipelineError;
use crate::error::report;
use crate::forward::Downstream;

/// Channels and task handle of a running tee.
#[derive(Debug)]
pub struct TeeOutput {
    /// Forwarded candles, or `None` for a terminal tee.
    pub candles: Option<mpsc::Receiver<Candle>>,
    /// Persistence errors reported by the tee.
    pub errors: mpsc::Receiver<PipelineError>,
    /// The tee task; resolves once the sink is closed.
    pub task: JoinHandle<TeeStats>,
}

/// Counters collected by a tee over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeeStats {
    /// Period of the tee.
    pub period: CandlePeriod,
    /// Candles written to the sink.
    pub persisted: u64,
    /// Candles forwarded downstream.
    pub forwarded: u64,
    /// Sink failures reported (open, write or close).
    pub failures: u64,
}

/// Spawns a tee that persists every candle and forwards it unchanged.
///
/// The sink for `period` is opened on the first candle. A sink failure is
/// reported on the error stream and never holds back the forwarded
/// candle. The sink is closed once, when `input` closes. With
/// `forward == false` the tee is terminal and candles stop here.
pub fn spawn_tee(
    period: CandlePeriod,
    provider: Arc<dyn SinkProvider>,
    mut input: mpsc::Receiver<Candle>,
    forward: bool,
    capacity: usize,
) -> TeeOutput {
    let (tx, candles) = if forward {
        let (tx, rx) = mpsc::channel(capacity);
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };
    let (err_tx, errors) = mpsc::channel(capacity);

    let task = tokio::spawn(async move {
        let mut sink: Option<Box<dyn CandleSink>> = None;
        let mut downstream = Downstream::new(period, tx);
        let mut stats = TeeStats {
            period,
            persisted: 0,
            forwarded: 0,
            failures: 0,
        };

        while let Some(candle) = input.recv().await {
            match persist(provider.as_ref(), &mut sink, period, &candle) {
                Ok(()) => stats.persisted += 1,
                Err(source) => {
                    stats.failures += 1;
                    report(&err_tx, PipelineError::Persist { period, source }).await;
                }
            }
            if downstream.send(candle).await {
                stats.forwarded += 1;
            }
        }

        if let Some(mut open) = sink.take() {
            if let Err(source) = open.close() {
                stats.failures += 1;
                report(&err_tx, PipelineError::Persist { period, source }).await;
            }
        }

        tracing::info!(
            %period,
            persisted = stats.persisted,
            forwarded = stats.forwarded,
            failures = stats.failures,
            "persistence tee finished"
        );
        stats
    });

    TeeOutput {
        candles,
        errors,
        task,
    }
}

/// Appends a candle, opening the sink first if needed.
///
/// A failed open leaves the slot empty so the next candle retries.
fn persist(
    provider: &dyn SinkProvider,
    slot: &mut Option<Box<dyn CandleSink>>,
    period: CandlePeriod,
    candle: &Candle,
) -> Result<(), SinkError> {
    let sink = match slot.take() {
        Some(sink) => sink,
        None => provider.open(period)?,
    };
    slot.insert(sink).append(candle)
}

/// Spawns a task that consumes and discards a candle channel.
///
/// Resolves to the number of candles discarded.
pub fn spawn_drain(mut input: mpsc::Receiver<Candle>) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut drained = 0u64;
        while input.recv().await.is_some() {
            drained += 1;
        }
        drained
    })
}
