//! In-memory candle sinks.

use candela_types::{Candle, CandlePeriod};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{CandleSink, SinkError, SinkProvider};

#[derive(Debug, Default)]
struct Store {
    candles: HashMap<CandlePeriod, Vec<Candle>>,
    opens: HashMap<CandlePeriod, usize>,
    closes: HashMap<CandlePeriod, usize>,
}

/// Collects persisted candles in memory, keyed by period.
///
/// Cloning the provider shares the same store, so a caller can keep a
/// handle and inspect what a pipeline wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySinkProvider {
    store: Arc<Mutex<Store>>,
}

impl MemorySinkProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every candle written for `period`.
    #[must_use]
    pub fn candles(&self, period: CandlePeriod) -> Vec<Candle> {
        self.lock().candles.get(&period).cloned().unwrap_or_default()
    }

    /// Returns how many times the sink for `period` was opened.
    #[must_use]
    pub fn open_count(&self, period: CandlePeriod) -> usize {
        self.lock().opens.get(&period).copied().unwrap_or(0)
    }

    /// Returns how many times the sink for `period` was closed.
    #[must_use]
    pub fn close_count(&self, period: CandlePeriod) -> usize {
        self.lock().closes.get(&period).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A poisoned store still holds every candle written before the panic
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SinkProvider for MemorySinkProvider {
    fn open(&self, period: CandlePeriod) -> Result<Box<dyn CandleSink>, SinkError> {
        *self.lock().opens.entry(period).or_insert(0) += 1;
        Ok(Box::new(MemorySink {
            period,
            provider: self.clone(),
            closed: false,
        }))
    }
}

#[derive(Debug)]
struct MemorySink {
    period: CandlePeriod,
    provider: MemorySinkProvider,
    closed: bool,
}

impl CandleSink for MemorySink {
    fn append(&mut self, candle: &Candle) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed(self.period));
        }
        self.provider
            .lock()
            .candles
            .entry(self.period)
            .or_default()
            .push(candle.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed(self.period));
        }
        self.closed = true;
        *self.provider.lock().closes.entry(self.period).or_insert(0) += 1;
        Ok(())
    }
}
