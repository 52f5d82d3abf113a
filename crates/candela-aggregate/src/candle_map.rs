//! Open-candle state keyed by ticker.

use candela_types::Candle;
use std::collections::HashMap;

/// Currently-open candle per ticker for one period.
///
/// Owned by a single aggregator, so it needs no synchronization.
#[derive(Debug, Default)]
pub struct CandleMap {
    open: HashMap<String, Candle>,
}

impl CandleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of open candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Returns true if no candle is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Returns the open candle for a ticker.
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&Candle> {
        self.open.get(ticker)
    }

    /// Returns the open candle for a ticker, mutably.
    pub fn get_mut(&mut self, ticker: &str) -> Option<&mut Candle> {
        self.open.get_mut(ticker)
    }

    /// Opens `candle` for its ticker, returning the candle it replaced.
    pub fn insert(&mut self, candle: Candle) -> Option<Candle> {
        self.open.insert(candle.ticker.clone(), candle)
    }

    /// Removes every open candle, sorted by ticker.
    pub fn drain(&mut self) -> Vec<Candle> {
        let mut candles: Vec<Candle> = self.open.drain().map(|(_, candle)| candle).collect();
        candles.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        candles
    }
}
