//! Benchmark fixtures for candela.

use candela_lib::{Candle, CandlePeriod, Price};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shape of a synthetic tick series.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    /// Number of distinct tickers.
    pub tickers: usize,
    /// Ticks per ticker.
    pub ticks: usize,
    /// Virtual seconds between consecutive rounds.
    pub step_secs: i64,
}

impl Workload {
    /// Total number of prices in the series.
    pub const fn len(&self) -> usize {
        self.tickers * self.ticks
    }

    /// Returns true if the series is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Generates a deterministic random walk, one price per ticker per round.
pub fn prices(workload: Workload, seed: u64) -> Vec<Price> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..workload.tickers).map(|i| format!("T{i:03}")).collect();
    let mut last = vec![100.0_f64; workload.tickers];
    let mut out = Vec::with_capacity(workload.len());

    for round in 0..workload.ticks {
        let offset = i64::try_from(round).unwrap_or(i64::MAX) * workload.step_secs;
        let timestamp = start() + TimeDelta::seconds(offset);
        for (value, name) in last.iter_mut().zip(&names) {
            *value *= 1.0 + rng.gen_range(-0.01_f64..0.01);
            out.push(Price::new(name.clone(), *value, timestamp));
        }
    }
    out
}

/// Wraps every price in a single-tick candle of `period`.
pub fn single_tick_candles(prices: &[Price], period: CandlePeriod) -> Vec<Candle> {
    prices
        .iter()
        .filter_map(|p| Candle::from_price(p, period).ok())
        .collect()
}
