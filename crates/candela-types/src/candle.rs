//! OHLC candle data structure and constructors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CandleError, CandlePeriod, Price};

/// OHLC candle for one ticker over one period bucket.
///
/// A candle is mutable only while it is open inside an aggregation stage.
/// Once emitted downstream it is treated as immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Ticker symbol.
    pub ticker: String,
    /// Period this candle summarizes.
    pub period: CandlePeriod,
    /// Opening price (first observation in the bucket).
    pub open: f64,
    /// Highest price in the bucket.
    pub high: f64,
    /// Lowest price in the bucket.
    pub low: f64,
    /// Closing price (last observation in the bucket).
    pub close: f64,
    /// Bucket start time.
    pub bucket_start: DateTime<Utc>,
}

impl Candle {
    /// Builds a single-observation candle from a price tick.
    ///
    /// All four prices equal the tick value and the bucket start is the
    /// tick timestamp truncated to `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket start cannot be computed.
    pub fn from_price(price: &Price, period: CandlePeriod) -> Result<Self, CandleError> {
        let bucket_start = period.bucket_start(price.timestamp)?;
        Ok(Self {
            ticker: price.ticker.clone(),
            period,
            open: price.value,
            high: price.value,
            low: price.value,
            close: price.value,
            bucket_start,
        })
    }

    /// Projects this candle onto the bucket grid of another period.
    ///
    /// Prices are kept as-is; only the period and bucket start change.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket start cannot be computed.
    pub fn reproject(&self, period: CandlePeriod) -> Result<Self, CandleError> {
        let bucket_start = period.bucket_start(self.bucket_start)?;
        Ok(Self {
            period,
            bucket_start,
            ..self.clone()
        })
    }

    /// Folds a later observation of the same bucket into this candle.
    ///
    /// Extends high and low, and overwrites close. Open and bucket start
    /// are left untouched.
    pub fn merge(&mut self, other: &Self) {
        self.high = self.high.max(other.high);
        self.low = self.low.min(other.low);
        self.close = other.close;
    }
}
