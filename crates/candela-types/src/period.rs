//! Candle period definitions and bucket arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CandleError;

/// Candle aggregation period.
///
/// Variants are ordered from finest to coarsest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum CandlePeriod {
    /// 1-minute candles.
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    /// 2-minute candles.
    #[serde(rename = "2m")]
    Minute2,
    /// 10-minute candles.
    #[serde(rename = "10m")]
    Minute10,
}

impl CandlePeriod {
    /// Returns the period length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute2 => 120,
            Self::Minute10 => 600,
        }
    }

    /// Returns the period as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute2 => "2m",
            Self::Minute10 => "10m",
        }
    }

    /// Returns all supported periods, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minute1, Self::Minute2, Self::Minute10]
    }

    /// Returns true if `coarser` is a whole multiple of this period.
    ///
    /// A period divides itself.
    #[must_use]
    pub const fn divides(&self, coarser: Self) -> bool {
        coarser.seconds() >= self.seconds() && coarser.seconds() % self.seconds() == 0
    }

    /// Truncates `timestamp` down to the start of its bucket.
    ///
    /// Buckets are anchored at the Unix epoch, so the result does not depend
    /// on when the process started. Sub-second precision is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::OutOfRange`] if the bucket start is not a
    /// representable timestamp.
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> Result<DateTime<Utc>, CandleError> {
        let span = self.seconds();
        let secs = timestamp.timestamp();
        let start = secs - secs.rem_euclid(span);
        DateTime::from_timestamp(start, 0).ok_or(CandleError::OutOfRange {
            period: *self,
            timestamp,
        })
    }
}

/// Truncates `timestamp` down to the start of its `period` bucket.
///
/// Free-function form of [`CandlePeriod::bucket_start`].
///
/// # Errors
///
/// Returns [`CandleError::OutOfRange`] if the bucket start is not a
/// representable timestamp.
pub fn bucket_start(
    period: CandlePeriod,
    timestamp: DateTime<Utc>,
) -> Result<DateTime<Utc>, CandleError> {
    period.bucket_start(timestamp)
}

impl std::fmt::Display for CandlePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CandlePeriod {
    type Err = CandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "m1" | "minute" | "minute1" => Ok(Self::Minute1),
            "2m" | "m2" | "minute2" => Ok(Self::Minute2),
            "10m" | "m10" | "minute10" => Ok(Self::Minute10),
            _ => Err(CandleError::UnknownPeriod(s.to_string())),
        }
    }
}
