//! Error types for candle construction.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::CandlePeriod;

/// Result type alias for candle operations.
pub type Result<T> = std::result::Result<T, CandleError>;

/// Errors that can occur while building or reprojecting candles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandleError {
    /// Period identifier outside the supported set.
    #[error("Unknown period '{0}', expected one of: 1m, 2m, 10m")]
    UnknownPeriod(String),

    /// The bucket start for a timestamp is not representable.
    #[error("Cannot determine {period} bucket for timestamp {timestamp}")]
    OutOfRange {
        /// The period being truncated to.
        period: CandlePeriod,
        /// The timestamp that could not be truncated.
        timestamp: DateTime<Utc>,
    },
}
