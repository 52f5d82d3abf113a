//! Aggregation error types.

use candela_types::{CandleError, CandlePeriod};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors reported while folding a candle into an aggregator.
///
/// None of these abort aggregation. The offending item is dropped and the
/// aggregator state is left as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The bucket for the incoming candle could not be computed.
    #[error(transparent)]
    Candle(#[from] CandleError),

    /// The incoming candle falls into a bucket earlier than the open one.
    #[error("{ticker}: incoming bucket {incoming} precedes open bucket {open}")]
    BucketRegression {
        /// Ticker of the offending candle.
        ticker: String,
        /// Bucket start of the currently open candle.
        open: DateTime<Utc>,
        /// Bucket start the incoming candle truncates to.
        incoming: DateTime<Utc>,
    },

    /// The incoming candle's period does not nest inside the target period.
    #[error("{ticker}: cannot aggregate {input} candles into {target} candles")]
    PeriodMismatch {
        /// Ticker of the offending candle.
        ticker: String,
        /// Period of the incoming candle.
        input: CandlePeriod,
        /// Period of the aggregator.
        target: CandlePeriod,
    },
}
