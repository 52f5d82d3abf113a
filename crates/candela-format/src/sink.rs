//! Sink abstraction for persisted candles.

use candela_types::{Candle, CandlePeriod};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting candles.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The sink could not be opened.
    #[error("Failed to open sink '{path}': {source}")]
    Open {
        /// Location of the sink.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A candle could not be written.
    #[error("Failed to write {period} candle: {source}")]
    Write {
        /// Period of the sink.
        period: CandlePeriod,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The sink was already closed.
    #[error("Sink for {0} candles is closed")]
    Closed(CandlePeriod),
}

/// Append-only destination for the closed candles of one period.
pub trait CandleSink: Send {
    /// Appends one candle.
    ///
    /// # Errors
    ///
    /// Returns an error if the candle could not be written.
    fn append(&mut self, candle: &Candle) -> Result<(), SinkError>;

    /// Flushes and releases the sink. Later appends fail.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered data could not be flushed.
    fn close(&mut self) -> Result<(), SinkError>;
}

/// Opens one [`CandleSink`] per period.
pub trait SinkProvider: Send + Sync {
    /// Opens the sink for `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be opened.
    fn open(&self, period: CandlePeriod) -> Result<Box<dyn CandleSink>, SinkError>;
}
