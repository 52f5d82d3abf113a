//! Pipeline error types.

use candela_aggregate::AggregateError;
use candela_format::SinkError;
use candela_types::{CandleError, CandlePeriod};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported on a pipeline task's error stream.
///
/// None of these stop the pipeline; they are surfaced to the controller.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A price could not be turned into a candle.
    #[error("{period} adapter: {source}")]
    Adapter {
        /// Period of the first stage.
        period: CandlePeriod,
        /// The underlying candle error.
        source: CandleError,
    },

    /// An aggregation stage rejected a candle.
    #[error("{period} stage: {source}")]
    Aggregate {
        /// Period of the stage.
        period: CandlePeriod,
        /// The underlying aggregation error.
        source: AggregateError,
    },

    /// A persistence tee failed to store a candle.
    #[error("{period} sink: {source}")]
    Persist {
        /// Period of the tee.
        period: CandlePeriod,
        /// The underlying sink error.
        source: SinkError,
    },
}

/// Coarse classification of pipeline errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Programming or configuration mistake; not expected with valid input.
    Configuration,
    /// Bucket anomaly; informational.
    Windowing,
    /// A candle could not be persisted; aggregation was unaffected.
    Persistence,
}

impl PipelineError {
    /// Returns the period of the task that reported the error.
    #[must_use]
    pub const fn period(&self) -> CandlePeriod {
        match self {
            Self::Adapter { period, .. }
            | Self::Aggregate { period, .. }
            | Self::Persist { period, .. } => *period,
        }
    }

    /// Classifies the error.
    ///
    /// A candle error (unknown period, or no bucket for the timestamp) is a
    /// construction error and counts as configuration, as does a period
    /// mismatch between stages. Bucket regressions are windowing anomalies.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Adapter { .. }
            | Self::Aggregate {
                source: AggregateError::Candle(_) | AggregateError::PeriodMismatch { .. },
                ..
            } => ErrorCategory::Configuration,
            Self::Aggregate { .. } => ErrorCategory::Windowing,
            Self::Persist { .. } => ErrorCategory::Persistence,
        }
    }
}

/// Sends `error` on a task's error stream.
///
/// If nobody listens any more the error is logged instead of dropped.
pub(crate) async fn report(errors: &mpsc::Sender<PipelineError>, error: PipelineError) {
    if let Err(mpsc::error::SendError(error)) = errors.send(error).await {
        tracing::warn!(%error, "error stream closed, logging instead");
    }
}

/// Errors raised when a pipeline configuration is invalid.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No periods configured.
    #[error("Pipeline needs at least one period")]
    EmptyCascade,

    /// A period does not nest inside the previous one.
    #[error("Period {coarser} must be a strictly coarser multiple of {finer}")]
    NotNested {
        /// The earlier, finer period.
        finer: CandlePeriod,
        /// The later period that failed to nest.
        coarser: CandlePeriod,
    },

    /// A channel capacity was zero.
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),

    /// A period identifier could not be parsed.
    #[error(transparent)]
    Period(#[from] CandleError),

    /// The configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("Failed to parse config '{path}': {source}")]
    Json {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
