//! Concurrent multi-period candle aggregation over live price streams.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candela_lib::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cancel = CancellationToken::new();
//!     let generator = PriceGenerator::new(GeneratorConfig::default())?;
//!     let (prices, _source) = spawn_source(generator, cancel.clone(), 64);
//!
//!     let provider = Arc::new(FileSinkProvider::new("."));
//!     let pipeline = Pipeline::new(PipelineConfig::default(), provider)?;
//!     let summary = pipeline.run(prices).await;
//!     println!("{} errors", summary.total_errors());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

// Re-export aggregation
pub use candela_aggregate::{AggregateError, CandleAggregator, CandleMap, Update, aggregate_candles};

// Re-export sinks and line format
pub use candela_format::{
    CandleSink, FileSink, FileSinkProvider, MemorySinkProvider, SinkError, SinkProvider, WriteMode,
    format_candle, sink_file_name, write_candle,
};

// Re-export the price generator
#[cfg(feature = "source")]
pub use candela_source::{Clock, GeneratorConfig, PriceGenerator, SourceError, spawn_source};

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use candela_pipeline::{
    ConfigError, ErrorCategory, ErrorFanIn, Pipeline, PipelineConfig, PipelineError, RunSummary,
    StageOutput, StageStats, TeeOutput, TeeStats, merge_errors, spawn_drain, spawn_price_adapter,
    spawn_stage, spawn_tee,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{Candle, CandleError, CandlePeriod, Price, Result};

    pub use candela_aggregate::{AggregateError, CandleAggregator, aggregate_candles};

    pub use candela_format::{CandleSink, FileSinkProvider, SinkProvider, WriteMode};

    #[cfg(feature = "source")]
    pub use candela_source::{Clock, GeneratorConfig, PriceGenerator, spawn_source};

    #[cfg(feature = "pipeline")]
    pub use candela_pipeline::{Pipeline, PipelineConfig, PipelineError, RunSummary};
}
