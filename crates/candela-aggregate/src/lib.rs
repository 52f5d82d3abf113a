//! Per-ticker OHLC candle aggregation for the candela pipeline.
//!
//! This crate provides the windowing core used by every pipeline stage:
//!
//! - [`CandleMap`] - Currently-open candle per ticker for one period
//! - [`CandleAggregator`] - Streaming candle-to-candle aggregator
//! - [`aggregate_candles`] - Runs a finite sequence through an aggregator

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod candle_map;
mod error;

pub use aggregator::{CandleAggregator, Update, aggregate_candles};
pub use candle_map::CandleMap;
pub use error::AggregateError;
