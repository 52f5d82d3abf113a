//! Core types for the candela candle aggregation pipeline.
//!
//! This crate provides the fundamental data structures used throughout candela:
//!
//! - [`Price`] - A single timestamped price observation for a ticker
//! - [`Candle`] - An OHLC candle for one ticker and one period
//! - [`CandlePeriod`] - Supported candle periods and bucket truncation
//! - [`CandleError`] - Errors raised while building candles

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod period;
mod price;

pub use candle::Candle;
pub use error::{CandleError, Result};
pub use period::{CandlePeriod, bucket_start};
pub use price::Price;
