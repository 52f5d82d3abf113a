//! Candle line format and persistence sinks for the candela pipeline.
//!
//! - [`format_candle`] / [`write_candle`] - One candle per text line
//! - [`CandleSink`] / [`SinkProvider`] - Per-period sink abstraction
//! - [`FileSinkProvider`] - One append-only file per period
//! - [`MemorySinkProvider`] - Collects candles in memory

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod file;
mod line;
mod memory;
mod sink;

pub use file::{FileSink, FileSinkProvider, WriteMode, sink_file_name};
pub use line::{format_candle, write_candle};
pub use memory::MemorySinkProvider;
pub use sink::{CandleSink, SinkError, SinkProvider};
