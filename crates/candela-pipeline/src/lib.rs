//! Concurrent tick-to-candle aggregation cascade for candela.
//!
//! - [`spawn_price_adapter`] / [`spawn_stage`] - Aggregation stage tasks
//! - [`spawn_tee`] / [`spawn_drain`] - Persistence tee and terminal drain
//! - [`ErrorFanIn`] / [`merge_errors`] - Merges per-task error streams
//! - [`Pipeline`] - Wires and runs the whole cascade
//! - [`PipelineConfig`] - Cascade periods and channel capacities

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod forward;
mod merge;
mod pipeline;
mod stage;
mod tee;

pub use config::PipelineConfig;
pub use error::{ConfigError, ErrorCategory, PipelineError};
pub use merge::{ErrorFanIn, merge_errors};
pub use pipeline::{Pipeline, RunSummary};
pub use stage::{StageOutput, StageStats, spawn_price_adapter, spawn_stage};
pub use tee::{TeeOutput, TeeStats, spawn_drain, spawn_tee};
