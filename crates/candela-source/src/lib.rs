//! Synthetic price tick source for the candela pipeline.
//!
//! - [`GeneratorConfig`] / [`Clock`] - Generator settings
//! - [`PriceGenerator`] - Lazy, cancellable price stream
//! - [`spawn_source`] - Pumps the stream into a bounded channel

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod generator;
mod pump;

pub use config::{Clock, GeneratorConfig, SourceError};
pub use generator::PriceGenerator;
pub use pump::spawn_source;
