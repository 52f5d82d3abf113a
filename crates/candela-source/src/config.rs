//! Generator configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Tickers generated when none are configured.
pub(crate) const DEFAULT_TICKERS: [&str; 4] = ["AAPL", "SBER", "NVDA", "TSLA"];

/// How generated prices are timestamped and paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Clock {
    /// Wall-clock timestamps, one round every `delay`.
    #[default]
    Realtime,
    /// Paced by `delay`, but time stamped `speedup` times faster than the
    /// wall clock, so coarse buckets close within a short run.
    Accelerated {
        /// Virtual seconds per wall-clock second.
        speedup: u32,
    },
    /// Virtual clock starting at `start` and advancing by `step` per round,
    /// with no sleeping.
    Simulated {
        /// Timestamp of the first round.
        start: DateTime<Utc>,
        /// Virtual time between rounds.
        step: Duration,
    },
}

/// Configuration for the synthetic price generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Tickers to generate, one price each per round.
    pub tickers: Vec<String>,
    /// Volatility divisor: each round moves a price by less than `1/factor`
    /// of its value. Also scales the starting price.
    pub factor: f64,
    /// Wall-clock delay between rounds (ignored by [`Clock::Simulated`]).
    pub delay: Duration,
    /// Seed for reproducible runs. Random when absent.
    pub seed: Option<u64>,
    /// Timestamping mode.
    pub clock: Clock,
    /// Stop after this many ticks. Runs until cancelled when absent.
    pub max_ticks: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(ToString::to_string).collect(),
            factor: 10.0,
            delay: Duration::from_millis(500),
            seed: None,
            clock: Clock::Realtime,
            max_ticks: None,
        }
    }
}

/// Errors raised when a generator configuration is invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// No tickers configured.
    #[error("At least one ticker is required")]
    NoTickers,

    /// The volatility factor must be greater than one.
    #[error("Invalid factor {0}, expected a value greater than 1")]
    InvalidFactor(f64),

    /// A clock duration cannot be represented.
    #[error("Clock step out of range: {0:?}")]
    StepOutOfRange(Duration),

    /// The accelerated clock needs a speedup of at least one.
    #[error("Clock speedup must be at least 1")]
    ZeroSpeedup,
}

impl GeneratorConfig {
    /// Checks the configuration for values the generator cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.tickers.is_empty() {
            return Err(SourceError::NoTickers);
        }
        if !self.factor.is_finite() || self.factor <= 1.0 {
            return Err(SourceError::InvalidFactor(self.factor));
        }
        match self.clock {
            Clock::Accelerated { speedup: 0 } => Err(SourceError::ZeroSpeedup),
            Clock::Simulated { step, .. } if chrono::TimeDelta::from_std(step).is_err() => {
                Err(SourceError::StepOutOfRange(step))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert_eq!(config.tickers, vec!["AAPL", "SBER", "NVDA", "TSLA"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let no_tickers = GeneratorConfig {
            tickers: vec![],
            ..Default::default()
        };
        assert_eq!(no_tickers.validate(), Err(SourceError::NoTickers));

        let flat = GeneratorConfig {
            factor: 1.0,
            ..Default::default()
        };
        assert_eq!(flat.validate(), Err(SourceError::InvalidFactor(1.0)));

        let frozen = GeneratorConfig {
            clock: Clock::Accelerated { speedup: 0 },
            ..Default::default()
        };
        assert_eq!(frozen.validate(), Err(SourceError::ZeroSpeedup));
    }
}
