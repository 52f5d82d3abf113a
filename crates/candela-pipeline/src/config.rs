//! Pipeline configuration.

use candela_types::CandlePeriod;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Configuration for the aggregation cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cascade periods, finest first. Each must be a coarser multiple of
    /// the one before it.
    pub periods: Vec<CandlePeriod>,
    /// Capacity of every candle channel between tasks.
    pub channel_capacity: usize,
    /// Capacity of every error channel, including the merged one.
    pub error_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            periods: CandlePeriod::all().to_vec(),
            channel_capacity: 64,
            error_capacity: 64,
        }
    }
}

impl PipelineConfig {
    /// Parses a comma-separated period list such as `"1m,2m,10m"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Period`] for an unknown period identifier.
    pub fn parse_periods(list: &str) -> Result<Vec<CandlePeriod>, ConfigError> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<CandlePeriod>().map_err(ConfigError::from))
            .collect()
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// configuration is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the cascade nests and capacities are usable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods.is_empty() {
            return Err(ConfigError::EmptyCascade);
        }
        for pair in self.periods.windows(2) {
            let (finer, coarser) = (pair[0], pair[1]);
            if finer == coarser || !finer.divides(coarser) {
                return Err(ConfigError::NotNested { finer, coarser });
            }
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("channel_capacity"));
        }
        if self.error_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("error_capacity"));
        }
        Ok(())
    }
}
