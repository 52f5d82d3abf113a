//! File-backed candle sinks, one file per period.

use candela_types::{Candle, CandlePeriod};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::PathBuf;

use crate::{CandleSink, SinkError, SinkProvider, write_candle};

/// How an existing sink file is treated when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Start a fresh file on every run.
    #[default]
    Truncate,
    /// Keep existing content and append after it.
    Append,
}

/// Returns the file name used for a period's candles.
#[must_use]
pub fn sink_file_name(period: CandlePeriod) -> String {
    format!("candles_{period}.csv")
}

/// Opens `candles_<period>.csv` files inside a directory.
#[derive(Debug, Clone)]
pub struct FileSinkProvider {
    dir: PathBuf,
    mode: WriteMode,
}

impl FileSinkProvider {
    /// Creates a provider writing into `dir` (truncating on open).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mode: WriteMode::default(),
        }
    }

    /// Sets the write mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the full path of a period's sink file.
    #[must_use]
    pub fn path_for(&self, period: CandlePeriod) -> PathBuf {
        self.dir.join(sink_file_name(period))
    }
}

impl SinkProvider for FileSinkProvider {
    fn open(&self, period: CandlePeriod) -> Result<Box<dyn CandleSink>, SinkError> {
        let path = self.path_for(period);
        let mut options = OpenOptions::new();
        options.create(true);
        match self.mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };

        let file = options.open(&path).map_err(|e| SinkError::Open {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(period = %period, path = %path.display(), "opened candle sink");

        Ok(Box::new(FileSink {
            period,
            writer: Some(LineWriter::new(file)),
        }))
    }
}

/// Line-buffered file sink for one period.
///
/// Dropping the sink releases the file even if [`CandleSink::close`] was
/// never called.
#[derive(Debug)]
pub struct FileSink {
    period: CandlePeriod,
    writer: Option<LineWriter<File>>,
}

impl CandleSink for FileSink {
    fn append(&mut self, candle: &Candle) -> Result<(), SinkError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(SinkError::Closed(self.period))?;
        write_candle(candle, writer).map_err(|e| SinkError::Write {
            period: self.period,
            source: e,
        })
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let Some(mut writer) = self.writer.take() else {
            return Err(SinkError::Closed(self.period));
        };
        writer.flush().map_err(|e| SinkError::Write {
            period: self.period,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::Price;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn candle(ticker: &str, value: f64) -> Candle {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Candle::from_price(&Price::new(ticker, value, ts), CandlePeriod::Minute2).unwrap()
    }

    #[test]
    fn test_sink_file_name() {
        assert_eq!(sink_file_name(CandlePeriod::Minute1), "candles_1m.csv");
        assert_eq!(sink_file_name(CandlePeriod::Minute10), "candles_10m.csv");
    }

    #[test]
    fn test_file_sink_writes_lines() {
        let temp_dir = TempDir::new().unwrap();
        let provider = FileSinkProvider::new(temp_dir.path());

        let mut sink = provider.open(CandlePeriod::Minute2).unwrap();
        sink.append(&candle("AAPL", 1.5)).unwrap();
        sink.append(&candle("TSLA", 2.0)).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(provider.path_for(CandlePeriod::Minute2)).unwrap();
        assert_eq!(
            content,
            "AAPL,2024-03-01T09:30:00Z,1.500000,1.500000,1.500000,1.500000\n\
             TSLA,2024-03-01T09:30:00Z,2.000000,2.000000,2.000000,2.000000\n"
        );
    }

    #[test]
    fn test_append_after_close_fails() {
        let temp_dir = TempDir::new().unwrap();
        let provider = FileSinkProvider::new(temp_dir.path());

        let mut sink = provider.open(CandlePeriod::Minute1).unwrap();
        sink.close().unwrap();

        assert!(matches!(
            sink.append(&candle("AAPL", 1.0)),
            Err(SinkError::Closed(CandlePeriod::Minute1))
        ));
        assert!(sink.close().is_err());
    }

    #[test]
    fn test_truncate_and_append_modes() {
        let temp_dir = TempDir::new().unwrap();
        let truncating = FileSinkProvider::new(temp_dir.path());
        let appending = FileSinkProvider::new(temp_dir.path()).with_mode(WriteMode::Append);
        let path = truncating.path_for(CandlePeriod::Minute2);

        for provider in [&truncating, &truncating, &appending] {
            let mut sink = provider.open(CandlePeriod::Minute2).unwrap();
            sink.append(&candle("NVDA", 3.0)).unwrap();
            sink.close().unwrap();
        }

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_open_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let provider = FileSinkProvider::new(temp_dir.path().join("missing"));

        let err = provider.open(CandlePeriod::Minute10).err().unwrap();
        assert!(matches!(err, SinkError::Open { .. }));
    }
}
