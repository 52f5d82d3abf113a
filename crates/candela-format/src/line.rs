//! Text line format for closed candles.

use candela_types::Candle;
use chrono::SecondsFormat;
use std::io::{self, Write};

/// Formats a candle as `ticker,bucket_start,open,high,low,close`.
///
/// The bucket start is RFC 3339 with whole seconds and a `Z` suffix;
/// prices carry six decimals. No trailing newline.
#[must_use]
pub fn format_candle(candle: &Candle) -> String {
    format!(
        "{},{},{:.6},{:.6},{:.6},{:.6}",
        candle.ticker,
        candle
            .bucket_start
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        candle.open,
        candle.high,
        candle.low,
        candle.close
    )
}

/// Writes one candle as a single newline-terminated record.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_candle<W: Write>(candle: &Candle, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", format_candle(candle))
}
