//! Periods command implementation.

use candela_lib::prelude::*;

/// Print the supported candle periods.
pub(crate) fn list_periods() {
    println!("{:<8} {:>8}", "PERIOD", "SECONDS");
    println!("{}", "-".repeat(17));

    for period in CandlePeriod::all() {
        println!("{:<8} {:>8}", period.as_str(), period.seconds());
    }
}
