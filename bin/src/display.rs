//! Run summary output for the candela CLI.

use candela_lib::{CandlePeriod, RunSummary, StageStats, TeeStats};
use std::collections::BTreeSet;
use std::path::Path;

/// Builds one table row per period, matching stage and tee stats by period.
///
/// A cell is `-` when the task behind it produced no stats.
pub(crate) fn summary_rows(summary: &RunSummary) -> Vec<[String; 5]> {
    let periods: BTreeSet<CandlePeriod> = summary
        .stages
        .iter()
        .map(|stage| stage.period)
        .chain(summary.tees.iter().map(|tee| tee.period))
        .collect();
    let missing = || "-".to_string();

    periods
        .into_iter()
        .map(|period| {
            let stage = summary.stages.iter().find(|stage| stage.period == period);
            let tee = summary.tees.iter().find(|tee| tee.period == period);
            [
                period.as_str().to_string(),
                stage.map_or_else(missing, |s| s.received.to_string()),
                stage.map_or_else(missing, |s| s.emitted.to_string()),
                tee.map_or_else(missing, |t| t.persisted.to_string()),
                tee.map_or_else(missing, |t| t.failures.to_string()),
            ]
        })
        .collect()
}

/// Print per-period counters and error totals after a run.
pub(crate) fn print_summary(summary: &RunSummary, ticks: u64, output_dir: &Path) {
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10}",
        "PERIOD", "RECEIVED", "EMITTED", "PERSISTED", "FAILURES"
    );
    println!("{}", "-".repeat(52));

    for [period, received, emitted, persisted, failures] in summary_rows(summary) {
        println!("{period:<8} {received:>10} {emitted:>10} {persisted:>10} {failures:>10}");
    }

    println!("\nTicks: {ticks}");
    println!(
        "Errors: {} windowing, {} persistence, {} configuration",
        summary.windowing, summary.persistence, summary.configuration
    );
    if summary.panicked > 0 {
        println!("Panicked tasks: {}", summary.panicked);
    }
    println!("Output: {}", output_dir.display());
}
