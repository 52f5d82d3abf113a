//! Run command implementation.
//!
//! Wires the price generator into the aggregation pipeline and runs until
//! the generator stops or the process is interrupted.

use crate::display::print_summary;
use anyhow::{Context, Result, bail};
use candela_lib::prelude::*;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Arguments of the `run` command.
#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Tickers to generate (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = "AAPL,SBER,NVDA,TSLA")]
    tickers: Vec<String>,

    /// Volatility divisor; each round moves a price by less than 1/factor
    #[arg(short, long, default_value = "10")]
    factor: f64,

    /// Delay between price rounds in milliseconds
    #[arg(long, default_value = "500")]
    delay_ms: u64,

    /// Seed for a reproducible price walk
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks instead of running until interrupted
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Use a virtual clock advancing by the delay per round, without sleeping
    #[arg(long, conflicts_with = "accelerate")]
    simulated: bool,

    /// Stamp prices this many times faster than the wall clock
    #[arg(long)]
    accelerate: Option<u32>,

    /// Cascade periods, finest first (e.g. 1m,2m,10m)
    #[arg(short, long)]
    periods: Option<String>,

    /// Directory receiving candles_<period>.csv files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Append to existing candle files instead of truncating them
    #[arg(long)]
    append: bool,

    /// Capacity of every channel in the pipeline
    #[arg(long)]
    capacity: Option<usize>,

    /// JSON file with a pipeline configuration (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(list) = &self.periods {
            config.periods = PipelineConfig::parse_periods(list)
                .with_context(|| format!("Invalid period list: {list}"))?;
        }
        if let Some(capacity) = self.capacity {
            config.channel_capacity = capacity;
            config.error_capacity = capacity;
        }
        Ok(config)
    }

    fn generator_config(&self) -> GeneratorConfig {
        let delay = Duration::from_millis(self.delay_ms);
        let clock = match (self.simulated, self.accelerate) {
            (true, _) => Clock::Simulated {
                start: Utc::now(),
                step: delay,
            },
            (false, Some(speedup)) => Clock::Accelerated { speedup },
            (false, None) => Clock::Realtime,
        };

        GeneratorConfig {
            tickers: self.tickers.clone(),
            factor: self.factor,
            delay,
            seed: self.seed,
            clock,
            max_ticks: self.max_ticks,
        }
    }
}

/// Run the generator and the aggregation pipeline until shutdown.
pub(crate) async fn run(args: RunArgs, quiet: bool) -> Result<()> {
    let config = args.pipeline_config()?;
    let capacity = config.channel_capacity;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;
    let mode = if args.append {
        WriteMode::Append
    } else {
        WriteMode::Truncate
    };
    let provider = Arc::new(FileSinkProvider::new(&args.output_dir).with_mode(mode));
    let pipeline = Pipeline::new(config, provider).context("Invalid pipeline configuration")?;

    let generator =
        PriceGenerator::new(args.generator_config()).context("Invalid generator configuration")?;

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(shutdown_signal(cancel.clone()));

    tracing::info!(
        tickers = ?generator.config().tickers,
        output_dir = %args.output_dir.display(),
        "starting candle aggregation"
    );
    let (prices, source) = spawn_source(generator, cancel.clone(), capacity);
    let summary = pipeline.run(prices).await;
    let sent = source.await.context("Price source task failed")?;

    // Release the signal listener if the source stopped on its own
    cancel.cancel();
    signals.await.context("Signal task failed")?;

    if !quiet {
        print_summary(&summary, sent, &args.output_dir);
    }
    if summary.panicked > 0 {
        bail!("{} pipeline task(s) panicked", summary.panicked);
    }
    Ok(())
}

/// Cancels `cancel` on Ctrl+C or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = cancel.cancelled() => return,
        () = ctrl_c => tracing::info!("received Ctrl+C, draining pipeline"),
        () = terminate => tracing::info!("received SIGTERM, draining pipeline"),
    }
    cancel.cancel();
}
