//! candela CLI - Multi-period candle aggregation over a live price stream.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Aggregate a live price stream into 1m, 2m and 10m candles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (warnings and errors only, no summary)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate prices and aggregate them until interrupted
    Run(RunArgs),

    /// List supported candle periods
    Periods,
}

/// Installs the global subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    init_tracing(cli.verbose, cli.quiet);

    match command {
        Commands::Run(args) => commands::run::run(args, cli.quiet).await,
        Commands::Periods => {
            commands::periods::list_periods();
            Ok(())
        }
    }
}
