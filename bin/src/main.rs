//! tickday CLI - Download Dukascopy tick data into one file per day.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod display;
mod download;

use display::Format;

#[derive(Parser)]
#[command(name = "tickday")]
#[command(about = "Download Dukascopy tick data into one file per day", long_about = None)]
#[command(version)]
struct Cli {
    /// First day to download (YYYY-MM-DD, UTC, inclusive)
    #[arg(long, alias = "start")]
    start_date: String,

    /// Last day to download (YYYY-MM-DD, UTC, inclusive)
    #[arg(long, alias = "end")]
    end_date: String,

    /// Instrument symbol (e.g. XAUUSD, EURUSD)
    #[arg(short, long, default_value = "XAUUSD")]
    instrument: String,

    /// Price scale factor; defaults to the known factor for the symbol
    #[arg(long)]
    scale_factor: Option<f64>,

    /// Output directory, one file per day
    #[arg(short, long, default_value = "data_raw")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Maximum concurrent hour downloads
    #[arg(long, default_value = "8")]
    concurrency: usize,

    /// Retries per hour for transient failures
    #[arg(long, default_value = "3")]
    retries: u32,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Decimal places for prices in text output; defaults to the
    /// instrument's precision (at least 3)
    #[arg(long)]
    decimals: Option<usize>,

    /// Rewrite days whose output already exists
    #[arg(long)]
    force: bool,

    /// Do not write a day if any of its hours failed to download
    #[arg(long)]
    fail_day_on_hour_error: bool,

    /// Stop at the first failed day instead of continuing
    #[arg(long)]
    halt_on_day_error: bool,

    /// Feed base URL
    #[arg(long, hide = true)]
    base_url: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long)]
    quiet: bool,
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let summary = download::download(&cli).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        display::print_summary(&summary);
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
