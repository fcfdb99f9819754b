//! Download command implementation.
//!
//! Turns the command line into a client and pipeline configuration and runs
//! the pipeline over the requested range.

use crate::Cli;
use crate::display::ProgressReporter;
use anyhow::Context;
use std::time::Duration;
use tickday_lib::prelude::*;

/// Resolves the instrument, honouring an explicit scale factor.
fn resolve_instrument(symbol: &str, scale_factor: Option<f64>) -> Result<Instrument> {
    match scale_factor {
        Some(scale) => Instrument::new(symbol, scale),
        None => Instrument::from_symbol(symbol),
    }
}

/// Validates the requested range and instrument before any network work.
fn resolve_run(cli: &Cli) -> Result<(DateRange, Instrument)> {
    let range = DateRange::parse(&cli.start_date, &cli.end_date)?;
    let instrument = resolve_instrument(&cli.instrument, cli.scale_factor)?;
    Ok((range, instrument))
}

/// Builds the pipeline configuration from the command line.
fn pipeline_config(cli: &Cli, instrument: Instrument) -> PipelineConfig {
    let failed_hours = if cli.fail_day_on_hour_error {
        FailedHourPolicy::FailDay
    } else {
        FailedHourPolicy::Warn
    };
    let day_errors = if cli.halt_on_day_error {
        DayErrorPolicy::Halt
    } else {
        DayErrorPolicy::Continue
    };

    let mut config = PipelineConfig::new(instrument, &cli.output)
        .with_format(cli.format.into())
        .with_force(cli.force)
        .with_failed_hour_policy(failed_hours)
        .with_day_error_policy(day_errors);

    if let Some(decimals) = cli.decimals {
        config = config.with_decimals(decimals);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    config
}

/// Downloads the requested range and returns the run summary.
pub(crate) async fn download(cli: &Cli) -> anyhow::Result<RunSummary> {
    let (range, instrument) = resolve_run(cli)?;

    let format: OutputFormat = cli.format.into();
    format
        .ensure_available()
        .with_context(|| format!("Cannot write {format} output"))?;

    let client_config = ClientConfig {
        concurrency: cli.concurrency,
        timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };
    let client = DownloadClient::new(client_config).context("Failed to create HTTP client")?;
    let concurrency = client.config().concurrency;

    let config = pipeline_config(cli, instrument);
    let output = config.output_dir.clone();
    let retry = RetryPolicy::with_max_retries(cli.retries);
    let pipeline = Pipeline::new(client, retry, concurrency, config);

    let reporter = ProgressReporter::new(cli.quiet || cli.json);
    pipeline
        .run(&range, &reporter)
        .await
        .with_context(|| format!("Failed to download into {}", output.display()))
}
