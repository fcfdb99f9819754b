//! Progress bars, format selection and summary output for the tickday CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use tickday_lib::{DayReport, DayStatus, OutputFormat, ProgressObserver, RunSummary};
use tracing::debug;

/// Output format for downloaded data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Comma-separated text
    #[value(alias = "text")]
    Csv,
    /// Gzip-compressed comma-separated text
    #[value(aliases = ["compressed-text", "csv.gz"])]
    CsvGz,
    /// Parquet
    #[value(alias = "columnar")]
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::CsvGz => Self::CsvGz,
            Format::Parquet => Self::Parquet,
        }
    }
}

/// Renders one progress bar per day, counting hours.
pub(crate) struct ProgressReporter {
    hidden: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub(crate) const fn new(hidden: bool) -> Self {
        Self {
            hidden,
            current: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.current.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

impl ProgressObserver for ProgressReporter {
    fn day_skipped(&self, date: NaiveDate, path: &Path) {
        if !self.hidden {
            eprintln!("{date} already downloaded ({}), skipping", path.display());
        }
    }

    fn day_started(&self, date: NaiveDate, hours: usize) {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(hours as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hours {msg}",
            ) {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        };
        bar.set_message(date.to_string());

        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(bar);
        }
    }

    fn hour_fetched(&self, _hour: DateTime<Utc>) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn hour_decoded(&self, hour: DateTime<Utc>, ticks: usize) {
        debug!(hour = %hour, ticks, "hour decoded");
        self.with_bar(|bar| {
            bar.set_message(format!("{} -> {ticks} ticks", hour.format("%Y-%m-%d %H:00")));
        });
    }

    fn day_finished(&self, report: &DayReport) {
        let message = match report.status {
            DayStatus::Written if report.failed_hours.is_empty() => {
                format!("{} -> {} ticks", report.date, report.ticks)
            }
            DayStatus::Written => format!(
                "{} -> {} ticks ({} hours missing)",
                report.date,
                report.ticks,
                report.failed_hours.len()
            ),
            DayStatus::Failed => format!(
                "{} failed: {}",
                report.date,
                report.error.as_deref().unwrap_or("unknown error")
            ),
            DayStatus::Skipped => return,
        };
        self.with_bar(|bar| bar.finish_with_message(message));

        if let Ok(mut guard) = self.current.lock() {
            *guard = None;
        }
    }
}

/// Prints a human-readable run summary to stdout.
pub(crate) fn print_summary(summary: &RunSummary) {
    println!(
        "Days: {} written, {} skipped, {} failed (of {})",
        summary.days_written, summary.days_skipped, summary.days_failed, summary.days_total
    );
    println!("Ticks written: {}", summary.total_ticks);

    if summary.days_not_attempted > 0 {
        println!("Days not attempted: {}", summary.days_not_attempted);
    }

    if summary.failed_hours > 0 {
        println!("Hours that failed to download: {}", summary.failed_hours);
        for day in summary.days.iter().filter(|d| !d.failed_hours.is_empty()) {
            for url in &day.failed_hours {
                println!("  {} {}", day.date, url);
            }
        }
    }

    for day in summary.days.iter().filter(|d| d.status == DayStatus::Failed) {
        println!(
            "Failed {}: {}",
            day.date,
            day.error.as_deref().unwrap_or("unknown error")
        );
    }
}
