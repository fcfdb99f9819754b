//! Day-by-day orchestration of fetch, decode and write.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tickday_fetch::{DayFetch, FetchPool, HourSlot, HourSource, RetryPolicy, Sleeper, TokioSleeper};
use tickday_format::{OutputFormat, OutputTarget};
use tickday_types::{DateRange, Instrument};
use tracing::{debug, error, info, warn};

use crate::{DayAssembler, DayReport, DayStatus, PipelineError, ProgressObserver, RunSummary};

/// What to do with a day when some of its hours failed to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedHourPolicy {
    /// Write the day without the failed hours and report them.
    #[default]
    Warn,
    /// Abandon the day; nothing is written.
    FailDay,
}

/// What to do with the remaining days when one day fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayErrorPolicy {
    /// Log the failure and move on to the next day.
    #[default]
    Continue,
    /// Stop the run; later days are reported as not attempted.
    Halt,
}

/// Settings for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Instrument to download.
    pub instrument: Instrument,
    /// Directory receiving one file per day.
    pub output_dir: PathBuf,
    /// Output file format.
    pub format: OutputFormat,
    /// Rewrite days whose output already exists.
    pub force: bool,
    /// Decimal places for prices in text formats; defaults to the
    /// instrument's [`Instrument::price_decimals`].
    pub decimals: usize,
    /// Handling of hours that failed to fetch.
    pub failed_hour_policy: FailedHourPolicy,
    /// Handling of failed days.
    pub day_error_policy: DayErrorPolicy,
    /// Feed base URL.
    pub base_url: String,
}

impl PipelineConfig {
    /// Creates a configuration with CSV output and default policies.
    #[must_use]
    pub fn new(instrument: Instrument, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            decimals: instrument.price_decimals(),
            instrument,
            output_dir: output_dir.into(),
            format: OutputFormat::default(),
            force: false,
            failed_hour_policy: FailedHourPolicy::default(),
            day_error_policy: DayErrorPolicy::default(),
            base_url: tickday_fetch::url::BASE_URL.to_string(),
        }
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether existing outputs are rewritten.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Overrides the number of price decimals for text formats.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Sets the failed-hour policy.
    #[must_use]
    pub const fn with_failed_hour_policy(mut self, policy: FailedHourPolicy) -> Self {
        self.failed_hour_policy = policy;
        self
    }

    /// Sets the day-error policy.
    #[must_use]
    pub const fn with_day_error_policy(mut self, policy: DayErrorPolicy) -> Self {
        self.day_error_policy = policy;
        self
    }

    /// Sets the feed base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the output target for `date`.
    #[must_use]
    pub fn target_for(&self, date: NaiveDate) -> OutputTarget {
        OutputTarget::for_day(
            &self.output_dir,
            &self.instrument.file_stem(),
            date,
            self.format,
        )
    }
}

/// Downloads a date range one day at a time.
///
/// Days are processed strictly in order; within a day, hours are fetched
/// concurrently through the [`FetchPool`] and assembled in hour order.
#[derive(Debug)]
pub struct Pipeline<S, Z = TokioSleeper> {
    pool: FetchPool<S, Z>,
    config: PipelineConfig,
}

impl<S: HourSource> Pipeline<S> {
    /// Creates a pipeline fetching from `source`.
    pub fn new(
        source: S,
        retry: RetryPolicy,
        concurrency: usize,
        config: PipelineConfig,
    ) -> Self {
        Self::with_pool(FetchPool::new(source, retry, concurrency), config)
    }
}

impl<S: HourSource, Z: Sleeper> Pipeline<S, Z> {
    /// Creates a pipeline around an existing fetch pool.
    pub const fn with_pool(pool: FetchPool<S, Z>, config: PipelineConfig) -> Self {
        Self { pool, config }
    }

    /// Returns the run configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the fetch pool.
    pub const fn pool(&self) -> &FetchPool<S, Z> {
        &self.pool
    }

    /// Processes every day of `range` in ascending order.
    ///
    /// A day whose output already exists is skipped without any network
    /// traffic unless `force` is set. Per-day failures are recorded in the
    /// summary and, unless the day-error policy is [`DayErrorPolicy::Halt`],
    /// do not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error before any day is attempted if the output format is
    /// unavailable in this build or the output directory cannot be created.
    pub async fn run(
        &self,
        range: &DateRange,
        observer: &dyn ProgressObserver,
    ) -> Result<RunSummary, PipelineError> {
        self.config.format.ensure_available()?;
        fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            PipelineError::OutputDir {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;

        info!(
            instrument = %self.config.instrument,
            range = %range,
            format = %self.config.format,
            output = %self.config.output_dir.display(),
            "starting run"
        );

        let mut summary = RunSummary::new(range.total_days());

        for (index, date) in range.days().enumerate() {
            let target = self.config.target_for(date);

            if !self.config.force && target.exists() {
                info!(date = %date, path = %target.path().display(), "output exists; skipping day");
                observer.day_skipped(date, target.path());
                let report = DayReport::skipped(date, target.path().to_path_buf());
                observer.day_finished(&report);
                summary.record(report);
                continue;
            }

            let report = self.run_day(date, &target, observer).await;
            observer.day_finished(&report);
            let failed = report.status == DayStatus::Failed;
            summary.record(report);

            if failed && self.config.day_error_policy == DayErrorPolicy::Halt {
                summary.days_not_attempted = summary.days_total - index - 1;
                warn!(
                    date = %date,
                    remaining = summary.days_not_attempted,
                    "halting run after failed day"
                );
                break;
            }
        }

        info!(
            written = summary.days_written,
            skipped = summary.days_skipped,
            failed = summary.days_failed,
            ticks = summary.total_ticks,
            failed_hours = summary.failed_hours,
            "run finished"
        );
        Ok(summary)
    }

    async fn run_day(
        &self,
        date: NaiveDate,
        target: &OutputTarget,
        observer: &dyn ProgressObserver,
    ) -> DayReport {
        let symbol = self.config.instrument.symbol();
        let slots: Vec<HourSlot> = DateRange::single_day(date)
            .hours()
            .map(|hour| HourSlot::for_hour(&self.config.base_url, symbol, hour))
            .collect();

        debug!(date = %date, hours = slots.len(), "fetching day");
        observer.day_started(date, slots.len());

        let DayFetch { slots, failed } = self
            .pool
            .fetch_day_observed(slots, |slot| observer.hour_fetched(slot.hour_start))
            .await;

        let failed_urls: Vec<String> = failed.iter().map(|f| f.url.clone()).collect();
        let failed_report = |error: String| DayReport {
            date,
            status: DayStatus::Failed,
            path: target.path().to_path_buf(),
            ticks: 0,
            failed_hours: failed_urls.clone(),
            error: Some(error),
        };

        if !failed.is_empty() && self.config.failed_hour_policy == FailedHourPolicy::FailDay {
            let message = format!("{} of {} hours failed to fetch", failed.len(), slots.len());
            error!(date = %date, error = %message, "abandoning day");
            return failed_report(message);
        }

        let mut assembler = DayAssembler::new(date, self.config.instrument.scale_factor());
        for slot in slots.values() {
            match assembler.push_hour(slot) {
                Ok(ticks) => observer.hour_decoded(slot.hour_start, ticks),
                Err(e) => {
                    error!(date = %date, error = %e, "day assembly failed");
                    return failed_report(e.to_string());
                }
            }
        }
        let day = assembler.finish(failed);

        if day.has_failed_hours() {
            warn!(
                date = %date,
                failed_hours = day.failed_hours.len(),
                "writing day with missing hours"
            );
        }

        match target.commit(&day.ticks, self.config.decimals) {
            Ok(()) => {
                info!(
                    date = %date,
                    ticks = day.tick_count(),
                    path = %target.path().display(),
                    "wrote day"
                );
                DayReport {
                    date,
                    status: DayStatus::Written,
                    path: target.path().to_path_buf(),
                    ticks: day.tick_count(),
                    failed_hours: failed_urls,
                    error: None,
                }
            }
            Err(e) => {
                error!(date = %date, path = %target.path().display(), error = %e, "failed to write day");
                failed_report(e.to_string())
            }
        }
    }
}
