//! Progress reporting hooks.

use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

use crate::DayReport;

/// Receives progress events from a pipeline run.
///
/// Every method has a no-op default.
pub trait ProgressObserver: Send + Sync {
    /// A day was skipped because its output already exists.
    fn day_skipped(&self, _date: NaiveDate, _path: &Path) {}

    /// Fetching of a day's `hours` hours is about to start.
    fn day_started(&self, _date: NaiveDate, _hours: usize) {}

    /// One hour's fetch completed (in completion order).
    fn hour_fetched(&self, _hour: DateTime<Utc>) {}

    /// One hour was decoded into `ticks` ticks (in hour order).
    fn hour_decoded(&self, _hour: DateTime<Utc>, _ticks: usize) {}

    /// A day finished with the given outcome.
    fn day_finished(&self, _report: &DayReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
