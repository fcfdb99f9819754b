//! Run outcome reporting.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// Final state of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// A new file was committed.
    Written,
    /// The output already existed; nothing was fetched.
    Skipped,
    /// The day was abandoned; no file was committed.
    Failed,
}

/// Outcome of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    /// Calendar day.
    pub date: NaiveDate,
    /// Final state.
    pub status: DayStatus,
    /// Output path (final, whether or not it was written).
    pub path: PathBuf,
    /// Ticks written (zero unless written).
    pub ticks: usize,
    /// URLs of hours whose fetch failed after all retries.
    pub failed_hours: Vec<String>,
    /// Error message for failed days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DayReport {
    /// Report for a day skipped because its output exists.
    #[must_use]
    pub const fn skipped(date: NaiveDate, path: PathBuf) -> Self {
        Self {
            date,
            status: DayStatus::Skipped,
            path,
            ticks: 0,
            failed_hours: Vec::new(),
            error: None,
        }
    }
}

/// Totals and per-day outcomes for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Days in the requested range.
    pub days_total: usize,
    /// Days with a newly committed file.
    pub days_written: usize,
    /// Days skipped because their output already existed.
    pub days_skipped: usize,
    /// Days that failed.
    pub days_failed: usize,
    /// Days never attempted because the run halted early.
    pub days_not_attempted: usize,
    /// Ticks written across all days.
    pub total_ticks: usize,
    /// Hours whose fetch failed across all days.
    pub failed_hours: usize,
    /// Per-day outcomes in date order.
    pub days: Vec<DayReport>,
}

impl RunSummary {
    /// Creates an empty summary for a range of `days_total` days.
    #[must_use]
    pub const fn new(days_total: usize) -> Self {
        Self {
            days_total,
            days_written: 0,
            days_skipped: 0,
            days_failed: 0,
            days_not_attempted: 0,
            total_ticks: 0,
            failed_hours: 0,
            days: Vec::new(),
        }
    }

    /// Adds one day's outcome to the totals.
    pub fn record(&mut self, report: DayReport) {
        match report.status {
            DayStatus::Written => {
                self.days_written += 1;
                self.total_ticks += report.ticks;
            }
            DayStatus::Skipped => self.days_skipped += 1,
            DayStatus::Failed => self.days_failed += 1,
        }
        self.failed_hours += report.failed_hours.len();
        self.days.push(report);
    }

    /// Returns true if no day failed and every day was attempted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.days_failed == 0 && self.days_not_attempted == 0
    }

    /// Returns true if any written day is missing hours.
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        self.days
            .iter()
            .any(|d| d.status == DayStatus::Written && !d.failed_hours.is_empty())
    }
}
