//! Error types for tickday.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for run-description validation.
pub type Result<T> = std::result::Result<T, TickdayError>;

/// Errors in the user-supplied description of a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickdayError {
    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Invalid instrument configuration.
    #[error("Invalid instrument: {0}")]
    Instrument(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
