//! Pipeline errors.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;
use tickday_format::FormatError;

/// Errors that stop a pipeline run.
///
/// Per-hour problems (no data, corrupt payloads, exhausted retries) are not
/// errors; they are reported in the run summary instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured output format cannot be written by this build.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An hour was handed to the assembler out of chronological order.
    #[error("Hour {hour} assembled out of order (after {previous})")]
    OutOfOrder {
        /// The offending hour.
        hour: DateTime<Utc>,
        /// The hour assembled before it.
        previous: DateTime<Utc>,
    },
}
