//! Output format abstraction.

use std::io::Write;
use thiserror::Error;
use tickday_types::Tick;

use crate::{CsvFormatter, GzipCsvFormatter};

/// Column names shared by every format, in order.
pub const COLUMNS: [&str; 3] = ["timestamp", "askPrice", "bidPrice"];

const PARQUET_UNAVAILABLE: &str = "parquet output requires building with the `parquet` feature";

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Delimited text table.
    #[default]
    Csv,
    /// Gzip-compressed delimited text table.
    CsvGz,
    /// Apache Parquet columnar table.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::CsvGz => "csv.gz",
            Self::Parquet => "parquet",
        }
    }

    /// Returns true if this build can write the format.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        match self {
            Self::Csv | Self::CsvGz => true,
            Self::Parquet => cfg!(feature = "parquet"),
        }
    }

    /// Fails fast if this build cannot write the format.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Unavailable`] for formats compiled out.
    pub fn ensure_available(&self) -> Result<(), FormatError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(FormatError::Unavailable(PARQUET_UNAVAILABLE))
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "text" => Ok(Self::Csv),
            "csv.gz" | "csvgz" | "gz" | "compressed-text" => Ok(Self::CsvGz),
            "parquet" | "pq" | "columnar" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// The format is not available in this build.
    #[error("Format unavailable: {0}")]
    Unavailable(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes tick data to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// Writes `ticks` in `format`, rendering text prices with `decimals` places.
///
/// # Errors
///
/// Returns an error if writing fails or the format is unavailable.
pub fn write_ticks<W: Write + Send>(
    format: OutputFormat,
    ticks: &[Tick],
    writer: W,
    decimals: usize,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Csv => CsvFormatter::new()
            .with_precision(decimals)
            .write_ticks(ticks, writer),
        OutputFormat::CsvGz => GzipCsvFormatter::new(CsvFormatter::new().with_precision(decimals))
            .write_ticks(ticks, writer),
        OutputFormat::Parquet => {
            #[cfg(feature = "parquet")]
            {
                crate::ParquetFormatter::new().write_ticks(ticks, writer)
            }
            #[cfg(not(feature = "parquet"))]
            {
                drop(writer);
                Err(FormatError::Unavailable(PARQUET_UNAVAILABLE))
            }
        }
    }
}
