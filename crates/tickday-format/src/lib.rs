//! Output formats and atomic day-file commits for tickday.
//!
//! - [`CsvFormatter`] - Delimited text table
//! - [`GzipCsvFormatter`] - Gzip-compressed delimited text table
//! - [`ParquetFormatter`] - Apache Parquet columnar table
//! - [`OutputTarget`] - Day file naming, resume check and atomic commit

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod target;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::{CsvFormatter, GzipCsvFormatter};
pub use formatter::{COLUMNS, FormatError, Formatter, OutputFormat, write_ticks};
pub use target::{OutputTarget, write_atomic};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
