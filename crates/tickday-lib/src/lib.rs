//! Download Dukascopy tick data into one file per day.
//!
//! This is a facade crate that re-exports functionality from the tickday
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use tickday_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let instrument = Instrument::from_symbol("XAUUSD")?;
//!     let range = DateRange::parse("2025-01-01", "2025-01-07")?;
//!
//!     let client = DownloadClient::new(ClientConfig::default())?;
//!     let concurrency = client.config().concurrency;
//!     let config = PipelineConfig::new(instrument, "data_raw");
//!     let pipeline = Pipeline::new(client, RetryPolicy::default(), concurrency, config);
//!
//!     let summary = pipeline.run(&range, &NoopObserver).await?;
//!     println!("wrote {} ticks", summary.total_ticks);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tickday_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use tickday_fetch::{
    ClientConfig, DayFetch, DecodeStatus, DecompressError, DownloadClient, DownloadError,
    FailedHour, FetchPool, HourSlot, HourSource, HourTicks, ParseError, RetryPolicy, Sleeper,
    TokioSleeper, compress_bi5, decode_hour, decompress_bi5, encode_records, parse_records, url,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use tickday_format::{
    CsvFormatter, FormatError, Formatter, GzipCsvFormatter, OutputFormat, OutputTarget,
    write_atomic,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use tickday_format::ParquetFormatter;

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use tickday_pipeline::{
    DayAssembler, DayErrorPolicy, DayReport, DayResult, DayStatus, FailedHourPolicy,
    HourReport, NoopObserver, Pipeline, PipelineConfig, PipelineError, ProgressObserver,
    RunSummary,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tickday_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickday_types::{DateRange, DateRangeError, Instrument, Result, Tick, TickdayError};

    #[cfg(feature = "fetch")]
    pub use tickday_fetch::{ClientConfig, DownloadClient, RetryPolicy};

    #[cfg(feature = "format")]
    pub use tickday_format::OutputFormat;

    #[cfg(feature = "pipeline")]
    pub use tickday_pipeline::{
        DayErrorPolicy, FailedHourPolicy, NoopObserver, Pipeline, PipelineConfig,
        ProgressObserver, RunSummary,
    };
}
