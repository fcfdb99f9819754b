//! Day assembly and pipeline driver for tickday.
//!
//! - [`DayAssembler`] - Folds decoded hours into a chronological [`DayResult`]
//! - [`Pipeline`] - Iterates days, orchestrating fetch, decode and write
//! - [`RunSummary`] - Per-day outcomes and totals
//! - [`ProgressObserver`] - Hooks for progress reporting

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assembler;
mod driver;
mod error;
mod observer;
mod summary;

pub use assembler::{DayAssembler, DayResult, HourReport};
pub use driver::{DayErrorPolicy, FailedHourPolicy, Pipeline, PipelineConfig};
pub use error::PipelineError;
pub use observer::{NoopObserver, ProgressObserver};
pub use summary::{DayReport, DayStatus, RunSummary};
