//! Core types for the tickday tick data pipeline.
//!
//! This crate provides the fundamental data structures used throughout tickday:
//!
//! - [`Tick`] - A decoded quote with millisecond timestamp, ask and bid
//! - [`RawRecord`] - One 20-byte bi5 record before price scaling
//! - [`Instrument`] - Symbol and price scale factor
//! - [`DateRange`] - Inclusive calendar-day range
//! - [`hours_between`] - Hour enumerator over a half-open interval

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod instrument;
mod tick;

pub use date_range::{DateRange, DayIterator, HourIterator, MS_PER_HOUR, day_start, hours_between};
pub use error::{DateRangeError, Result, TickdayError};
pub use instrument::{DEFAULT_SCALE_FACTOR, Instrument, MIN_PRICE_DECIMALS};
pub use tick::{RawRecord, Tick};
