//! HTTP fetching and bi5 decoding for the tickday tick data pipeline.
//!
//! This crate provides the per-hour download and decode path:
//!
//! - [`url::tick_url`] - Constructs Dukascopy data URLs
//! - [`DownloadClient`] - HTTP client implementing [`HourSource`]
//! - [`RetryPolicy`] and [`fetch_with_retry`] - Exponential backoff
//! - [`FetchPool`] - Bounded scatter-gather fetch of one day's hours
//! - [`decompress_bi5`] - LZMA decompression
//! - [`parse_records`] - Binary record parsing
//! - [`decode_hour`] - Lazy payload-to-tick decoding

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decode;
mod decompress;
mod parse;
mod pool;
mod retry;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError, HourSource};
pub use decode::{DecodeStatus, HourTicks, decode_hour};
pub use decompress::{DecompressError, compress_bi5, decompress_bi5};
pub use parse::{ParseError, encode_records, parse_records};
pub use pool::{DayFetch, FailedHour, FetchPool, HourSlot};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, fetch_with_retry};
