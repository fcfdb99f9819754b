//! Tick data representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MS_PER_HOUR;

/// A single decoded quote.
///
/// Ticks are immutable once constructed; the timestamp is kept as UTC epoch
/// milliseconds, exactly as it is written to the output files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    timestamp_ms: i64,
    ask: f64,
    bid: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp_ms: i64, ask: f64, bid: f64) -> Self {
        Self {
            timestamp_ms,
            ask,
            bid,
        }
    }

    /// Returns the timestamp as UTC epoch milliseconds.
    #[must_use]
    pub const fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Returns the timestamp as a UTC datetime, if representable.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    /// Ask (offer) price.
    #[must_use]
    pub const fn ask(&self) -> f64 {
        self.ask
    }

    /// Bid price.
    #[must_use]
    pub const fn bid(&self) -> f64 {
        self.bid
    }
}

/// Raw record as read from a decompressed bi5 buffer (before price scaling).
///
/// The bi5 format stores records as 20 bytes, five big-endian `u32` fields:
/// - `ms_offset`: milliseconds from the hour start
/// - `ask_raw`: ask price as a fixed-point integer
/// - `bid_raw`: bid price as a fixed-point integer
/// - `volume_raw`: volume field, carried but not interpreted
/// - `reserved`: trailing field, carried but not interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawRecord {
    /// Milliseconds offset from the hour start.
    pub ms_offset: u32,
    /// Raw ask price (needs division by the scale factor).
    pub ask_raw: u32,
    /// Raw bid price (needs division by the scale factor).
    pub bid_raw: u32,
    /// Raw volume word.
    pub volume_raw: u32,
    /// Reserved trailing word.
    pub reserved: u32,
}

impl RawRecord {
    /// Size in bytes of a raw record.
    pub const SIZE: usize = 20;

    /// Creates a new raw record.
    #[must_use]
    pub const fn new(
        ms_offset: u32,
        ask_raw: u32,
        bid_raw: u32,
        volume_raw: u32,
        reserved: u32,
    ) -> Self {
        Self {
            ms_offset,
            ask_raw,
            bid_raw,
            volume_raw,
            reserved,
        }
    }

    /// Returns true if the offset lies inside a single hour.
    #[must_use]
    pub const fn in_hour(&self) -> bool {
        self.ms_offset < MS_PER_HOUR
    }

    /// Converts the record into a tick anchored at `hour_start_ms`.
    ///
    /// Returns `None` when the offset falls outside the hour; such records
    /// are dropped rather than clamped.
    #[must_use]
    pub fn to_tick(self, hour_start_ms: i64, scale_factor: f64) -> Option<Tick> {
        if !self.in_hour() {
            return None;
        }
        Some(Tick {
            timestamp_ms: hour_start_ms + i64::from(self.ms_offset),
            ask: f64::from(self.ask_raw) / scale_factor,
            bid: f64::from(self.bid_raw) / scale_factor,
        })
    }
}
