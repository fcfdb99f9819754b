//! Lazy decoding of one hour's payload into ticks.

use chrono::{DateTime, Utc};
use tickday_types::{RawRecord, Tick};
use tracing::warn;

use crate::decompress::decompress_bi5;
use crate::parse::parse_records;

/// What the decoder concluded about an hour payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The payload was empty (no data for the hour).
    Empty,
    /// The payload decompressed into whole records.
    Decoded,
    /// The compressed stream was malformed.
    Corrupt,
    /// The decompressed buffer was not a multiple of the record size.
    Misaligned,
}

impl DecodeStatus {
    /// Returns true if the payload was present but unusable.
    #[must_use]
    pub const fn is_unusable(&self) -> bool {
        matches!(self, Self::Corrupt | Self::Misaligned)
    }
}

/// Ticks decoded from one hour, yielded in buffer order.
///
/// The iterator owns the hour's parsed records and converts them to ticks
/// as it is consumed. Records whose offset falls outside the hour are
/// skipped and counted.
#[derive(Debug)]
pub struct HourTicks {
    records: std::vec::IntoIter<RawRecord>,
    hour_start_ms: i64,
    scale_factor: f64,
    status: DecodeStatus,
    skipped: usize,
}

impl HourTicks {
    fn new(records: Vec<RawRecord>, hour_start_ms: i64, scale_factor: f64, status: DecodeStatus) -> Self {
        Self {
            records: records.into_iter(),
            hour_start_ms,
            scale_factor,
            status,
            skipped: 0,
        }
    }

    /// Returns how the payload was classified.
    #[must_use]
    pub const fn status(&self) -> DecodeStatus {
        self.status
    }

    /// Returns the number of out-of-hour records skipped so far.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the number of records not yet examined.
    #[must_use]
    pub fn remaining_records(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for HourTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            match record.to_tick(self.hour_start_ms, self.scale_factor) {
                Some(tick) => return Some(tick),
                None => self.skipped += 1,
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining_records()))
    }
}

/// Decodes one hour's compressed payload.
///
/// An empty payload, a malformed LZMA stream and a buffer whose length is
/// not a multiple of 20 all yield an empty sequence; the latter two are
/// logged and reflected in [`HourTicks::status`], never returned as errors.
#[must_use]
pub fn decode_hour(hour_start: DateTime<Utc>, payload: &[u8], scale_factor: f64) -> HourTicks {
    let hour_start_ms = hour_start.timestamp_millis();
    let empty = |status| HourTicks::new(Vec::new(), hour_start_ms, scale_factor, status);

    if payload.is_empty() {
        return empty(DecodeStatus::Empty);
    }

    let buffer = match decompress_bi5(payload) {
        Ok(buffer) => buffer,
        Err(e) => {
            warn!(hour = %hour_start, error = %e, "malformed hour payload; treating as no data");
            return empty(DecodeStatus::Corrupt);
        }
    };

    match parse_records(&buffer) {
        Ok(records) => HourTicks::new(
            records.collect(),
            hour_start_ms,
            scale_factor,
            DecodeStatus::Decoded,
        ),
        Err(e) => {
            warn!(hour = %hour_start, error = %e, "misaligned hour buffer; treating as no data");
            empty(DecodeStatus::Misaligned)
        }
    }
}
