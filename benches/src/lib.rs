//! Benchmark fixtures for tickday.
//!
//! Synthetic hours shaped like busy Dukascopy gold hours: evenly spaced
//! offsets and a price wandering around 2650.

use chrono::{DateTime, TimeZone, Utc};
use tickday_lib::{RawRecord, Tick, compress_bi5, encode_records};

/// Scale factor of the fixture instrument.
pub const FIXTURE_SCALE: f64 = 1000.0;

/// Hour used by every fixture.
#[must_use]
pub fn fixture_hour() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 14, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Generates `count` in-hour records with non-decreasing offsets.
#[must_use]
pub fn synthetic_records(count: usize) -> Vec<RawRecord> {
    let step = (3_600_000 / count.max(1)) as u32;
    let mut ask = 2_650_000u32;
    (0..count)
        .map(|i| {
            let delta = (i as u32).wrapping_mul(2_654_435_761) % 7;
            ask = (ask + delta).saturating_sub(3);
            RawRecord::new(i as u32 * step, ask, ask - 250, 1_000, 0)
        })
        .collect()
}

/// Encodes and LZMA-compresses `count` records into a bi5 payload.
///
/// # Panics
///
/// Panics if in-memory compression fails.
#[must_use]
pub fn synthetic_payload(count: usize) -> Vec<u8> {
    compress_bi5(&encode_records(&synthetic_records(count))).expect("in-memory compression")
}

/// Converts `count` synthetic records into ticks.
#[must_use]
pub fn synthetic_ticks(count: usize) -> Vec<Tick> {
    let hour_ms = fixture_hour().timestamp_millis();
    synthetic_records(count)
        .into_iter()
        .filter_map(|r| r.to_tick(hour_ms, FIXTURE_SCALE))
        .collect()
}
