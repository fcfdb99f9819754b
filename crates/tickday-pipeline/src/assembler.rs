//! Folds decoded hours into one chronological day.

use chrono::{DateTime, NaiveDate, Utc};
use tickday_fetch::{DecodeStatus, FailedHour, HourSlot, decode_hour};
use tickday_types::Tick;
use tracing::debug;

use crate::PipelineError;

/// What one hour contributed to its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourReport {
    /// Hour start.
    pub hour_start: DateTime<Utc>,
    /// Ticks appended from this hour.
    pub ticks: usize,
    /// How the payload decoded.
    pub status: DecodeStatus,
    /// Records dropped for falling outside the hour.
    pub skipped: usize,
}

/// One assembled day, ready to be written.
#[derive(Debug, Clone)]
pub struct DayResult {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Ticks in non-decreasing timestamp order.
    pub ticks: Vec<Tick>,
    /// Per-hour contributions in hour order.
    pub hours: Vec<HourReport>,
    /// Hours whose fetch failed; they contributed no ticks.
    pub failed_hours: Vec<FailedHour>,
}

impl DayResult {
    /// Returns the number of ticks in the day.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if any hour failed to fetch.
    #[must_use]
    pub fn has_failed_hours(&self) -> bool {
        !self.failed_hours.is_empty()
    }
}

/// Accumulates a day's ticks hour by hour.
///
/// Hours must be pushed in strictly ascending order. Within an hour, ticks
/// keep the order they had in the payload, so the concatenation is the
/// day's chronological sequence.
#[derive(Debug)]
pub struct DayAssembler {
    date: NaiveDate,
    scale_factor: f64,
    ticks: Vec<Tick>,
    hours: Vec<HourReport>,
    last_hour: Option<DateTime<Utc>>,
}

impl DayAssembler {
    /// Creates an assembler for `date` decoding prices with `scale_factor`.
    #[must_use]
    pub const fn new(date: NaiveDate, scale_factor: f64) -> Self {
        Self {
            date,
            scale_factor,
            ticks: Vec::new(),
            hours: Vec::new(),
            last_hour: None,
        }
    }

    /// Returns the day being assembled.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Decodes one fetched hour and appends its ticks.
    ///
    /// Returns the number of ticks appended. An unfetched slot is treated as
    /// an empty hour.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OutOfOrder`] if `slot` is not later than the
    /// previously pushed hour.
    pub fn push_hour(&mut self, slot: &HourSlot) -> Result<usize, PipelineError> {
        if let Some(previous) = self.last_hour {
            if slot.hour_start <= previous {
                return Err(PipelineError::OutOfOrder {
                    hour: slot.hour_start,
                    previous,
                });
            }
        }
        self.last_hour = Some(slot.hour_start);

        let mut decoded = decode_hour(slot.hour_start, slot.payload_bytes(), self.scale_factor);
        let before = self.ticks.len();
        self.ticks.extend(&mut decoded);
        let added = self.ticks.len() - before;

        debug!(hour = %slot.hour_start, ticks = added, "assembled hour");
        self.hours.push(HourReport {
            hour_start: slot.hour_start,
            ticks: added,
            status: decoded.status(),
            skipped: decoded.skipped(),
        });
        Ok(added)
    }

    /// Returns the number of ticks accumulated so far.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Finishes the day, attaching the hours whose fetch failed.
    #[must_use]
    pub fn finish(self, failed_hours: Vec<FailedHour>) -> DayResult {
        DayResult {
            date: self.date,
            ticks: self.ticks,
            hours: self.hours,
            failed_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::{TimeDelta, TimeZone};
    use tickday_fetch::{compress_bi5, encode_records};
    use tickday_types::RawRecord;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    fn hour(h: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap() + TimeDelta::hours(h)
    }

    fn record(ms_offset: u32, ask_raw: u32) -> RawRecord {
        RawRecord {
            ms_offset,
            ask_raw,
            bid_raw: ask_raw - 100,
            volume_raw: 0,
            reserved: 0,
        }
    }

    fn slot(h: i64, records: &[RawRecord]) -> HourSlot {
        let payload = if records.is_empty() {
            Bytes::new()
        } else {
            Bytes::from(compress_bi5(&encode_records(records)).unwrap())
        };
        HourSlot {
            hour_start: hour(h),
            url: format!("hour-{h}"),
            payload: Some(payload),
        }
    }

    #[test]
    fn test_concatenates_hours_in_order() {
        let mut assembler = DayAssembler::new(date(), 1000.0);
        assert_eq!(
            assembler
                .push_hour(&slot(0, &[record(10, 2_000_000), record(20, 2_000_100)]))
                .unwrap(),
            2
        );
        assert_eq!(assembler.push_hour(&slot(1, &[])).unwrap(), 0);
        assert_eq!(
            assembler.push_hour(&slot(2, &[record(5, 2_001_000)])).unwrap(),
            1
        );

        let day = assembler.finish(Vec::new());
        assert_eq!(day.tick_count(), 3);
        assert!(!day.has_failed_hours());
        let stamps: Vec<i64> = day.ticks.iter().map(Tick::timestamp_ms).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stamps[2], hour(2).timestamp_millis() + 5);
        assert_eq!(day.hours.len(), 3);
        assert_eq!(day.hours[1].status, DecodeStatus::Empty);
    }

    #[test]
    fn test_rejects_out_of_order_hours() {
        let mut assembler = DayAssembler::new(date(), 1000.0);
        assembler.push_hour(&slot(5, &[])).unwrap();
        let err = assembler.push_hour(&slot(4, &[])).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder { .. }));
        let err = assembler.push_hour(&slot(5, &[])).unwrap_err();
        assert!(matches!(err, PipelineError::OutOfOrder { .. }));
    }

    #[test]
    fn test_corrupt_hour_contributes_nothing() {
        let mut assembler = DayAssembler::new(date(), 1000.0);
        let corrupt = HourSlot {
            hour_start: hour(3),
            url: "corrupt".to_string(),
            payload: Some(Bytes::from_static(b"not lzma at all")),
        };
        assert_eq!(assembler.push_hour(&corrupt).unwrap(), 0);
        let day = assembler.finish(Vec::new());
        assert_eq!(day.hours[0].status, DecodeStatus::Corrupt);
    }

    #[test]
    fn test_out_of_hour_records_are_counted() {
        let mut assembler = DayAssembler::new(date(), 1000.0);
        let records = [record(100, 2_000_000), record(3_600_000, 2_000_000)];
        assert_eq!(assembler.push_hour(&slot(0, &records)).unwrap(), 1);
        let day = assembler.finish(Vec::new());
        assert_eq!(day.hours[0].skipped, 1);
    }

    #[test]
    fn test_unfetched_slot_is_empty_hour() {
        let mut assembler = DayAssembler::new(date(), 1000.0);
        let pending = HourSlot::new(hour(0), "pending".to_string());
        assert_eq!(assembler.push_hour(&pending).unwrap(), 0);
        assert_eq!(assembler.tick_count(), 0);
    }
}
