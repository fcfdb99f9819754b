//! Date ranges, day iteration and hour enumeration.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::DateRangeError;

/// Number of milliseconds in one hour.
pub const MS_PER_HOUR: u32 = 3_600_000;

/// Returns midnight UTC at the start of `date`.
#[must_use]
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// An inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns an iterator over every calendar day in the range.
    #[must_use]
    pub const fn days(&self) -> DayIterator {
        DayIterator {
            current: Some(self.start),
            end: self.end,
        }
    }

    /// Returns an iterator over all hours in the range.
    #[must_use]
    pub fn hours(&self) -> HourIterator {
        hours_between(
            day_start(self.start),
            day_start(self.end) + TimeDelta::days(1),
        )
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns the total number of hours in the range.
    #[must_use]
    pub fn total_hours(&self) -> usize {
        self.total_days() * 24
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over the calendar days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.current.filter(|d| *d <= self.end)?;
        self.current = date.succ_opt();
        Some(date)
    }
}

/// Enumerates hour starts in the half-open interval `[start, end)`.
///
/// The sequence is ascending, spaced exactly one hour apart, and empty when
/// `end <= start`. Cloning the iterator restarts it from the same position.
#[must_use]
pub const fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> HourIterator {
    HourIterator {
        current: start,
        end,
    }
}

/// Iterator over hour starts; see [`hours_between`].
#[derive(Debug, Clone)]
pub struct HourIterator {
    current: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Iterator for HourIterator {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }

        let result = self.current;
        self.current += TimeDelta::hours(1);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current >= self.end {
            return (0, Some(0));
        }
        let span_ms = (self.end - self.current).num_milliseconds();
        let hours = (span_ms as u64).div_ceil(u64::from(MS_PER_HOUR)) as usize;
        (hours, Some(hours))
    }
}

impl ExactSizeIterator for HourIterator {}
