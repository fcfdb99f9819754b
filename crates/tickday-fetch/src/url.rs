//! Dukascopy URL construction.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Base URL for the Dukascopy data feed.
pub const BASE_URL: &str = "https://datafeed.dukascopy.com/datafeed";

/// Builds the URL for a specific hour's tick data.
///
/// URL format: `{base}/{INSTRUMENT}/{YEAR}/{MONTH}/{DAY}/{HOUR}h_ticks.bi5`
///
/// Note: Dukascopy uses 0-indexed months (January = 00).
///
/// # Example
///
/// ```
/// use tickday_fetch::url::{BASE_URL, tick_url};
/// use chrono::{TimeZone, Utc};
///
/// let hour = Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap();
/// let url = tick_url(BASE_URL, "xauusd", hour);
/// assert_eq!(url, "https://datafeed.dukascopy.com/datafeed/XAUUSD/2025/00/02/03h_ticks.bi5");
/// ```
#[must_use]
pub fn tick_url(base: &str, instrument: &str, hour: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{:04}/{:02}/{:02}/{:02}h_ticks.bi5",
        base.trim_end_matches('/'),
        instrument.to_uppercase(),
        hour.year(),
        hour.month0(),
        hour.day(),
        hour.hour()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tick_url_january() {
        let hour = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let url = tick_url(BASE_URL, "eurusd", hour);
        assert_eq!(
            url,
            "https://datafeed.dukascopy.com/datafeed/EURUSD/2024/00/15/12h_ticks.bi5"
        );
    }

    #[test]
    fn test_tick_url_december() {
        let hour = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let url = tick_url(BASE_URL, "xauusd", hour);
        assert_eq!(
            url,
            "https://datafeed.dukascopy.com/datafeed/XAUUSD/2024/11/31/23h_ticks.bi5"
        );
    }

    #[test]
    fn test_tick_url_custom_base() {
        let hour = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let url = tick_url("http://127.0.0.1:8080/feed/", "XAUUSD", hour);
        assert_eq!(url, "http://127.0.0.1:8080/feed/XAUUSD/2024/05/01/00h_ticks.bi5");
    }
}
