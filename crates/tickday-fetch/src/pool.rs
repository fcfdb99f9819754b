//! Bounded per-day fetch pool.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::retry::{RetryPolicy, Sleeper, TokioSleeper, fetch_with_retry};
use crate::url::tick_url;
use crate::HourSource;

/// One hour of one instrument: where to fetch it and, once fetched, its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot {
    /// Hour start (UTC, truncated to the hour).
    pub hour_start: DateTime<Utc>,
    /// Feed URL for this hour.
    pub url: String,
    /// Raw compressed payload; `None` until fetched, empty for no-data hours.
    pub payload: Option<Bytes>,
}

impl HourSlot {
    /// Creates an unfetched slot.
    #[must_use]
    pub const fn new(hour_start: DateTime<Utc>, url: String) -> Self {
        Self {
            hour_start,
            url,
            payload: None,
        }
    }

    /// Creates an unfetched slot with the feed URL derived from the hour.
    #[must_use]
    pub fn for_hour(base_url: &str, instrument: &str, hour_start: DateTime<Utc>) -> Self {
        Self::new(hour_start, tick_url(base_url, instrument, hour_start))
    }

    /// Returns the payload bytes, empty if absent.
    #[must_use]
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }
}

/// An hour whose fetch failed after all retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedHour {
    /// Hour start.
    pub hour_start: DateTime<Utc>,
    /// URL that failed.
    pub url: String,
    /// Final error message.
    pub error: String,
}

/// Result of fetching every hour of one day.
#[derive(Debug, Clone, Default)]
pub struct DayFetch {
    /// Slots keyed by hour start; every requested hour appears exactly once.
    pub slots: BTreeMap<DateTime<Utc>, HourSlot>,
    /// Hours that exhausted their retries (their payload is empty).
    pub failed: Vec<FailedHour>,
}

impl DayFetch {
    /// Consumes the fetch, yielding slots in ascending hour order.
    pub fn into_ordered_slots(self) -> impl Iterator<Item = HourSlot> {
        self.slots.into_values()
    }

    /// Returns the number of hours that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Fetches hours with bounded concurrency and per-hour failure isolation.
#[derive(Debug, Clone)]
pub struct FetchPool<S, Z = TokioSleeper> {
    source: S,
    policy: RetryPolicy,
    sleeper: Z,
    concurrency: usize,
}

impl<S: HourSource> FetchPool<S> {
    /// Creates a pool that sleeps on the tokio timer between retries.
    pub fn new(source: S, policy: RetryPolicy, concurrency: usize) -> Self {
        Self::with_sleeper(source, policy, concurrency, TokioSleeper)
    }
}

impl<S: HourSource, Z: Sleeper> FetchPool<S, Z> {
    /// Creates a pool with an explicit sleeper.
    pub fn with_sleeper(source: S, policy: RetryPolicy, concurrency: usize, sleeper: Z) -> Self {
        Self {
            source,
            policy,
            sleeper,
            concurrency,
        }
    }

    /// Returns the underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the concurrency ceiling (at least one).
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Fetches every slot and returns once all fetches have completed.
    ///
    /// A 404 yields an empty payload. A fetch that exhausts its retries is
    /// logged, recorded in [`DayFetch::failed`] and also given an empty
    /// payload; it never aborts its siblings. Completion order does not
    /// matter: results are keyed by hour.
    pub async fn fetch_day(&self, slots: Vec<HourSlot>) -> DayFetch {
        self.fetch_day_observed(slots, |_| {}).await
    }

    /// Like [`FetchPool::fetch_day`], calling `on_fetched` as each hour completes.
    pub async fn fetch_day_observed<F>(&self, slots: Vec<HourSlot>, mut on_fetched: F) -> DayFetch
    where
        F: FnMut(&HourSlot),
    {
        let mut day = DayFetch::default();

        let mut completions = stream::iter(slots)
            .map(|slot| async move {
                let result =
                    fetch_with_retry(&self.source, &slot.url, &self.policy, &self.sleeper).await;
                (slot, result)
            })
            .buffer_unordered(self.concurrency());

        while let Some((mut slot, result)) = completions.next().await {
            match result {
                Ok(Some(bytes)) => {
                    debug!(url = %slot.url, bytes = bytes.len(), "fetched hour");
                    slot.payload = Some(bytes);
                }
                Ok(None) => {
                    debug!(url = %slot.url, "no data for hour");
                    slot.payload = Some(Bytes::new());
                }
                Err(e) => {
                    warn!(url = %slot.url, error = %e, "hour fetch failed; recording empty hour");
                    day.failed.push(FailedHour {
                        hour_start: slot.hour_start,
                        url: slot.url.clone(),
                        error: e.to_string(),
                    });
                    slot.payload = Some(Bytes::new());
                }
            }
            on_fetched(&slot);
            day.slots.insert(slot.hour_start, slot);
        }

        day.failed.sort_by_key(|f| f.hour_start);
        day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DownloadError;
    use async_trait::async_trait;
    use chrono::{TimeDelta, TimeZone};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tickday_types::hours_between;

    #[derive(Clone, Copy)]
    enum Reply {
        Data(&'static [u8]),
        NotFound,
        Fail,
    }

    /// Per-URL replies; unknown URLs get `Data(b"x")`. Tracks peak concurrency.
    #[derive(Default)]
    struct FakeFeed {
        replies: HashMap<String, Reply>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl HourSource for FakeFeed {
        async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.replies.get(url).copied().unwrap_or(Reply::Data(b"x")) {
                Reply::Data(bytes) => Ok(Some(Bytes::from_static(bytes))),
                Reply::NotFound => Ok(None),
                Reply::Fail => Err(DownloadError::ServerError { status: 500 }),
            }
        }
    }

    #[derive(Default)]
    struct NoSleep(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, delay: Duration) {
            self.0.lock().unwrap().push(delay);
        }
    }

    fn day_slots() -> Vec<HourSlot> {
        let start = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        hours_between(start, start + TimeDelta::days(1))
            .map(|h| HourSlot::for_hour("http://feed", "XAUUSD", h))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_day_covers_every_hour() {
        let pool = FetchPool::with_sleeper(FakeFeed::default(), RetryPolicy::default(), 8, NoSleep::default());
        let day = pool.fetch_day(day_slots()).await;

        assert_eq!(day.slots.len(), 24);
        assert_eq!(day.failed_count(), 0);
        let hours: Vec<_> = day.into_ordered_slots().map(|s| s.hour_start).collect();
        assert!(hours.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_fetch_day_respects_concurrency() {
        let pool = FetchPool::with_sleeper(FakeFeed::default(), RetryPolicy::default(), 3, NoSleep::default());
        pool.fetch_day(day_slots()).await;

        assert_eq!(pool.source().calls.load(Ordering::SeqCst), 24);
        assert!(pool.source().peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_not_found_is_empty_success() {
        let slots = day_slots();
        let mut feed = FakeFeed::default();
        feed.replies.insert(slots[13].url.clone(), Reply::NotFound);

        let pool = FetchPool::with_sleeper(feed, RetryPolicy::default(), 8, NoSleep::default());
        let hour13 = slots[13].hour_start;
        let day = pool.fetch_day(slots).await;

        assert_eq!(day.failed_count(), 0);
        assert!(day.slots[&hour13].payload_bytes().is_empty());
        assert_eq!(pool.source().calls.load(Ordering::SeqCst), 24);
    }

    #[tokio::test]
    async fn test_failed_hour_is_isolated() {
        let slots = day_slots();
        let failing = slots[5].clone();
        let mut feed = FakeFeed::default();
        feed.replies.insert(failing.url.clone(), Reply::Fail);

        let sleeper = NoSleep::default();
        let pool = FetchPool::with_sleeper(feed, RetryPolicy::default(), 8, sleeper);
        let day = pool.fetch_day(slots).await;

        assert_eq!(day.slots.len(), 24);
        assert_eq!(day.failed.len(), 1);
        assert_eq!(day.failed[0].url, failing.url);
        assert_eq!(day.slots[&failing.hour_start].payload, Some(Bytes::new()));
        // 23 successes + 1 initial attempt + 3 retries
        assert_eq!(pool.source().calls.load(Ordering::SeqCst), 27);
        let non_empty = day.slots.values().filter(|s| !s.payload_bytes().is_empty()).count();
        assert_eq!(non_empty, 23);
    }

    #[tokio::test]
    async fn test_fetch_day_observed_reports_each_hour() {
        let pool = FetchPool::with_sleeper(FakeFeed::default(), RetryPolicy::default(), 4, NoSleep::default());
        let mut seen = Vec::new();
        pool.fetch_day_observed(day_slots(), |slot| seen.push(slot.hour_start)).await;

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let pool = FetchPool::new(FakeFeed::default(), RetryPolicy::no_retry(), 0);
        assert_eq!(pool.concurrency(), 1);
    }
}
