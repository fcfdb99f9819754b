//! Retry policy with exponential backoff.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

use crate::{DownloadError, HourSource};

/// Exponential backoff policy for transient fetch failures.
///
/// The delay before retry `n` (1-based) is `base_delay * multiplier^(n-1)`,
/// capped at `max_delay`. With the defaults this waits 0.5s, 1s, 2s.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor applied for each further retry.
    pub multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Default policy with a different retry limit.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::with_max_retries(0)
    }

    /// Returns the delay to wait before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(63) as i32;
        let seconds = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = seconds.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }
}

/// Abstraction over waiting, so backoff can be exercised without real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `delay`.
    async fn sleep(&self, delay: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Fetches `url` from `source`, retrying retryable failures per `policy`.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or immediately for a
/// non-retryable error.
pub async fn fetch_with_retry<S, Z>(
    source: &S,
    url: &str,
    policy: &RetryPolicy,
    sleeper: &Z,
) -> Result<Option<Bytes>, DownloadError>
where
    S: HourSource + ?Sized,
    Z: Sleeper + ?Sized,
{
    let mut retries = 0;

    loop {
        match source.get(url).await {
            Ok(payload) => return Ok(payload),
            Err(e) if e.is_retryable() && retries < policy.max_retries => {
                retries += 1;
                let delay = policy.delay_for_attempt(retries);
                debug!(url, retry = retries, delay_ms = delay.as_millis() as u64, error = %e, "retrying hour fetch");
                sleeper.sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
