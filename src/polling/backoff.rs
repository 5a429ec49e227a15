//! Exponential backoff between failed polling iterations

use std::time::{Duration, SystemTime};

/// Backoff policy for the polling loop
///
/// Controls how long to wait after consecutive failed iterations and
/// whether the loop gives up at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first failure (doubles each consecutive failure)
    pub base_delay: Duration,
    /// Maximum delay cap for computed delays
    pub max_delay: Duration,
    /// Consecutive failures tolerated before giving up; `None` retries forever
    pub max_retries: Option<u32>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

impl BackoffPolicy {
    /// Compute the delay before the next attempt.
    ///
    /// A flood-control `retry_after` from the platform is honored as given:
    /// retrying earlier only earns another 429. Otherwise the delay follows
    /// exponential backoff: `min(base_delay * 2^attempt + jitter, max_delay)`.
    ///
    /// Jitter is 0-25% of the computed delay, derived from `SystemTime` to
    /// avoid pulling in a full random number generator.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(ra) = retry_after {
            return ra;
        }

        let base = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);

        let jitter_nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();

        // Scale to 0-25% of the base delay
        let jitter_fraction = f64::from(jitter_nanos % 250) / 1000.0;
        let jitter = base.mul_f64(jitter_fraction);

        (base + jitter).min(self.max_delay)
    }

    /// Delay after `failures` consecutive failures, or `None` to give up
    #[must_use]
    pub fn next_delay(&self, failures: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if self.max_retries.is_some_and(|max| failures >= max) {
            return None;
        }
        Some(self.delay_for_attempt(failures, retry_after))
    }
}
