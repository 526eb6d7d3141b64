use configuration::RetrySettings;
use std::time::Duration;

/// Backoff schedule for retryable provider failures.
///
/// The delay doubles on every attempt: with a 10 second base the schedule is
/// 10s, 20s, 40s. Optional jitter adds up to one extra second per attempt so
/// that two portfolios fetched concurrently do not hammer the provider in
/// lockstep after a shared rate-limit response.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    jitter: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, jitter: bool) -> Self {
        Self { max_attempts, base_delay, jitter }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The delay to sleep after a failed attempt (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay * 2u32.saturating_pow(attempt);
        if self.jitter {
            backoff + Duration::from_millis(rand::random::<u64>() % 1000)
        } else {
            backoff
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_attempts,
            Duration::from_secs(settings.base_delay_secs),
            settings.jitter,
        )
    }
}
