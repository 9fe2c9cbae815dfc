use std::time::Duration;

/// Exponential backoff settings for the fetcher.
///
/// A budget of `max_retries` allows `max_retries - 1` attempts. Each failed
/// attempt that is followed by another one sleeps the current delay; the
/// delay is then multiplied by `backoff`, capped at [`RetryPolicy::MAX_DELAY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub backoff: f64,
    pub max_retries: u32,
}

impl RetryPolicy {
    pub const DEFAULT: Self = Self {
        delay: Duration::from_secs(1),
        backoff: 2.0,
        max_retries: 5,
    };

    /// Cap for any single backoff sleep
    pub const MAX_DELAY: Duration = Duration::from_secs(300);

    pub fn new(delay: Duration, backoff: f64, max_retries: u32) -> Self {
        Self {
            delay,
            backoff,
            max_retries,
        }
    }

    /// Number of attempts this budget allows.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_sub(1)
    }

    /// Delay after the given failed attempt (0-indexed).
    ///
    /// `delay * backoff^attempt`, capped at `MAX_DELAY`. Products too large
    /// for a `Duration` saturate to the cap instead of panicking.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let secs = self.delay.as_secs_f64() * self.backoff.powi(attempt as i32);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(Self::MAX_DELAY)
            .min(Self::MAX_DELAY)
    }

    /// Every sleep a fully failing request goes through, in order. There is
    /// no sleep after the final attempt.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.attempts().saturating_sub(1)).map(|attempt| self.delay_for_attempt(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
