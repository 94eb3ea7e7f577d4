use std::time::Duration;

/// Bounded retry schedule with exponential backoff.
///
/// The wait before attempt `k + 1` is `multiplier * 2^(k - 1)` clamped into
/// `[min_backoff, max_backoff]`. Every failure kind (transport error or
/// non-success status) consumes one attempt.
///
/// ```
/// use scout_http::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.delay_after(1), Duration::from_secs(4));
/// assert_eq!(policy.delay_after(2), Duration::from_secs(4));
/// assert_eq!(policy.delay_after(5), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; zero behaves like one.
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no sleeping.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            multiplier: Duration::ZERO,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sleep to apply after the 1-based `attempt` failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.multiplier
            .saturating_mul(exp)
            .max(self.min_backoff)
            .min(self.max_backoff)
    }

    /// Sum of all sleeps when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (1..self.attempts())
            .map(|attempt| self.delay_after(attempt))
            .sum()
    }
}
