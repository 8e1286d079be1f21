//! Retry policy — bounded exponential backoff for transient actuator failures.

use std::time::Duration;

/// Bounded exponential backoff.
///
/// Attempt `n` (1-based) is followed, on transient failure, by a delay of
/// `initial_backoff * 2^(n-1)`, capped at `max_backoff`. Once `max_attempts`
/// have been used the command is handed back to the caller, which keeps it
/// pending for the next tick — it is never silently discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum send attempts per tick, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// The backoff delay to sleep after the given 1-based failed attempt.
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let delay = self
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(exponent));
        delay.min(self.max_backoff)
    }
}
