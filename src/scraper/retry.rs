//! Retry decisions with exponential backoff
//!
//! After each failed attempt the worker asks the policy what to do next.
//! Success never reaches the policy; the worker short-circuits to a terminal
//! result first.

use crate::scraper::fetcher::AttemptOutcome;
use std::time::Duration;

/// What the worker should do after a completed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryAction {
    /// Sleep for the given delay, then attempt again
    Retry { delay: Duration },

    /// Stop; the target is exhausted and becomes a failure record
    GiveUp,
}

/// Exponential backoff retry policy
///
/// Delay for the retry after attempt `n` (1-based) is
/// `base_delay * 2^(n-1)`, capped at `max_delay`. All failure kinds are
/// retried identically; 4xx responses are not exempted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the initial attempt and is
    /// clamped to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Maximum attempts per target, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides the next action after attempt `attempt_number` (1-based)
    /// finished with `outcome`.
    pub fn next_action(&self, attempt_number: u32, outcome: &AttemptOutcome) -> RetryAction {
        debug_assert!(
            matches!(outcome, AttemptOutcome::Failure { .. }),
            "next_action is only consulted for failed attempts"
        );

        if attempt_number >= self.max_attempts {
            tracing::debug!(attempt_number, max = self.max_attempts, "attempts exhausted");
            return RetryAction::GiveUp;
        }

        let delay = self.backoff_delay(attempt_number);
        tracing::debug!(
            attempt_number,
            delay_ms = delay.as_millis() as u64,
            "will retry"
        );

        RetryAction::Retry { delay }
    }

    /// Backoff delay after attempt `attempt_number`: base * 2^(n-1), capped
    fn backoff_delay(&self, attempt_number: u32) -> Duration {
        let exponent = attempt_number.saturating_sub(1).min(32);
        let factor = 2u64.saturating_pow(exponent);
        let delay_ms = self
            .base_delay
            .as_millis()
            .saturating_mul(u128::from(factor));

        Duration::from_millis(delay_ms.min(self.max_delay.as_millis()) as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}
