//! Global rate limiting across the worker pool
//!
//! The limiter serializes request starts through a single shared timestamp:
//! no two requests begin closer together than the configured minimum
//! interval, regardless of how many workers are running.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between successive request starts pool-wide
///
/// Designed to be wrapped in `Arc` and shared by all workers. The shared
/// last-request timestamp lives behind a `tokio::sync::Mutex`; the guard is
/// held across the sleep, which is what serializes concurrent callers at
/// `min_interval` spacing. `wait()` cannot fail, only delay.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,

    /// Time of the last permitted request. `None` until the first call,
    /// which proceeds immediately.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a rate limiter with the given minimum interval between
    /// request starts. A zero interval disables limiting.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Creates a disabled limiter that applies no delays
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns whether this limiter applies any delay at all
    pub fn is_disabled(&self) -> bool {
        self.min_interval.is_zero()
    }

    /// The configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks until at least `min_interval` has elapsed since the last
    /// permitted request across the whole pool, then claims the slot.
    pub async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                tracing::trace!(delay_ms = delay.as_millis() as u64, "rate limit delay");
                tokio::time::sleep(delay).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}
