//! Rotating User-Agent supplier
//!
//! One User-Agent string is drawn per fetch attempt so repeated attempts
//! against the same host do not present an identical client signature.

use rand::seq::SliceRandom;

/// Built-in pool of realistic desktop browser User-Agent strings
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

/// Stateless supplier of rotating User-Agent strings
///
/// `next()` is called once per fetch attempt.
#[derive(Debug, Clone, Default)]
pub struct UserAgentPool;

impl UserAgentPool {
    pub fn new() -> Self {
        Self
    }

    /// Returns a User-Agent string for the next attempt
    pub fn next(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }
}
