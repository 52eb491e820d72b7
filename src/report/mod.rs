//! Per-URL outcome records and the aggregated run report
//!
//! Every target submitted to the scraper ends in exactly one terminal
//! outcome: a [`PageResult`] or a [`FailureRecord`]. Workers append outcomes
//! to a shared [`Aggregator`]; once all workers have finished, the aggregator
//! is finalized into an immutable [`Report`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Classification of a failed fetch attempt
///
/// All four kinds are retryable under the same backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection refused, DNS failure, or other transport error
    Network,

    /// The attempt exceeded the configured request timeout
    Timeout,

    /// A response was received with a non-2xx status
    Http { status: u16 },

    /// The response body could not be read
    Read,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Http { status } => write!(f, "http {}", status),
            ErrorKind::Read => write!(f, "read"),
        }
    }
}

/// Final success record for one target
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// The target URL
    pub url: String,

    /// HTTP status code of the successful response
    pub status_code: u16,

    /// Page title, if the document had a non-empty <title>
    pub title: Option<String>,

    /// Meta tags keyed by name (falling back to property)
    pub meta_tags: BTreeMap<String, String>,

    /// Absolute links found on the page, in document order
    pub links: Vec<String>,

    /// Whitespace-normalized text content
    pub text: String,

    /// Response headers of the successful attempt
    pub headers: BTreeMap<String, String>,

    /// When the successful attempt completed
    pub fetched_at: DateTime<Utc>,

    /// Total attempts made for this target, including the successful one
    pub total_attempts: u32,

    /// Raw response body, retained for the HTML dump only
    #[serde(skip)]
    pub raw_html: String,
}

/// Final failure record for one target whose retries were exhausted
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// The target URL
    pub url: String,

    /// Classification of the last failed attempt
    #[serde(flatten)]
    pub kind: ErrorKind,

    /// Error message from the last attempt
    pub last_message: String,

    /// Total attempts made before giving up
    pub total_attempts: u32,

    /// When the final attempt completed
    pub fetched_at: DateTime<Utc>,
}

/// Aggregate of all terminal outcomes plus summary counters
///
/// Immutable once produced by [`Aggregator::finalize`].
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub results: Vec<PageResult>,
    pub failures: Vec<FailureRecord>,

    /// Number of targets submitted
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Report {
    /// Run duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Success rate as a percentage of submitted targets
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

/// Thread-safe collector of per-target outcomes
///
/// `record_*` may be called concurrently from all workers; entry order
/// follows completion order, not submission order.
pub struct Aggregator {
    inner: Mutex<Inner>,
    started_at: DateTime<Utc>,
    total: usize,
}

struct Inner {
    results: Vec<PageResult>,
    failures: Vec<FailureRecord>,
}

impl Aggregator {
    /// Creates an aggregator for a run of `total` submitted targets
    pub fn new(total: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                results: Vec::new(),
                failures: Vec::new(),
            }),
            started_at: Utc::now(),
            total,
        }
    }

    /// Records a terminal success for one target
    pub fn record_result(&self, result: PageResult) {
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");
        inner.results.push(result);
    }

    /// Records a terminal failure for one target
    pub fn record_failure(&self, failure: FailureRecord) {
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");
        inner.failures.push(failure);
    }

    /// Number of outcomes recorded so far
    pub fn recorded(&self) -> usize {
        let inner = self.inner.lock().expect("aggregator lock poisoned");
        inner.results.len() + inner.failures.len()
    }

    /// Closes the aggregator and produces the immutable report
    ///
    /// Called once, after every worker has finished.
    pub fn finalize(self) -> Report {
        let inner = self.inner.into_inner().expect("aggregator lock poisoned");
        let succeeded = inner.results.len();
        let failed = inner.failures.len();

        Report {
            results: inner.results,
            failures: inner.failures,
            total: self.total,
            succeeded,
            failed,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
