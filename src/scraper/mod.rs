//! Core fetch pipeline
//!
//! This module contains the concurrent fetch-retry-rate-limit machinery:
//! - Global rate limiting across the worker pool
//! - Per-target retry with exponential backoff
//! - Single-attempt HTTP fetching with error classification
//! - HTML content extraction
//! - The worker pool and run orchestration

mod coordinator;
mod extractor;
mod fetcher;
mod rate_limit;
mod retry;
mod worker;

pub use coordinator::Scraper;
pub use extractor::{extract, ExtractedPage};
pub use fetcher::{build_http_client, fetch, AttemptOutcome};
pub use rate_limit::RateLimiter;
pub use retry::{RetryAction, RetryPolicy};
pub use worker::{process_target, TargetOutcome};

use crate::config::Config;
use crate::report::Report;
use crate::HaulError;

/// Runs a complete scrape over the given targets
///
/// Convenience entry point: builds a [`Scraper`] from the configuration and
/// runs it to completion.
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `targets` - The URLs to fetch
///
/// # Returns
///
/// * `Ok(Report)` - Every target reached a terminal outcome
/// * `Err(HaulError)` - Configuration or client setup failed
pub async fn scrape(config: Config, targets: Vec<String>) -> Result<Report, HaulError> {
    let scraper = Scraper::new(config)?;
    scraper.run(targets).await
}
