//! Scrape run orchestration
//!
//! Owns the worker pool: seeds the work queue with every target, spawns a
//! bounded number of workers, and joins them before finalizing the report.
//! Each target is owned by exactly one worker for its whole lifetime; the
//! only state shared between workers is the rate limiter's timestamp and
//! the aggregator.

use crate::config::{validate_target_urls, Config};
use crate::report::{Aggregator, Report};
use crate::scraper::fetcher::build_http_client;
use crate::scraper::rate_limit::RateLimiter;
use crate::scraper::retry::RetryPolicy;
use crate::scraper::worker::{process_target, TargetOutcome};
use crate::user_agent::UserAgentPool;
use crate::{ConfigError, HaulError};
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Batch scraper: the worker pool plus everything the workers share
pub struct Scraper {
    config: Config,
    client: Client,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    user_agents: UserAgentPool,
}

impl Scraper {
    /// Creates a scraper from a validated configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to run
    /// * `Err(HaulError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, HaulError> {
        let client = build_http_client(config.scraper.request_timeout())?;
        let rate_limiter = Arc::new(RateLimiter::new(config.scraper.min_request_interval()));
        let policy = RetryPolicy::new(
            config.scraper.max_attempts,
            config.scraper.base_delay(),
            config.scraper.max_delay(),
        );

        Ok(Self {
            config,
            client,
            rate_limiter,
            policy,
            user_agents: UserAgentPool::new(),
        })
    }

    /// Runs the full batch and returns the finalized report
    ///
    /// Blocks until every target has reached a terminal outcome. Partial
    /// failure is normal: failed targets appear in the report as failure
    /// records, and only configuration problems abort the run.
    ///
    /// # Arguments
    ///
    /// * `targets` - The full list of URLs to fetch
    pub async fn run(&self, targets: Vec<String>) -> Result<Report, HaulError> {
        // Fail fast before any worker spawns
        if targets.is_empty() {
            return Err(ConfigError::NoTargets.into());
        }
        if self.config.scraper.concurrency == 0 {
            // A zero-worker run would return an empty report for a
            // non-empty target list
            return Err(ConfigError::Validation(
                "concurrency must be >= 1".to_string(),
            )
            .into());
        }
        validate_target_urls(&targets)?;

        let targets = if self.config.scraper.dedup_targets {
            dedup_preserving_order(targets)
        } else {
            targets
        };

        let total = targets.len();
        let worker_count = (self.config.scraper.concurrency as usize).min(total);

        tracing::info!(
            targets = total,
            workers = worker_count,
            max_attempts = self.config.scraper.max_attempts,
            "starting scrape run"
        );

        let queue = Arc::new(Mutex::new(targets.into_iter().collect::<VecDeque<_>>()));
        let aggregator = Arc::new(Aggregator::new(total));

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let aggregator = Arc::clone(&aggregator);
            let client = self.client.clone();
            let rate_limiter = Arc::clone(&self.rate_limiter);
            let policy = self.policy.clone();
            let user_agents = self.user_agents.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    // Pop one target; the lock is released before any await
                    let url = {
                        let mut queue = queue.lock().expect("work queue lock poisoned");
                        queue.pop_front()
                    };

                    let Some(url) = url else {
                        tracing::debug!(worker_id, "queue drained, worker exiting");
                        break;
                    };

                    let outcome =
                        process_target(&client, &url, &rate_limiter, &policy, &user_agents).await;

                    match outcome {
                        TargetOutcome::Success(result) => aggregator.record_result(*result),
                        TargetOutcome::Failure(record) => aggregator.record_failure(record),
                    }
                }
            }));
        }

        // Blocking barrier: the run completes only when every target is terminal
        for handle in handles {
            handle.await?;
        }

        let aggregator = Arc::try_unwrap(aggregator)
            .unwrap_or_else(|_| unreachable!("all workers joined before finalize"));
        let report = aggregator.finalize();

        tracing::info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            duration_secs = report.duration_seconds(),
            "scrape run complete"
        );

        Ok(report)
    }
}

/// Collapses duplicate URLs, keeping the first occurrence's position
fn dedup_preserving_order(targets: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    targets
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
