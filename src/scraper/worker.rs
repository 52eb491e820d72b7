//! Per-target fetch pipeline
//!
//! One worker owns one target for its whole lifetime and drives it through
//! the rate limiter, the fetcher, and the retry policy until it reaches a
//! terminal outcome. Attempts for a target are strictly sequential.

use crate::report::{FailureRecord, PageResult};
use crate::scraper::extractor::extract;
use crate::scraper::fetcher::{fetch, AttemptOutcome};
use crate::scraper::rate_limit::RateLimiter;
use crate::scraper::retry::{RetryAction, RetryPolicy};
use crate::user_agent::UserAgentPool;
use chrono::Utc;
use reqwest::Client;
use url::Url;

/// Either terminal outcome for a target
#[derive(Debug)]
pub enum TargetOutcome {
    Success(Box<PageResult>),
    Failure(FailureRecord),
}

/// Per-target retry bookkeeping, created when the target is dequeued and
/// dropped once it reaches a terminal outcome
struct RetryState {
    attempts_made: u32,
}

/// Runs the full pipeline for a single target URL
///
/// Pipeline per attempt: wait for the global rate limit, fetch with a
/// rotated User-Agent, then either extract and finish, or consult the retry
/// policy and back off. Failures never propagate out of here; exhausted
/// targets surface as a [`FailureRecord`].
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The target URL
/// * `rate_limiter` - Pool-wide rate limiter
/// * `policy` - Retry policy shared by all workers
/// * `user_agents` - Rotating User-Agent supplier
pub async fn process_target(
    client: &Client,
    url: &str,
    rate_limiter: &RateLimiter,
    policy: &RetryPolicy,
    user_agents: &UserAgentPool,
) -> TargetOutcome {
    let mut state = RetryState { attempts_made: 0 };

    loop {
        rate_limiter.wait().await;

        let user_agent = user_agents.next();
        state.attempts_made += 1;
        tracing::info!(url, attempt = state.attempts_made, "fetching");

        let outcome = fetch(client, url, user_agent).await;

        match outcome {
            AttemptOutcome::Success {
                status_code,
                body,
                headers,
                elapsed,
            } => {
                tracing::info!(
                    url,
                    status_code,
                    elapsed_ms = elapsed.as_millis() as u64,
                    attempts = state.attempts_made,
                    "fetched"
                );

                return TargetOutcome::Success(Box::new(build_result(
                    url,
                    status_code,
                    body,
                    headers,
                    state.attempts_made,
                )));
            }

            AttemptOutcome::Failure { kind, message } => {
                tracing::warn!(
                    url,
                    attempt = state.attempts_made,
                    error_kind = %kind,
                    %message,
                    "attempt failed"
                );

                let failed = AttemptOutcome::Failure {
                    kind,
                    message: message.clone(),
                };

                match policy.next_action(state.attempts_made, &failed) {
                    RetryAction::Retry { delay } => {
                        tracing::debug!(url, delay_ms = delay.as_millis() as u64, "backing off");
                        tokio::time::sleep(delay).await;
                    }
                    RetryAction::GiveUp => {
                        tracing::error!(url, attempts = state.attempts_made, "giving up");

                        return TargetOutcome::Failure(FailureRecord {
                            url: url.to_string(),
                            kind,
                            last_message: message,
                            total_attempts: state.attempts_made,
                            fetched_at: Utc::now(),
                        });
                    }
                }
            }
        }
    }
}

/// Builds the terminal success record from a successful attempt
fn build_result(
    url: &str,
    status_code: u16,
    body: String,
    headers: std::collections::BTreeMap<String, String>,
    total_attempts: u32,
) -> PageResult {
    // The target URL was validated at startup, but guard anyway: extraction
    // without a base URL still yields the non-link fields.
    let extracted = match Url::parse(url) {
        Ok(base) => extract(&body, &base),
        Err(_) => Default::default(),
    };

    PageResult {
        url: url.to_string(),
        status_code,
        title: extracted.title,
        meta_tags: extracted.meta_tags,
        links: extracted.links,
        text: extracted.text,
        headers,
        fetched_at: Utc::now(),
        total_attempts,
        raw_html: body,
    }
}
