//! HTTP fetcher
//!
//! Performs exactly one GET per call with a per-attempt User-Agent header
//! and classifies failures into the retryable error taxonomy. Retrying is
//! the worker's responsibility; this module never retries internally.

use crate::report::ErrorKind;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Result of one fetch attempt
///
/// Transient: consumed by the retry policy (failures) or turned into a
/// [`crate::report::PageResult`] (successes).
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A 2xx response with a readable body
    Success {
        status_code: u16,
        body: String,
        headers: BTreeMap<String, String>,
        elapsed: Duration,
    },

    /// Anything else: transport error, timeout, non-2xx status, or an
    /// unreadable body
    Failure { kind: ErrorKind, message: String },
}

/// Builds the shared HTTP client
///
/// One client is built per run and reused by all workers. Static browser
/// headers are set on the client; the per-attempt User-Agent is set on each
/// request instead.
///
/// # Arguments
///
/// * `timeout` - Overall per-request timeout (connect + transfer)
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one HTTP GET and classifies the outcome
///
/// Classification:
/// - connection refused / DNS failure / other transport error → `Network`
/// - attempt exceeded the client timeout → `Timeout`
/// - response received with a non-2xx status → `Http { status }`
/// - response body could not be read → `Read`
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `user_agent` - User-Agent header for this attempt
pub async fn fetch(client: &Client, url: &str, user_agent: &str) -> AttemptOutcome {
    let started = Instant::now();

    let response = match client.get(url).header(USER_AGENT, user_agent).send().await {
        Ok(response) => response,
        Err(e) => {
            return if e.is_timeout() {
                AttemptOutcome::Failure {
                    kind: ErrorKind::Timeout,
                    message: format!("request timed out: {}", e),
                }
            } else {
                AttemptOutcome::Failure {
                    kind: ErrorKind::Network,
                    message: e.to_string(),
                }
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return AttemptOutcome::Failure {
            kind: ErrorKind::Http {
                status: status.as_u16(),
            },
            message: format!("HTTP {}", status.as_u16()),
        };
    }

    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    match response.text().await {
        Ok(body) => AttemptOutcome::Success {
            status_code: status.as_u16(),
            body,
            headers,
            elapsed: started.elapsed(),
        },
        Err(e) => {
            if e.is_timeout() {
                AttemptOutcome::Failure {
                    kind: ErrorKind::Timeout,
                    message: format!("body read timed out: {}", e),
                }
            } else {
                AttemptOutcome::Failure {
                    kind: ErrorKind::Read,
                    message: format!("failed to read body: {}", e),
                }
            }
        }
    }
}
