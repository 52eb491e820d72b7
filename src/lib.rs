//! Pagehaul: a batch web page fetcher
//!
//! This crate fetches a fixed list of URLs concurrently with bounded
//! parallelism, a global rate limit, and per-URL retry with exponential
//! backoff. Successful responses are parsed into structured content and all
//! per-URL outcomes are aggregated into a single report that is persisted in
//! multiple output formats.

pub mod config;
pub mod output;
pub mod report;
pub mod scraper;
pub mod user_agent;

use thiserror::Error;

/// Main error type for Pagehaul operations
#[derive(Debug, Error)]
pub enum HaulError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("No target URLs provided")]
    NoTargets,
}

/// Result type alias for Pagehaul operations
pub type Result<T> = std::result::Result<T, HaulError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use report::{ErrorKind, FailureRecord, PageResult, Report};
pub use scraper::{RateLimiter, RetryAction, RetryPolicy, Scraper};
pub use user_agent::UserAgentPool;
