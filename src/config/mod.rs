//! Configuration module for Pagehaul
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the newline-delimited URL files accepted on the CLI.
//!
//! # Example
//!
//! ```no_run
//! use pagehaul::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Fetching {} URLs", config.urls.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{load_config, load_url_file};

// Re-export validation helpers used by the scraper entry point
pub use validation::validate_target_urls;
