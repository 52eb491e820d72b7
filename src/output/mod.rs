//! Report persistence
//!
//! Writes a finalized report to disk in every output format: raw HTML and
//! extracted text per successful URL, JSON result/failure/summary files,
//! and a CSV result table.
//!
//! Layout under the output directory:
//!
//! ```text
//! <out>/html/<host>_<hash>.html
//! <out>/text/<host>_<hash>.txt
//! <out>/data/results.json
//! <out>/data/results.csv
//! <out>/data/failed_urls.json   (only when failures exist)
//! <out>/data/report.json
//! ```

mod csv_out;
mod files;
mod json;

pub use csv_out::write_results_csv;
pub use files::{safe_filename, write_page_dumps};
pub use json::{write_failed_urls_json, write_results_json, write_summary_json};

use crate::report::Report;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while persisting a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Creates the html/, text/ and data/ subdirectories
pub fn setup_output_directory(output_dir: &Path) -> OutputResult<()> {
    std::fs::create_dir_all(output_dir.join("html"))?;
    std::fs::create_dir_all(output_dir.join("text"))?;
    std::fs::create_dir_all(output_dir.join("data"))?;
    Ok(())
}

/// Writes the complete report to the output directory
///
/// # Arguments
///
/// * `report` - The finalized report
/// * `output_dir` - Root output directory (created if missing)
pub fn write_report(report: &Report, output_dir: &Path) -> OutputResult<()> {
    setup_output_directory(output_dir)?;

    for result in &report.results {
        write_page_dumps(result, output_dir)?;
    }

    write_results_json(report, output_dir)?;
    write_results_csv(report, output_dir)?;
    write_failed_urls_json(report, output_dir)?;
    write_summary_json(report, output_dir)?;

    tracing::info!(output_dir = %output_dir.display(), "report written");

    Ok(())
}
