//! JSON result, failure, and summary files

use crate::output::OutputResult;
use crate::report::Report;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary written to data/report.json
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    total_urls: usize,
    successful: usize,
    failed: usize,
    duration_seconds: i64,
    started_at: &'a chrono::DateTime<chrono::Utc>,
    finished_at: &'a chrono::DateTime<chrono::Utc>,
}

/// Writes data/results.json: a pretty-printed array of successful results
/// (raw HTML excluded; it lives in the html/ dumps)
pub fn write_results_json(report: &Report, output_dir: &Path) -> OutputResult<()> {
    write_pretty_json(&report.results, &output_dir.join("data/results.json"))
}

/// Writes data/failed_urls.json, only when there are failures
pub fn write_failed_urls_json(report: &Report, output_dir: &Path) -> OutputResult<()> {
    if report.failures.is_empty() {
        return Ok(());
    }

    write_pretty_json(&report.failures, &output_dir.join("data/failed_urls.json"))
}

/// Writes data/report.json: run-level summary counters and timing
pub fn write_summary_json(report: &Report, output_dir: &Path) -> OutputResult<()> {
    let summary = RunSummary {
        total_urls: report.total,
        successful: report.succeeded,
        failed: report.failed,
        duration_seconds: report.duration_seconds(),
        started_at: &report.started_at,
        finished_at: &report.finished_at,
    };

    write_pretty_json(&summary, &output_dir.join("data/report.json"))
}

fn write_pretty_json<T: Serialize>(value: &T, path: &Path) -> OutputResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
