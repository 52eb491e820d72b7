//! CSV result table

use crate::output::OutputResult;
use crate::report::Report;
use std::path::Path;

/// Writes data/results.csv: one row per successful result
///
/// Collection-valued fields (links, meta tags) are reduced to counts;
/// the full values live in results.json.
pub fn write_results_csv(report: &Report, output_dir: &Path) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(output_dir.join("data/results.csv"))?;

    writer.write_record([
        "url",
        "status_code",
        "title",
        "links_count",
        "meta_tags_count",
        "text_length",
        "total_attempts",
        "fetched_at",
    ])?;

    for result in &report.results {
        writer.write_record([
            result.url.as_str(),
            &result.status_code.to_string(),
            result.title.as_deref().unwrap_or(""),
            &result.links.len().to_string(),
            &result.meta_tags.len().to_string(),
            &result.text.len().to_string(),
            &result.total_attempts.to_string(),
            &result.fetched_at.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
