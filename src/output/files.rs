//! Per-URL raw HTML and extracted text dumps

use crate::output::OutputResult;
use crate::report::PageResult;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use url::Url;

/// Converts a URL into a filesystem-safe filename stem
///
/// Format: `<host>_<hash>` where the hash is the first 16 hex characters of
/// the URL's SHA-256. Two distinct URLs on the same host get distinct stems.
pub fn safe_filename(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("{}_{}", host, &digest[..16])
}

/// Writes the raw HTML and extracted text dumps for one successful result
///
/// # Arguments
///
/// * `result` - The page result holding the raw body and extracted text
/// * `output_dir` - Root output directory (html/ and text/ must exist)
pub fn write_page_dumps(result: &PageResult, output_dir: &Path) -> OutputResult<()> {
    let stem = safe_filename(&result.url);

    let html_path = output_dir.join("html").join(format!("{}.html", stem));
    fs::write(&html_path, &result.raw_html)?;

    let text_path = output_dir.join("text").join(format!("{}.txt", stem));
    fs::write(&text_path, &result.text)?;

    tracing::debug!(url = %result.url, stem, "wrote page dumps");

    Ok(())
}
