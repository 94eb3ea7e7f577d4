//! Solution file export: a commented problem header followed by the solution.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scout_common::ProblemRecord;

const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const PLACEHOLDER_NAME: &str = "untitled_problem";
const EXTENSION: &str = "py";

/// Filesystem-safe file name derived from a problem title: reserved
/// characters stripped, whitespace runs joined with `_`.
pub fn sanitize_filename(title: Option<&str>) -> String {
    let stripped: String = title
        .unwrap_or_default()
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();
    let joined = stripped.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = joined.trim_matches('_');
    let stem = if stem.is_empty() { PLACEHOLDER_NAME } else { stem };
    format!("{stem}.{EXTENSION}")
}

/// Docstring header naming the problem, then the trimmed solution.
pub fn file_body(record: &ProblemRecord, solution: &str) -> String {
    let mut out = String::from("\"\"\"\n");
    out.push_str(&format!(
        "Problem: {}\n",
        record.title.as_deref().unwrap_or("Unknown Problem")
    ));
    out.push_str(&format!("Source: {}\n\n", record.url));
    if let Some(statement) = record.display_statement().filter(|s| !s.trim().is_empty()) {
        out.push_str("Problem Statement:\n");
        for line in statement.lines() {
            out.push_str(line.trim());
            out.push('\n');
        }
    }
    out.push_str("\"\"\"\n\n");
    out.push_str(solution.trim());
    out.push('\n');
    out
}

/// Write the export into `out_dir`, creating it if needed.
pub async fn write_export(
    out_dir: &Path,
    record: &ProblemRecord,
    solution: &str,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(sanitize_filename(record.title.as_deref()));
    tokio::fs::write(&path, file_body(record, solution))
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "export.written");
    Ok(path)
}
