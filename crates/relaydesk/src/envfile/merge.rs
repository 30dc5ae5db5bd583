//! Folding a settings batch into env file content.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::error::EnvFileResult;
use super::{parse_line, EnvLine};
use crate::settings::UpdateBatch;

/// Fold `batch` into existing env file content.
///
/// Comment, blank, and malformed lines pass through verbatim. Every pair
/// line whose key appears in the batch is replaced in place with the new
/// value, including repeated occurrences of a duplicated key: merging does
/// not deduplicate, that is [`dedup`](super::dedup)'s job. Batch keys not
/// seen during the scan are appended afterwards, in the batch's own
/// iteration order. The output ends with exactly one trailing newline.
pub fn merge(existing: &str, batch: &UpdateBatch) -> String {
    let mut processed: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for raw in existing.lines() {
        match parse_line(raw) {
            Some(EnvLine::Pair { key, .. }) => {
                if let Some(value) = batch.get(&key) {
                    lines.push(format!("{key}={value}"));
                    processed.insert(key);
                } else {
                    lines.push(raw.to_string());
                }
            }
            _ => lines.push(raw.to_string()),
        }
    }

    for (key, value) in batch.iter() {
        if !processed.contains(key) {
            lines.push(format!("{key}={value}"));
        }
    }

    lines.join("\n") + "\n"
}

/// Merge a batch into the env file at `path`.
///
/// A missing file is treated as empty input, not an error; the file is a
/// fallback cache that gets (re)created here. Write failures are surfaced
/// to the caller, which decides whether they matter.
pub async fn merge_file(path: &Path, batch: &UpdateBatch) -> EnvFileResult<String> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };

    let merged = merge(&existing, batch);
    tokio::fs::write(path, &merged).await?;
    debug!(path = %path.display(), keys = batch.len(), "fallback env file updated");
    Ok(merged)
}
