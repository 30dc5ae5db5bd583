//! Duplicate-key collapsing for env file content.

use std::path::Path;

use tracing::{info, warn};

use super::error::{EnvFileError, EnvFileResult};
use super::{parse_line, EnvLine};

/// One collapsed duplicate, reported for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub key: String,
    pub old_value: String,
    pub new_value: String,
}

/// Collapse duplicate keys in env file content.
///
/// Key order in the output is first-seen order; the surviving value per key
/// is the last-seen one. Non-empty comment lines are kept first, in their
/// original order, separated from the pairs by a single blank line.
/// Malformed lines are silently dropped. The output ends with exactly one
/// trailing newline.
pub fn dedup(content: &str) -> (String, Vec<Override>) {
    let mut comments: Vec<String> = Vec::new();
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut overrides: Vec<Override> = Vec::new();

    for raw in content.lines() {
        match parse_line(raw) {
            Some(EnvLine::Comment(line)) => comments.push(line),
            Some(EnvLine::Blank) | None => {}
            Some(EnvLine::Pair { key, value }) => {
                if let Some((_, existing)) = pairs.iter_mut().find(|(k, _)| *k == key) {
                    overrides.push(Override {
                        key,
                        old_value: existing.clone(),
                        new_value: value.clone(),
                    });
                    *existing = value;
                } else {
                    pairs.push((key, value));
                }
            }
        }
    }

    let mut lines = comments;
    if !lines.is_empty() {
        lines.push(String::new());
    }
    for (key, value) in &pairs {
        lines.push(format!("{key}={value}"));
    }

    (lines.join("\n") + "\n", overrides)
}

/// Deduplicate an env file in place.
///
/// The target must exist: the standalone operation has nothing to fall back
/// to, so a missing file is fatal, as is any other IO failure.
pub async fn dedup_file(path: &Path) -> EnvFileResult<(String, Vec<Override>)> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(EnvFileError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let (clean, overrides) = dedup(&content);
    for o in &overrides {
        warn!(
            key = %o.key,
            old = %o.old_value,
            new = %o.new_value,
            "duplicate env key, keeping last value"
        );
    }

    tokio::fs::write(path, &clean).await?;
    info!(path = %path.display(), overrides = overrides.len(), "env file deduplicated");
    Ok((clean, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_last_value_first_position() {
        let (clean, overrides) = dedup("A=1\nB=2\nA=3\n");
        assert_eq!(clean, "A=3\nB=2\n");
        assert_eq!(
            overrides,
            vec![Override {
                key: "A".to_string(),
                old_value: "1".to_string(),
                new_value: "3".to_string(),
            }]
        );
    }

    #[test]
    fn test_dedup_idempotent() {
        let input = "# header\n\nA=1\nB=2\nA=3\njunk line\n";
        let (once, _) = dedup(input);
        let (twice, overrides) = dedup(&once);
        assert_eq!(once, twice);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_dedup_comments_kept_in_order_before_pairs() {
        let (clean, _) = dedup("A=1\n# first\nB=2\n# second\n");
        assert_eq!(clean, "# first\n# second\n\nA=1\nB=2\n");
    }

    #[test]
    fn test_dedup_drops_blank_and_malformed_lines() {
        let (clean, _) = dedup("\n\nA=1\nno equals\n=orphan\n\n");
        assert_eq!(clean, "A=1\n");
    }

    #[test]
    fn test_dedup_value_may_contain_equals() {
        let (clean, _) = dedup("URL=postgres://u:p@h/db?sslmode=require\n");
        assert_eq!(clean, "URL=postgres://u:p@h/db?sslmode=require\n");
    }

    #[test]
    fn test_dedup_no_trailing_newline_input() {
        let (clean, _) = dedup("A=1\nA=2");
        assert_eq!(clean, "A=2\n");
    }

    #[tokio::test]
    async fn test_dedup_file_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.local");
        let err = dedup_file(&path).await.unwrap_err();
        assert!(matches!(err, EnvFileError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dedup_file_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.local");
        tokio::fs::write(&path, "A=1\nB=2\nA=3\n").await.unwrap();

        let (clean, overrides) = dedup_file(&path).await.unwrap();
        assert_eq!(clean, "A=3\nB=2\n");
        assert_eq!(overrides.len(), 1);

        let on_disk = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(on_disk, clean);
    }
}
