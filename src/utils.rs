//! Small helpers for logging, file naming and output directories.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```
/// use outlet_feeds::utils::truncate_for_log;
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

/// Convert an outlet name into a file-name-safe slug.
///
/// ```
/// use outlet_feeds::utils::slugify;
/// assert_eq!(slugify("PC Gamer"), "pc-gamer");
/// ```
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
        assert_eq!(truncate_for_log(s, 13), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "ü".repeat(10);
        assert_eq!(truncate_for_log(&s, 3), "üüü…(+14 bytes)");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("IGN"), "ign");
        assert_eq!(slugify("PC Gamer"), "pc-gamer");
        assert_eq!(slugify(" Rock, Paper & Shotgun "), "rock-paper--shotgun");
        assert_eq!(slugify("Game-Informer!"), "game-informer");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let dir = std::env::temp_dir().join(format!("outlet_feeds_utils_{}", std::process::id()));
        let nested = dir.join("a/b");
        let nested = nested.to_str().unwrap();

        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());

        let _ = stdfs::remove_dir_all(&dir);
    }
}
