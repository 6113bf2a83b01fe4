//! JSON rendering of scraped articles.
//!
//! Each outlet gets its own file, named after the outlet:
//! ```text
//! json_output_dir/
//! ├── ign.json
//! └── pc-gamer.json
//! ```

use crate::error::Result;
use crate::models::Article;
use crate::utils::slugify;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Pretty-printed JSON array of `articles`.
pub fn articles_to_json(articles: &[Article]) -> Result<String> {
    Ok(serde_json::to_string_pretty(articles)?)
}

/// Write `articles` to `{json_output_dir}/{slug(outlet_name)}.json`.
///
/// Creates the directory if needed and returns the path written.
#[instrument(level = "info", skip(articles, json_output_dir), fields(json_output_dir = %json_output_dir.as_ref().display()))]
pub async fn write_articles(
    articles: &[Article],
    outlet_name: &str,
    json_output_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let json = articles_to_json(articles)?;

    let dir = json_output_dir.as_ref();
    fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}.json", slugify(outlet_name)));
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = articles.len(), "Wrote articles JSON");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(title: &str) -> Article {
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        Article {
            title: title.to_string(),
            url: format!("http://example.com/{title}"),
            source_name: "PC Gamer".to_string(),
            snippet: "snippet".to_string(),
            publication_date: published,
            last_updated: published,
            is_important: false,
        }
    }

    #[test]
    fn test_articles_to_json_is_array() {
        let json = articles_to_json(&[article("a"), article("b")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["title"], "b");
        assert_eq!(array[0]["sourceName"], "PC Gamer");

        assert_eq!(articles_to_json(&[]).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_write_articles_uses_outlet_slug() {
        let dir = std::env::temp_dir().join(format!("outlet_feeds_json_{}", std::process::id()));

        let path = write_articles(&[article("a")], "PC Gamer", &dir).await.unwrap();
        assert_eq!(path, dir.join("pc-gamer.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Article> = serde_json::from_str(&written).unwrap();
        assert_eq!(back, vec![article("a")]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
