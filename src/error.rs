//! Error types for feed scraping.
//!
//! Every failure the pipeline can produce is a variant of [`ScrapeError`].
//! The variants map one-to-one onto the stage that failed, so callers can
//! decide per kind whether to retry, skip, or abort:
//!
//! | Variant | Stage |
//! |---------|-------|
//! | [`ScrapeError::Lookup`] | Outlet name not present in the registry |
//! | [`ScrapeError::Transport`], [`ScrapeError::Timeout`], [`ScrapeError::Status`] | Feed download |
//! | [`ScrapeError::Parse`] | Feed markup is not well-formed |
//! | [`ScrapeError::DateParse`] | A present `pubDate` has an unknown format |
//! | [`ScrapeError::Config`], [`ScrapeError::Yaml`] | Outlet registry loading |
//! | [`ScrapeError::Io`], [`ScrapeError::Json`] | Output writing |

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no outlet named {0:?} is configured")]
    Lookup(String),

    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("feed markup could not be parsed: {0}")]
    Parse(String),

    #[error("unparseable publication date {value:?}: {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid outlet configuration: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Whether the failure is confined to a single feed item.
    pub fn is_item_level(&self) -> bool {
        matches!(self, ScrapeError::DateParse { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message_names_outlet() {
        let e = ScrapeError::Lookup("Kotaku".to_string());
        assert_eq!(e.to_string(), "no outlet named \"Kotaku\" is configured");
    }

    #[test]
    fn test_only_date_errors_are_item_level() {
        let source = chrono::DateTime::parse_from_rfc2822("nope").unwrap_err();
        let date = ScrapeError::DateParse {
            value: "nope".to_string(),
            source,
        };
        assert!(date.is_item_level());
        assert!(!ScrapeError::Parse("bad".to_string()).is_item_level());
        assert!(!ScrapeError::Timeout { url: "http://x".to_string() }.is_item_level());
    }
}
