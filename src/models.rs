//! Data models for outlets and the articles normalized from their feeds.
//!
//! - [`Article`]: one normalized feed item, ready for serialization
//! - [`OutletConfig`]: a configured news outlet and its feed URL
//!
//! [`Article`] uses camelCase field names on the wire so that consumers of the
//! JSON output see `sourceName`, `publicationDate` and so on.

use crate::body::BodyRuleKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the length of [`Article::snippet`], in characters.
pub const MAX_SNIPPET_CHARS: usize = 255;

/// A feed item normalized into an article record.
///
/// Built once per parsed item and handed straight to the caller. The
/// normalizer always sets `last_updated` equal to `publication_date` and
/// `is_important` to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Text of the item's `<title>`.
    pub title: String,
    /// Text of the item's `<link>`.
    pub url: String,
    /// Name of the outlet the item was scraped from.
    pub source_name: String,
    /// Preview text, at most [`MAX_SNIPPET_CHARS`] characters.
    pub snippet: String,
    /// Parsed `<pubDate>`, or the scrape time when the feed omits it.
    pub publication_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub is_important: bool,
}

/// A news outlet as listed in the outlet registry.
///
/// ```yaml
/// - name: PC Gamer
///   rss_feed_url: https://www.pcgamer.com/rss/
///   body_rule: title_sibling_paragraphs
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutletConfig {
    /// Display name; lookups match it exactly.
    pub name: String,
    /// URL of the outlet's RSS feed.
    pub rss_feed_url: String,
    /// Overrides the built-in body extraction rule for this outlet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_rule: Option<BodyRuleKind>,
}
