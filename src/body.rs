//! Outlet-specific rules for pulling article body text out of a feed item.
//!
//! Feeds embed their article bodies differently. Some put escaped HTML into
//! `<description>`, some put plain text there, and some carry the HTML in
//! whatever element follows `<title>`. Each convention is a
//! [`BodyExtractor`]; [`BodyRules`] maps outlet names to the extractor that
//! understands their feed.
//!
//! | Rule | Outlets | Body source |
//! |------|---------|-------------|
//! | [`DescriptionText`] | IGN | `<description>` text as-is |
//! | [`TitleSiblingParagraphs`] | PC Gamer | `<p>` text inside the element after `<title>` |
//! | [`DescriptionParagraphs`] | everyone else | `<p>` text inside `<description>` |

use crate::config::OutletRegistry;
use crate::feed::FeedItem;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("static selector is valid"));

/// Pulls the body text for one feed item.
pub trait BodyExtractor: Send + Sync + fmt::Debug {
    fn extract_body(&self, item: &FeedItem) -> String;
}

/// Uses the `<description>` text verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionText;

impl BodyExtractor for DescriptionText {
    fn extract_body(&self, item: &FeedItem) -> String {
        item.text("description").to_string()
    }
}

/// Re-parses the element following `<title>` as HTML and keeps its paragraphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleSiblingParagraphs;

impl BodyExtractor for TitleSiblingParagraphs {
    fn extract_body(&self, item: &FeedItem) -> String {
        match item.next_sibling_text("title") {
            Some(html) => paragraph_text(html),
            None => {
                debug!(title = %item.text("title"), "No element after <title>; empty body");
                String::new()
            }
        }
    }
}

/// Re-parses `<description>` as HTML and keeps its paragraphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionParagraphs;

impl BodyExtractor for DescriptionParagraphs {
    fn extract_body(&self, item: &FeedItem) -> String {
        paragraph_text(item.text("description"))
    }
}

/// Concatenated text of every `<p>` in an HTML fragment, without separators.
pub fn paragraph_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&PARAGRAPH)
        .flat_map(|p| p.text())
        .collect()
}

/// Names a [`BodyExtractor`] in outlet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRuleKind {
    DescriptionText,
    TitleSiblingParagraphs,
    DescriptionParagraphs,
}

impl BodyRuleKind {
    pub fn extractor(self) -> Arc<dyn BodyExtractor> {
        match self {
            BodyRuleKind::DescriptionText => Arc::new(DescriptionText),
            BodyRuleKind::TitleSiblingParagraphs => Arc::new(TitleSiblingParagraphs),
            BodyRuleKind::DescriptionParagraphs => Arc::new(DescriptionParagraphs),
        }
    }
}

/// Outlet name to body extractor, with a fallback for unlisted outlets.
///
/// Names match exactly and case-sensitively.
#[derive(Debug, Clone)]
pub struct BodyRules {
    by_outlet: HashMap<String, Arc<dyn BodyExtractor>>,
    fallback: Arc<dyn BodyExtractor>,
}

impl BodyRules {
    /// Rules with no outlet entries; every outlet gets `fallback`.
    pub fn new(fallback: Arc<dyn BodyExtractor>) -> Self {
        Self {
            by_outlet: HashMap::new(),
            fallback,
        }
    }

    /// The rules for outlets whose feeds are known to differ from the default.
    pub fn builtin() -> Self {
        Self::new(Arc::new(DescriptionParagraphs))
            .with_rule("IGN", Arc::new(DescriptionText))
            .with_rule("PC Gamer", Arc::new(TitleSiblingParagraphs))
    }

    pub fn with_rule(mut self, outlet: impl Into<String>, rule: Arc<dyn BodyExtractor>) -> Self {
        self.by_outlet.insert(outlet.into(), rule);
        self
    }

    /// Layer the `body_rule` overrides from `registry` on top of these rules.
    pub fn with_registry(mut self, registry: &OutletRegistry) -> Self {
        for outlet in registry.outlets() {
            if let Some(kind) = outlet.body_rule {
                self.by_outlet.insert(outlet.name.clone(), kind.extractor());
            }
        }
        self
    }

    pub fn for_outlet(&self, outlet: &str) -> &dyn BodyExtractor {
        self.by_outlet
            .get(outlet)
            .map(|rule| &**rule)
            .unwrap_or(&*self.fallback)
    }
}

impl Default for BodyRules {
    fn default() -> Self {
        Self::builtin()
    }
}
