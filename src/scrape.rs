//! Scraping one outlet end to end: lookup, fetch, extract, normalize.
//!
//! Outlet-level failures (unknown outlet, download error, malformed feed)
//! are returned to the caller untouched. Item-level failures are governed by
//! [`ItemFailurePolicy`]: by default a bad item is logged and skipped so the
//! rest of the feed still comes through.

use crate::config::OutletLookup;
use crate::error::{Result, ScrapeError};
use crate::feed::extract_items;
use crate::fetch::FeedFetcher;
use crate::models::Article;
use crate::normalize::Normalizer;
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument, warn};

/// What to do when a single feed item cannot be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemFailurePolicy {
    /// Log the item and continue with the next one.
    #[default]
    Skip,
    /// Stop and return the item's error.
    Abort,
}

#[derive(Debug)]
pub struct OutletScraper<L, F> {
    lookup: L,
    fetcher: F,
    normalizer: Normalizer,
    policy: ItemFailurePolicy,
}

impl<L, F> OutletScraper<L, F>
where
    L: OutletLookup,
    F: FeedFetcher,
{
    pub fn new(lookup: L, fetcher: F) -> Self {
        Self {
            lookup,
            fetcher,
            normalizer: Normalizer::default(),
            policy: ItemFailurePolicy::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_policy(mut self, policy: ItemFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Scrape `outlet_name`'s feed into articles, in feed order.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Lookup`] if the outlet is not configured
    /// - [`ScrapeError::Transport`], [`ScrapeError::Timeout`] or
    ///   [`ScrapeError::Status`] if the feed cannot be downloaded
    /// - [`ScrapeError::Parse`] if the feed is not well-formed
    /// - the first item error, under [`ItemFailurePolicy::Abort`]
    #[instrument(level = "info", skip(self))]
    pub async fn scrape(&self, outlet_name: &str) -> Result<Vec<Article>> {
        let outlet = self
            .lookup
            .find_by_name(outlet_name)
            .ok_or_else(|| ScrapeError::Lookup(outlet_name.to_string()))?;

        let markup = self.fetcher.fetch(&outlet.rss_feed_url).await?;
        debug!(preview = %truncate_for_log(&markup, 200), "Feed markup");

        let items = extract_items(&markup)?;
        let total = items.len();

        let mut articles = Vec::with_capacity(total);
        for (index, item) in items.iter().enumerate() {
            match self.normalizer.normalize(item, &outlet.name) {
                Ok(article) => articles.push(article),
                Err(e) if self.policy == ItemFailurePolicy::Skip && e.is_item_level() => {
                    warn!(
                        index,
                        title = %item.text("title"),
                        error = %e,
                        "Skipping feed item"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            outlet = %outlet.name,
            items = total,
            articles = articles.len(),
            skipped = total - articles.len(),
            "Scraped outlet"
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyRuleKind, BodyRules};
    use crate::config::OutletRegistry;
    use crate::models::OutletConfig;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn with_page(url: &str, body: &str) -> Self {
            let mut pages = HashMap::new();
            pages.insert(url.to_string(), body.to_string());
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl FeedFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn registry() -> OutletRegistry {
        OutletRegistry::new(vec![
            OutletConfig {
                name: "Default Outlet".to_string(),
                rss_feed_url: "https://default.test/rss".to_string(),
                body_rule: None,
            },
            OutletConfig {
                name: "Plain".to_string(),
                rss_feed_url: "https://plain.test/rss".to_string(),
                body_rule: Some(BodyRuleKind::DescriptionText),
            },
        ])
        .unwrap()
    }

    fn feed(items: &[(&str, &str)]) -> String {
        let body: String = items
            .iter()
            .map(|(title, date)| {
                format!(
                    "<item><title>{title}</title><link>http://x.test/{title}</link>\
                     <pubDate>{date}</pubDate>\
                     <description>&lt;p&gt;{title} body&lt;/p&gt;</description></item>"
                )
            })
            .collect();
        format!("<?xml version=\"1.0\"?><rss><channel>{body}</channel></rss>")
    }

    const DATE: &str = "Mon, 01 Jan 2024 10:00:00 GMT";

    #[tokio::test]
    async fn test_scrape_preserves_feed_order() {
        let fetcher = StubFetcher::with_page(
            "https://default.test/rss",
            &feed(&[("A", DATE), ("B", DATE), ("C", DATE)]),
        );
        let scraper = OutletScraper::new(registry(), fetcher);

        let articles = scraper.scrape("Default Outlet").await.unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(articles.iter().all(|a| a.source_name == "Default Outlet"));
        assert_eq!(articles[1].snippet, "B body");
        assert_eq!(articles[2].url, "http://x.test/C");
    }

    #[tokio::test]
    async fn test_unknown_outlet_is_lookup_error() {
        let scraper = OutletScraper::new(registry(), StubFetcher::default());
        let err = scraper.scrape("Nope").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Lookup(name) if name == "Nope"));
        assert!(scraper.fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let scraper = OutletScraper::new(registry(), StubFetcher::default());
        let err = scraper.scrape("Plain").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
        assert_eq!(
            *scraper.fetcher.requested.borrow(),
            vec!["https://plain.test/rss".to_string()]
        );
    }

    #[tokio::test]
    async fn test_malformed_feed_is_parse_error() {
        let fetcher = StubFetcher::with_page("https://default.test/rss", "<rss><item></rss>");
        let scraper = OutletScraper::new(registry(), fetcher);
        let err = scraper.scrape("Default Outlet").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[tokio::test]
    async fn test_bad_date_item_is_skipped_by_default() {
        let fetcher = StubFetcher::with_page(
            "https://default.test/rss",
            &feed(&[("A", DATE), ("B", "not-a-date"), ("C", DATE)]),
        );
        let scraper = OutletScraper::new(registry(), fetcher);

        let articles = scraper.scrape("Default Outlet").await.unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_loose_dates_and_empty_items_are_kept() {
        let body = format!(
            "<rss><channel><item/>{}</channel></rss>",
            "<item><title>B</title><pubDate>Tue, 01 January 2024 10:00:00 GMT</pubDate></item>"
        );
        let fetcher = StubFetcher::with_page("https://default.test/rss", &body);
        let scraper = OutletScraper::new(registry(), fetcher);

        let articles = scraper.scrape("Default Outlet").await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "");
        assert_eq!(articles[1].title, "B");
        assert_eq!(
            articles[1].publication_date.to_rfc3339(),
            "2024-01-01T10:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_bad_date_item_aborts_under_abort_policy() {
        let fetcher = StubFetcher::with_page(
            "https://default.test/rss",
            &feed(&[("A", DATE), ("B", "not-a-date")]),
        );
        let scraper =
            OutletScraper::new(registry(), fetcher).with_policy(ItemFailurePolicy::Abort);

        let err = scraper.scrape("Default Outlet").await.unwrap_err();
        assert!(matches!(err, ScrapeError::DateParse { .. }));
    }

    #[tokio::test]
    async fn test_configured_body_rule_is_used() {
        let registry = registry();
        let normalizer = Normalizer::new(BodyRules::builtin().with_registry(&registry));
        let fetcher = StubFetcher::with_page("https://plain.test/rss", &feed(&[("A", DATE)]));
        let scraper = OutletScraper::new(registry, fetcher).with_normalizer(normalizer);

        let articles = scraper.scrape("Plain").await.unwrap();
        assert_eq!(articles[0].snippet, "<p>A body</p>");
    }

    #[tokio::test]
    async fn test_feed_without_items_is_empty() {
        let fetcher = StubFetcher::with_page(
            "https://default.test/rss",
            "<rss><channel><title>quiet</title></channel></rss>",
        );
        let scraper = OutletScraper::new(registry(), fetcher);
        assert!(scraper.scrape("Default Outlet").await.unwrap().is_empty());
    }
}
