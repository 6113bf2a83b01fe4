//! # Outlet Feeds
//!
//! Fetches news outlets' RSS feeds and turns every `<item>` into an
//! [`Article`] with a short preview snippet.
//!
//! ## Pipeline
//!
//! 1. **Lookup**: resolve the outlet name to its feed URL ([`config`])
//! 2. **Fetching**: download the feed markup ([`fetch`])
//! 3. **Extraction**: split the markup into items ([`feed`])
//! 4. **Normalization**: build one article per item using the outlet's body
//!    rule ([`normalize`], [`body`])
//!
//! [`scrape::OutletScraper`] runs the whole pipeline for one outlet.
//!
//! ```no_run
//! use outlet_feeds::{HttpFetcher, OutletRegistry, OutletScraper};
//! use std::time::Duration;
//!
//! # async fn run() -> outlet_feeds::Result<()> {
//! let registry = OutletRegistry::load("outlets.yaml").await?;
//! let scraper = OutletScraper::new(registry, HttpFetcher::new(Duration::from_secs(30))?);
//! for article in scraper.scrape("IGN").await? {
//!     println!("{} - {}", article.title, article.snippet);
//! }
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod scrape;
pub mod utils;

pub use body::{BodyExtractor, BodyRuleKind, BodyRules};
pub use config::{OutletLookup, OutletRegistry};
pub use error::{Result, ScrapeError};
pub use feed::{FeedItem, extract_items};
pub use fetch::{FeedFetcher, HttpFetcher};
pub use models::{Article, MAX_SNIPPET_CHARS, OutletConfig};
pub use normalize::{Normalizer, normalize};
pub use scrape::{ItemFailurePolicy, OutletScraper};
