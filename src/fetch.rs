//! Downloading raw feed markup.
//!
//! [`FeedFetcher`] is the seam between the scraper and the network; the
//! production implementation is [`HttpFetcher`], tests substitute canned
//! responses.
//!
//! # Failure classification
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Request exceeded the configured timeout | [`ScrapeError::Timeout`] |
//! | Server answered with a non-2xx status | [`ScrapeError::Status`] |
//! | Connection, TLS or body decoding failure | [`ScrapeError::Transport`] |
//!
//! No retries are attempted.

use crate::error::{Result, ScrapeError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Default upper bound on a single feed download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches raw feed content by URL.
///
/// Callers use it through generics on a single task, so no `Send` bound is
/// placed on the returned future.
#[allow(async_fn_in_trait)]
pub trait FeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`FeedFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ScrapeError::Transport {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn classify(url: &str, source: reqwest::Error) -> ScrapeError {
    if source.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

impl FeedFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Feed request was not successful");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| classify(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched feed"
        );
        Ok(body)
    }
}
