//! # Outlet Feeds CLI
//!
//! Scrapes the RSS feeds of configured news outlets and emits the normalized
//! articles as JSON.
//!
//! ```sh
//! outlet_feeds -c outlets.yaml -o IGN -o "PC Gamer" -j ./json
//! ```
//!
//! Outlets are scraped independently; a failing outlet is logged and the
//! others still complete.

use clap::Parser;
use futures::stream::{self, StreamExt};
use outlet_feeds::outputs::json;
use outlet_feeds::utils::ensure_writable_dir;
use outlet_feeds::{
    BodyRules, HttpFetcher, ItemFailurePolicy, Normalizer, OutletRegistry, OutletScraper,
};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("outlet_feeds starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let registry = OutletRegistry::load(&args.config).await.map_err(|e| {
        error!(path = %args.config, error = %e, "Failed to load outlet registry");
        e
    })?;

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let outlets: Vec<String> = if args.outlets.is_empty() {
        registry.names().map(str::to_string).collect()
    } else {
        args.outlets.clone()
    };
    info!(count = outlets.len(), "Outlets to scrape");

    let policy = if args.abort_on_item_error {
        ItemFailurePolicy::Abort
    } else {
        ItemFailurePolicy::Skip
    };
    let normalizer = Normalizer::new(BodyRules::builtin().with_registry(&registry));
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let scraper = OutletScraper::new(registry, fetcher)
        .with_normalizer(normalizer)
        .with_policy(policy);

    // Items within an outlet stay sequential; only whole outlets overlap.
    let results: Vec<_> = stream::iter(outlets.iter())
        .map(|outlet| {
            let scraper = &scraper;
            async move { (outlet, scraper.scrape(outlet).await) }
        })
        .buffer_unordered(usize::from(args.concurrency))
        .collect()
        .await;

    let mut succeeded = 0usize;
    let mut article_count = 0usize;
    for (outlet, result) in results {
        let articles = match result {
            Ok(articles) => articles,
            Err(e) => {
                error!(%outlet, error = %e, "Scrape failed; skipping outlet");
                continue;
            }
        };
        succeeded += 1;
        article_count += articles.len();

        match &args.json_output_dir {
            Some(dir) => {
                if let Err(e) = json::write_articles(&articles, outlet, dir).await {
                    error!(%outlet, error = %e, "Failed to write JSON");
                }
            }
            None => match json::articles_to_json(&articles) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => error!(%outlet, error = %e, "Failed to render JSON"),
            },
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        outlets = outlets.len(),
        succeeded,
        failed = outlets.len() - succeeded,
        articles = article_count,
        "Execution complete"
    );

    Ok(())
}
