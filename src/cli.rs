//! Command-line interface definitions.
//!
//! All options can be given as flags; the registry path can also come from
//! the environment.

use clap::Parser;

/// Fetch outlet RSS feeds and print or store them as normalized articles.
///
/// # Examples
///
/// ```sh
/// # Every outlet in outlets.yaml, printed to stdout
/// outlet_feeds
///
/// # Two outlets, one JSON file each
/// outlet_feeds -o IGN -o "PC Gamer" -j ./json
///
/// # Fail the outlet on the first bad item instead of skipping it
/// outlet_feeds -o IGN --abort-on-item-error
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the outlet registry YAML file
    #[arg(short, long, env = "OUTLET_FEEDS_CONFIG", default_value = "outlets.yaml")]
    pub config: String,

    /// Outlet to scrape (repeatable); defaults to every configured outlet
    #[arg(short, long = "outlet")]
    pub outlets: Vec<String>,

    /// Directory for per-outlet JSON files; prints to stdout when omitted
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Feed download timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Abort an outlet on the first item that fails to normalize
    #[arg(long)]
    pub abort_on_item_error: bool,

    /// Number of outlets scraped at the same time
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}
