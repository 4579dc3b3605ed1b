//! # RSS Article Parser
//!
//! Reads a news site's RSS feed, fetches each listed article and converts its
//! markup into an ordered sequence of typed content blocks (text, images,
//! links, videos) plus a short description and a cover image.
//!
//! ## Usage
//!
//! ```sh
//! rss_article_parser -c ./site.yaml -o ./posts.json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Indexing**: Read up to `max_news_count` entries from the feed
//! 2. **Fetching**: Download article pages concurrently
//! 3. **Extraction**: Walk each article body and assemble a post
//! 4. **Output**: Write the posts as JSON

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::{SiteConfig, SiteSelectors, load_config};
use outputs::json;
use scrapers::fetch::HttpFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so stdout stays clean for the JSON result.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("rss_article_parser starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };
    args.apply_overrides(&mut config);
    let selectors = SiteSelectors::compile(&config)?;
    info!(site = %config.name, feed_url = %config.feed_url, max_depth = config.max_depth, "Configuration ready");

    let fetcher = HttpFetcher::new(Duration::from_secs(config.request_timeout_secs))?;

    // ---- Index and fetch articles ----
    let entries = match scrapers::index_articles(&fetcher, &config).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(feed_url = %config.feed_url, error = %e, "Failed to read feed");
            return Err(e);
        }
    };
    let total_entries = entries.len();
    let posts = scrapers::fetch_articles(&fetcher, entries, &config, &selectors).await;

    let with_body = posts.iter().filter(|post| !post.items.is_empty()).count();
    info!(
        total = total_entries,
        with_body,
        without_body = posts.len() - with_body,
        "Completed article extraction"
    );

    // ---- Output ----
    if let Err(e) = json::write_posts(&posts, args.output.as_deref()).await {
        error!(error = %e, "Failed to write JSON output");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
