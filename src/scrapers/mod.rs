//! Feed-driven article scraping.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing**: Read the site's RSS feed into [`FeedEntry`] values
//! 2. **Fetching**: Download each article page and assemble a [`Post`]
//!
//! # Submodules
//!
//! - [`feed`]: RSS parsing
//! - [`fetch`]: The [`FetchPage`] seam and its HTTP implementation
//! - [`article`]: Turning one entry plus its page into a post
//!
//! A failed page fetch never fails the run: the post is kept with the fields
//! the feed provided and no body items.

pub mod article;
pub mod feed;
pub mod fetch;

use crate::config::{SiteConfig, SiteSelectors};
use crate::models::{FeedEntry, Post};
use crate::utils::truncate_for_log;
use fetch::FetchPage;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Fetch the configured feed and read up to `max_news_count` entries.
#[instrument(level = "info", skip_all, fields(feed_url = %config.feed_url))]
pub async fn index_articles<F: FetchPage>(
    fetcher: &F,
    config: &SiteConfig,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let xml = fetcher.fetch(&config.feed_url).await?;
    let entries = feed::read_feed(&xml, config.max_news_count)?;

    info!(
        count = entries.len(),
        max = config.max_news_count,
        "Indexed feed entries"
    );
    debug!(urls = ?entries.iter().map(|e| &e.link).collect::<Vec<_>>(), "Feed URLs");
    Ok(entries)
}

/// Fetch every entry's page concurrently and assemble the posts.
///
/// Posts are returned in feed order.
#[instrument(level = "info", skip_all, fields(count = entries.len()))]
pub async fn fetch_articles<F: FetchPage>(
    fetcher: &F,
    entries: Vec<FeedEntry>,
    config: &SiteConfig,
    selectors: &SiteSelectors,
) -> Vec<Post> {
    let pages: Vec<(FeedEntry, Option<String>)> = stream::iter(entries)
        .map(|entry| async move {
            match fetcher.fetch(&entry.link).await {
                Ok(html) => {
                    debug!(url = %entry.link, bytes = html.len(), "Fetched article");
                    (entry, Some(html))
                }
                Err(e) => {
                    warn!(
                        url = %entry.link,
                        error = %truncate_for_log(&e.to_string(), 200),
                        "Article fetch failed; skipping extraction"
                    );
                    (entry, None)
                }
            }
        })
        .buffered(config.concurrent_requests.max(1))
        .collect()
        .await;

    let posts: Vec<Post> = pages
        .iter()
        .map(|(entry, html)| article::assemble(entry, html.as_deref(), config, selectors))
        .collect();

    info!(count = posts.len(), "Assembled posts");
    posts
}
