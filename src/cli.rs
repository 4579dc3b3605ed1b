//! Command-line interface definitions.
//!
//! Every flag is optional; without any the built-in site configuration is
//! used and the result is printed to stdout.

use crate::config::SiteConfig;
use clap::Parser;

/// Read a news site's RSS feed and turn each article into typed content blocks.
///
/// # Examples
///
/// ```sh
/// # Built-in site, JSON to stdout
/// rss_article_parser
///
/// # Custom site config, JSON to a file
/// rss_article_parser -c ./site.yaml -o ./out/posts.json --max-news 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a site config YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Maximum number of feed entries to process
    #[arg(long)]
    pub max_news: Option<usize>,

    /// RSS feed URL, overriding the configured one
    #[arg(long, env = "FEED_URL")]
    pub feed_url: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut SiteConfig) {
        if let Some(max_news) = self.max_news {
            config.max_news_count = max_news;
        }
        if let Some(feed_url) = &self.feed_url {
            config.feed_url = feed_url.clone();
        }
    }
}
