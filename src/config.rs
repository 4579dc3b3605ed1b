//! Per-site configuration.
//!
//! A [`SiteConfig`] carries every site-specific constant the pipeline needs:
//! where the feed lives, which elements hold the article body, cover and
//! caption, and the class markers that silence boilerplate. Defaults match
//! `krasnoturinsk.info`; a YAML file may override any subset of fields.
//!
//! ```yaml
//! name: krasnoturinsk.info
//! base_url: https://krasnoturinsk.info
//! body_selector: .js-mediator-article
//! cut_class: article-footer
//! max_depth: 3
//! ```

use scraper::Selector;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Name recorded on every produced post.
    pub name: String,
    /// Site root, prepended to relative image paths.
    pub base_url: String,
    /// RSS feed listing the articles.
    pub feed_url: String,
    /// Element(s) holding the article body.
    pub body_selector: String,
    /// Dedicated cover image element.
    pub cover_image_selector: String,
    /// Caption shown under the cover image.
    pub caption_selector: String,
    /// Element holding the publish date, read when the feed has none.
    pub published_date_selector: String,
    /// `chrono` format of the page-embedded publish date.
    pub published_date_format: String,
    /// UTC offset the page-embedded date is expressed in, e.g. `+0800`.
    pub published_date_offset: String,
    /// Injected filler blocks removed before any text is read.
    pub floating_block_selector: String,
    /// Tag treated as a quotation.
    pub quote_tag: String,
    /// Class substring marking a subtree to skip. Empty disables.
    pub exclude_class_pattern: String,
    /// Class substring marking the end of the article. Empty disables.
    pub cut_class: String,
    /// Class substring marking navigational anchors that are not links.
    pub read_more_class: String,
    /// Maximum recursion depth below each body root.
    pub max_depth: usize,
    /// Prefix for each list entry when lists are flattened to text.
    pub list_prefix: String,
    /// Maximum number of feed entries processed per run.
    pub max_news_count: usize,
    pub request_timeout_secs: u64,
    /// Article pages fetched concurrently.
    pub concurrent_requests: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "krasnoturinsk.info".to_string(),
            base_url: "https://krasnoturinsk.info".to_string(),
            feed_url: "https://krasnoturinsk.info/local/rss.php".to_string(),
            body_selector: ".js-mediator-article".to_string(),
            cover_image_selector: ".td-post-featured-image img".to_string(),
            caption_selector: ".widget-media__caption".to_string(),
            published_date_selector: ".c-date".to_string(),
            published_date_format: "%d.%m.%Y %H:%M".to_string(),
            published_date_offset: "+0800".to_string(),
            floating_block_selector: ".nd_ln_float".to_string(),
            quote_tag: "blockquote".to_string(),
            exclude_class_pattern: String::new(),
            cut_class: String::new(),
            read_more_class: "link-more".to_string(),
            max_depth: 3,
            list_prefix: "-".to_string(),
            max_news_count: 10,
            request_timeout_secs: 30,
            concurrent_requests: 4,
        }
    }
}

/// Load a [`SiteConfig`] from a YAML file. Missing fields take defaults.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<SiteConfig, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: SiteConfig = serde_yaml::from_str(&raw)?;
    info!(site = %config.name, "Loaded site configuration");
    Ok(config)
}

/// CSS selectors of a [`SiteConfig`], parsed once per run.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub body: Selector,
    pub cover_image: Selector,
    pub caption: Selector,
    pub published_date: Selector,
    pub floating_block: Selector,
}

impl SiteSelectors {
    pub fn compile(config: &SiteConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            body: parse_selector(&config.body_selector)?,
            cover_image: parse_selector(&config.cover_image_selector)?,
            caption: parse_selector(&config.caption_selector)?,
            published_date: parse_selector(&config.published_date_selector)?,
            floating_block: parse_selector(&config.floating_block_selector)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, Box<dyn Error>> {
    Selector::parse(css).map_err(|e| format!("invalid CSS selector {css:?}: {e}").into())
}
