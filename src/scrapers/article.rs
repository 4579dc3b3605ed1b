//! Post assembly from a feed entry and its fetched page.

use crate::config::{SiteConfig, SiteSelectors};
use crate::extract::image::prepare_image;
use crate::extract::{ContentExtractor, strip_floating_blocks};
use crate::models::{FeedEntry, Post, PostItem};
use crate::utils::normalize_text;
use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::{debug, info, instrument, warn};

/// Build a [`Post`] for `entry`.
///
/// Without a page body the post keeps what the feed provided: title, date,
/// link and enclosure as cover. With a body the page date (when the feed
/// had none), cover element, caption and article content are read in that
/// order.
#[instrument(level = "info", skip_all, fields(url = %entry.link))]
pub fn assemble(
    entry: &FeedEntry,
    html: Option<&str>,
    config: &SiteConfig,
    selectors: &SiteSelectors,
) -> Post {
    let mut post = Post::from_entry(&config.name, entry);

    let Some(html) = html.filter(|html| !html.trim().is_empty()) else {
        warn!("No page content; post keeps feed fields only");
        return post;
    };
    let document = Html::parse_document(html);

    if entry.has_epoch_date() {
        match page_date(&document, config, selectors) {
            Some(date) => post.published_at = date,
            None => debug!("No usable publish date on page"),
        }
    }

    let cover = document
        .select(&selectors.cover_image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty());
    if let Some(src) = cover {
        post.cover_image_url = Some(prepare_image(src, &config.base_url));
    }

    let caption = document
        .select(&selectors.caption)
        .next()
        .map(|caption| normalize_text(&caption.inner_html()))
        .filter(|caption| !caption.is_empty());
    if let Some(caption) = caption {
        post.add_item(PostItem::text(caption));
    }

    let cleaned = strip_floating_blocks(&document, &selectors.floating_block);
    let mut extractor = ContentExtractor::new(config, &mut post);
    extractor.extract(cleaned.select(&selectors.body));
    let stopped = extractor.is_stopped();

    info!(
        items = post.items.len(),
        has_cover = post.has_cover_image(),
        has_description = post.has_description(),
        stopped,
        "Assembled post"
    );
    post
}

/// Publish date embedded in the page, converted to UTC.
fn page_date(
    document: &Html,
    config: &SiteConfig,
    selectors: &SiteSelectors,
) -> Option<DateTime<Utc>> {
    let raw = document
        .select(&selectors.published_date)
        .next()
        .map(|element| normalize_text(&element.inner_html()))?;
    let stamped = format!("{raw} {}", config.published_date_offset);
    let format = format!("{} %z", config.published_date_format);

    match DateTime::parse_from_str(&stamped, &format) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            debug!(raw = %raw, error = %e, "Unparsable page date");
            None
        }
    }
}
