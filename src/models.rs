//! Data models for feed entries and the posts assembled from them.
//!
//! - [`FeedEntry`]: Scalar fields of one RSS `<item>`
//! - [`Post`]: One article under construction, filled by the extractor
//! - [`PostItem`]: One emitted content block (text, image, link, video)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored in [`Post::description`] until the first accepted
/// body fragment replaces it.
pub const DESCRIPTION_UNSET: &str = "description";

/// A raw entry read from the site's RSS feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// The `<title>` text.
    pub title: String,
    /// The `<link>` text, the article page URL.
    pub link: String,
    /// Parsed `<pubDate>`. Unix epoch when the feed carried no usable date.
    pub published_at: DateTime<Utc>,
    /// `url` attribute of `<enclosure>`, if present.
    pub enclosure: Option<String>,
}

impl FeedEntry {
    /// Whether the feed left the publish date to be read from the page.
    pub fn has_epoch_date(&self) -> bool {
        self.published_at.timestamp() == 0
    }
}

/// One article with its ordered content blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Name of the site configuration that produced this post.
    pub site: String,
    pub title: String,
    /// Short description. Holds [`DESCRIPTION_UNSET`] until assigned.
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub original_url: String,
    /// Representative image of the post, distinct from gallery images.
    pub cover_image_url: Option<String>,
    /// Content blocks in document order.
    pub items: Vec<PostItem>,
}

impl Post {
    /// Start a post from a feed entry. The enclosure, when present, is the
    /// initial cover image.
    pub fn from_entry(site: &str, entry: &FeedEntry) -> Self {
        Self {
            site: site.to_string(),
            title: entry.title.clone(),
            description: DESCRIPTION_UNSET.to_string(),
            published_at: entry.published_at,
            original_url: entry.link.clone(),
            cover_image_url: entry.enclosure.clone().filter(|url| !url.is_empty()),
            items: Vec::new(),
        }
    }

    pub fn has_description(&self) -> bool {
        !(self.description.is_empty() || self.description == DESCRIPTION_UNSET)
    }

    pub fn has_cover_image(&self) -> bool {
        self.cover_image_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn add_item(&mut self, item: PostItem) {
        self.items.push(item);
    }
}

/// One content block of a [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PostItem {
    Text {
        body: String,
        /// Heading level (1-6) when the text came from `<h1>`..`<h6>`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<u8>,
    },
    Image {
        url: String,
    },
    Link {
        label: String,
        url: String,
    },
    Video {
        external_id: String,
    },
}

impl PostItem {
    pub fn text(body: impl Into<String>) -> Self {
        PostItem::Text {
            body: body.into(),
            heading: None,
        }
    }

    pub fn heading(body: impl Into<String>, level: u8) -> Self {
        PostItem::Text {
            body: body.into(),
            heading: Some(level),
        }
    }
}
