//! Paragraph segmentation.
//!
//! A block's inner markup is cut on a literal tag string into candidate
//! fragments. Fragments carrying nested lists, sub-headings, images or the
//! site's loading placeholder are dropped here; the surrounding extractor
//! reaches those through their own elements. The markers are exact
//! substrings of what the site emits, not a general HTML check.

use crate::models::{Post, PostItem};
use crate::utils::{normalize_text, truncate_for_log};
use tracing::trace;

/// Substrings that disqualify a fragment.
const NOISE_MARKERS: [&str; 5] = ["<ul>", "<li>", "<h3>", "<img", "Loading..."];

const SCRIPT_MARKER: &str = "<script>";

/// Literal boundary a block's markup is split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitToken {
    /// `<br>` line breaks inside a flat block.
    Break,
    /// Nested `<p>` openings.
    Paragraph,
}

impl SplitToken {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitToken::Break => "<br>",
            SplitToken::Paragraph => "<p>",
        }
    }

    /// Paragraph mode when the markup holds a nested `<p>`, break mode otherwise.
    pub fn for_markup(markup: &str) -> Self {
        if markup.contains(SplitToken::Paragraph.as_str()) {
            SplitToken::Paragraph
        } else {
            SplitToken::Break
        }
    }
}

/// Split `raw_markup` on `split` and keep the fragments worth emitting, in order.
///
/// Returned fragments are trimmed but still raw markup.
pub fn segment(raw_markup: &str, split: SplitToken) -> Vec<String> {
    raw_markup
        .split(split.as_str())
        .map(trim_fragment)
        .filter(|fragment| !fragment.is_empty())
        .filter(|fragment| !is_noise(fragment))
        .map(str::to_string)
        .collect()
}

/// Hand segmented fragments to the post.
///
/// The first fragment becomes the description if the post has none yet; every
/// other fragment that still has visible text becomes a text item.
pub fn apply(fragments: Vec<String>, post: &mut Post) {
    let mut fragments = fragments.into_iter();

    if !post.has_description() {
        if let Some(first) = fragments.next() {
            post.description = normalize_text(&first);
            trace!(description = %truncate_for_log(&post.description, 80), "Assigned description");
        }
    }

    for fragment in fragments {
        let body = normalize_text(&fragment);
        if body.chars().all(char::is_whitespace) || fragment.contains(SCRIPT_MARKER) {
            continue;
        }
        post.add_item(PostItem::text(body));
    }
}

fn trim_fragment(fragment: &str) -> &str {
    fragment.trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == '\x0B')
}

fn is_noise(fragment: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| fragment.contains(marker))
        || normalize_text(fragment).is_empty()
}
