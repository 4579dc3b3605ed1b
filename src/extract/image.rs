//! Image URL normalization and the cover/gallery policy.

use crate::models::{Post, PostItem};
use tracing::{debug, trace};

/// Make an image URL absolute and percent-encode it.
///
/// A CSS `background-image: url(...)` wrapper is stripped first. Paths not
/// starting with `base_url` are prefixed with it. Non-ASCII characters (for
/// example Cyrillic file names) are encoded while `:` and `/` stay literal.
///
/// ```ignore
/// assert_eq!(
///     prepare_image("/img/фото.jpg", "https://example.test"),
///     "https://example.test/img/%D1%84%D0%BE%D1%82%D0%BE.jpg",
/// );
/// ```
pub fn prepare_image(raw: &str, base_url: &str) -> String {
    let unwrapped = raw.replace("background-image: url(", "").replace(')', "");
    let unwrapped = unwrapped.trim();

    let absolute = if unwrapped.starts_with(base_url) {
        unwrapped.to_string()
    } else {
        format!("{base_url}{unwrapped}")
    };

    urlencoding::encode(&absolute)
        .replace("%3A", ":")
        .replace("%2F", "/")
}

/// Route an `<img>` source to the post.
///
/// The first image seen becomes the cover. Later images different from the
/// cover are emitted as gallery items; repeats of the cover are dropped.
pub fn resolve_image(post: &mut Post, src: &str, base_url: &str) {
    if src.trim().is_empty() {
        trace!("Ignored image without source");
        return;
    }
    let url = prepare_image(src, base_url);

    if !post.has_cover_image() {
        trace!(%url, "Assigned cover image");
        post.cover_image_url = Some(url);
        return;
    }

    if post.cover_image_url.as_deref() == Some(url.as_str()) {
        debug!(%url, "Dropped duplicate of cover image");
        return;
    }
    post.add_item(PostItem::Image { url });
}
