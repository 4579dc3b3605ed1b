//! Anchor classification.

use crate::utils::{contains_ignore_case, is_absolute_url};

const IMAGE_EXTENSION: &str = ".jpg";

/// Whether an anchor is a textual link worth emitting.
///
/// Relative, malformed or host-less hrefs (`javascript:`, `tel:`),
/// navigational "read more" anchors and anchors that only wrap a clickable
/// `.jpg` are rejected.
pub fn should_emit(href: &str, class_attr: &str, read_more_class: &str) -> bool {
    let read_more = !read_more_class.is_empty() && contains_ignore_case(class_attr, read_more_class);
    is_absolute_url(href) && !read_more && !href.contains(IMAGE_EXTENSION)
}
