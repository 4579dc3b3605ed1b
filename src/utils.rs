//! Utility functions for text normalization, URL checks and log output.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turn a raw markup fragment into display-ready text.
///
/// Tags are dropped, HTML entities decoded and runs of whitespace (including
/// non-breaking spaces) collapsed to a single space. The result is trimmed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("  <b>Hello</b>&nbsp;&amp; bye "), "Hello & bye");
/// ```
pub fn normalize_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(raw);
    let text = fragment.root_element().text().collect::<String>();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Whether `href` is an absolute URL pointing at a host.
///
/// Scheme-only forms such as `javascript:`, `tel:` or `mailto:` parse as URLs
/// but name no host, so they are rejected.
pub fn is_absolute_url(href: &str) -> bool {
    Url::parse(href.trim()).is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

/// ASCII case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes
/// with an ellipsis and the number of dropped bytes appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
