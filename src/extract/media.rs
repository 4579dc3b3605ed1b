//! Video identifier resolution for embedded players.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the common YouTube URL shapes and captures the 11-character id.
static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|v/|shorts/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .unwrap()
});

/// Extract the canonical video id from a video-hosting URL.
///
/// Returns `None` when the URL does not match a recognized pattern.
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
