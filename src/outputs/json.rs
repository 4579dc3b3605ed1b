//! JSON output of assembled posts.
//!
//! Posts are written as one pretty-printed JSON array, either to a file or
//! to stdout when no path is given.

use crate::models::Post;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

/// Serialize `posts` to `output`, or to stdout when `output` is `None`.
///
/// Missing parent directories of `output` are created.
#[instrument(level = "info", skip_all, fields(count = posts.len(), output = ?output))]
pub async fn write_posts(posts: &[Post], output: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(posts)?;

    let Some(path) = output else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        return Ok(());
    };

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(path, "Wrote posts JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedEntry, PostItem};
    use chrono::{DateTime, Utc};

    #[tokio::test]
    async fn test_write_posts_to_file() {
        let mut post = Post::from_entry(
            "example",
            &FeedEntry {
                title: "Title".to_string(),
                link: "https://example.test/news/1".to_string(),
                published_at: DateTime::<Utc>::UNIX_EPOCH,
                enclosure: None,
            },
        );
        post.add_item(PostItem::text("Body"));

        let dir = std::env::temp_dir().join("rss_article_parser_json_test");
        let path = dir.join("nested").join("posts.json");
        let path_str = path.to_str().unwrap();

        write_posts(std::slice::from_ref(&post), Some(path_str))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
        let parsed: Vec<Post> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![post]);
    }
}
