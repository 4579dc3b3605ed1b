//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: Writes assembled posts as a JSON array
//!
//! Each post serializes with its ordered `items`, tagged by `kind`:
//!
//! ```text
//! [
//!   {
//!     "site": "krasnoturinsk.info",
//!     "title": "...",
//!     "description": "...",
//!     "published_at": "2020-10-01T07:30:00Z",
//!     "original_url": "https://krasnoturinsk.info/news/...",
//!     "cover_image_url": "https://krasnoturinsk.info/upload/...",
//!     "items": [
//!       { "kind": "text", "body": "..." },
//!       { "kind": "image", "url": "..." },
//!       { "kind": "link", "label": "...", "url": "..." },
//!       { "kind": "video", "external_id": "..." }
//!     ]
//!   }
//! ]
//! ```

pub mod json;
