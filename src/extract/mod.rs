//! Recursive content extraction.
//!
//! Walks an article body depth-first and turns recognized elements into
//! [`PostItem`]s on a [`Post`]:
//!
//! | Tag | Handling |
//! |-----|----------|
//! | `div`, `span`, `figure`, `strong`, `i` | segment inner markup, then recurse |
//! | `p` | nothing (consumed as markup by its container) |
//! | quote tag | segment on `<br>`, no recursion |
//! | `img` | cover image or gallery image ([`image`]) |
//! | `video`, `iframe` | video id ([`media`]) |
//! | `a`, `b` | link ([`link`]), then recurse |
//! | `ul`, `ol` | one text item, one prefixed line per `<li>` |
//! | `h1`..`h6` | one text item with heading level |
//!
//! Anything else is dropped with its subtree. Recursion is bounded by
//! [`SiteConfig::max_depth`], and a cut marker stops the whole traversal for
//! the rest of the article.

pub mod image;
pub mod link;
pub mod media;
pub mod segment;

use crate::config::SiteConfig;
use crate::models::{Post, PostItem};
use crate::utils::{contains_ignore_case, normalize_text};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use segment::{SplitToken, apply, segment};

static VIDEO_SOURCE: Lazy<Selector> = Lazy::new(|| Selector::parse("source").unwrap());

/// Element kinds the extractor dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Container,
    Paragraph,
    Quote,
    Image,
    Video,
    Link,
    Frame,
    List,
    Heading(u8),
    Other,
}

impl TagKind {
    fn classify(name: &str, quote_tag: &str) -> Self {
        match name {
            "div" | "span" | "figure" | "strong" | "i" => TagKind::Container,
            "p" => TagKind::Paragraph,
            _ if name == quote_tag => TagKind::Quote,
            "img" => TagKind::Image,
            "video" => TagKind::Video,
            "a" | "b" => TagKind::Link,
            "iframe" => TagKind::Frame,
            "ul" | "ol" => TagKind::List,
            "h1" => TagKind::Heading(1),
            "h2" => TagKind::Heading(2),
            "h3" => TagKind::Heading(3),
            "h4" => TagKind::Heading(4),
            "h5" => TagKind::Heading(5),
            "h6" => TagKind::Heading(6),
            _ => TagKind::Other,
        }
    }
}

/// Copy of `document` without the elements matching `selector`.
///
/// Injected filler (ads, "related" widgets) is removed up front so it never
/// leaks into the text of the blocks that contain it.
pub fn strip_floating_blocks(document: &Html, selector: &Selector) -> Html {
    let mut cleaned = document.clone();
    let ids: Vec<_> = cleaned.select(selector).map(|element| element.id()).collect();
    if !ids.is_empty() {
        debug!(count = ids.len(), "Stripping floating blocks");
    }
    for id in ids {
        if let Some(mut node) = cleaned.tree.get_mut(id) {
            node.detach();
        }
    }
    cleaned
}

/// One article's traversal. Owns the stop flag, so a fresh extractor must be
/// used for every post.
#[derive(Debug)]
pub struct ContentExtractor<'a> {
    config: &'a SiteConfig,
    post: &'a mut Post,
    stopped: bool,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(config: &'a SiteConfig, post: &'a mut Post) -> Self {
        Self {
            config,
            post,
            stopped: false,
        }
    }

    /// Whether a cut marker ended the traversal.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Visit every root with the configured depth, in order, until a cut
    /// marker is met.
    pub fn extract<'d>(&mut self, roots: impl IntoIterator<Item = ElementRef<'d>>) {
        let depth = self.config.max_depth;
        for root in roots {
            if self.stopped {
                break;
            }
            self.visit(root, depth);
        }
    }

    fn visit(&mut self, node: ElementRef<'_>, depth: usize) {
        if self.stopped {
            return;
        }
        let config = self.config;
        let element = node.value();
        let class = element.attr("class").unwrap_or_default();

        if !config.exclude_class_pattern.is_empty() && class.contains(&config.exclude_class_pattern)
        {
            trace!(tag = element.name(), %class, "Skipped excluded subtree");
            return;
        }

        let mut depth = depth;
        if !config.cut_class.is_empty() && contains_ignore_case(class, &config.cut_class) {
            debug!(tag = element.name(), %class, "Reached end of article");
            self.stopped = true;
            depth = 0;
        }

        if depth == 0 {
            trace!(tag = element.name(), "Depth exhausted");
            return;
        }
        let depth = depth - 1;

        match TagKind::classify(element.name(), &config.quote_tag) {
            TagKind::Container => {
                let markup = node.inner_html();
                let fragments = segment(&markup, SplitToken::for_markup(&markup));
                apply(fragments, self.post);
                self.visit_children(node, depth);
            }
            TagKind::Paragraph => {}
            TagKind::Quote => {
                let fragments = segment(&node.inner_html(), SplitToken::Break);
                apply(fragments, self.post);
            }
            TagKind::Image => {
                if let Some(src) = element.attr("src").filter(|src| !src.trim().is_empty()) {
                    image::resolve_image(self.post, src, &config.base_url);
                }
            }
            TagKind::Video => {
                let src = node
                    .select(&VIDEO_SOURCE)
                    .next()
                    .and_then(|source| source.value().attr("src"));
                self.add_video(src);
            }
            TagKind::Link => {
                let href = element.attr("href").unwrap_or_default().trim();
                if link::should_emit(href, class, &config.read_more_class) {
                    self.post.add_item(PostItem::Link {
                        label: node_text(node),
                        url: href.to_string(),
                    });
                }
                self.visit_children(node, depth);
            }
            TagKind::Frame => self.add_video(element.attr("src")),
            TagKind::List => {
                let body = node
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|child| child.value().name() == "li")
                    .map(|li| format!("{}{}", config.list_prefix, node_text(li)))
                    .join("\n");
                if !body.is_empty() {
                    self.post.add_item(PostItem::text(body));
                }
            }
            TagKind::Heading(level) => {
                let body = node_text(node);
                if !body.is_empty() {
                    self.post.add_item(PostItem::heading(body, level));
                }
            }
            TagKind::Other => {
                trace!(tag = element.name(), "Dropped unrecognized element");
            }
        }
    }

    fn visit_children(&mut self, node: ElementRef<'_>, depth: usize) {
        for child in node.children().filter_map(ElementRef::wrap) {
            if self.stopped {
                break;
            }
            self.visit(child, depth);
        }
    }

    fn add_video(&mut self, src: Option<&str>) {
        match src.and_then(media::extract_video_id) {
            Some(external_id) => self.post.add_item(PostItem::Video { external_id }),
            None => debug!(src = src.unwrap_or_default(), "Unresolved video source"),
        }
    }
}

/// Normalized visible text of an element.
fn node_text(node: ElementRef<'_>) -> String {
    normalize_text(&node.inner_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DESCRIPTION_UNSET, FeedEntry};
    use chrono::DateTime;

    fn config() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.test".to_string(),
            ..SiteConfig::default()
        }
    }

    fn post() -> Post {
        Post::from_entry(
            "example",
            &FeedEntry {
                title: "T".to_string(),
                link: "https://example.test/1".to_string(),
                published_at: DateTime::from_timestamp(0, 0).unwrap(),
                enclosure: None,
            },
        )
    }

    /// Run one traversal over the top-level elements of `markup`.
    fn run(markup: &str, config: &SiteConfig) -> (Post, bool) {
        let html = Html::parse_fragment(markup);
        let mut post = post();
        let mut extractor = ContentExtractor::new(config, &mut post);
        extractor.extract(html.root_element().children().filter_map(ElementRef::wrap));
        let stopped = extractor.is_stopped();
        (post, stopped)
    }

    #[test]
    fn test_tag_classification() {
        assert_eq!(TagKind::classify("span", "blockquote"), TagKind::Container);
        assert_eq!(TagKind::classify("blockquote", "blockquote"), TagKind::Quote);
        assert_eq!(TagKind::classify("blockquote", "q"), TagKind::Other);
        assert_eq!(TagKind::classify("h4", "blockquote"), TagKind::Heading(4));
        assert_eq!(TagKind::classify("H2", "blockquote"), TagKind::Other);
        assert_eq!(TagKind::classify("section", "blockquote"), TagKind::Other);
    }

    #[test]
    fn test_container_by_paragraph() {
        let (post, _) = run("<div><p>A</p><p>B</p></div>", &config());
        assert_eq!(post.description, "A");
        assert_eq!(post.items, vec![PostItem::text("B")]);
    }

    #[test]
    fn test_container_by_break() {
        let (post, _) = run("<div>A<br>B<br>C</div>", &config());
        assert_eq!(post.description, "A");
        assert_eq!(post.items, vec![PostItem::text("B"), PostItem::text("C")]);
    }

    #[test]
    fn test_description_taken_from_first_fragment_only() {
        let (post, _) = run("<div>First<br>Second</div><span>Third</span>", &config());
        assert_eq!(post.description, "First");
        assert_eq!(
            post.items,
            vec![PostItem::text("Second"), PostItem::text("Third")]
        );
    }

    #[test]
    fn test_list_flattened_to_one_item() {
        let (post, _) = run("<ul><li>x</li><li>y</li></ul>", &config());
        assert_eq!(post.items, vec![PostItem::text("-x\n-y")]);
        assert_eq!(post.description, DESCRIPTION_UNSET);
    }

    #[test]
    fn test_list_with_custom_prefix() {
        let config = SiteConfig {
            list_prefix: "• ".to_string(),
            ..config()
        };
        let (post, _) = run("<ol><li>one</li><li><b>two</b></li></ol>", &config);
        assert_eq!(post.items, vec![PostItem::text("• one\n• two")]);
    }

    #[test]
    fn test_heading_carries_level() {
        let (post, _) = run("<h2>Title <b>bold</b></h2>", &config());
        assert_eq!(post.items, vec![PostItem::heading("Title bold", 2)]);
    }

    #[test]
    fn test_bare_paragraph_and_unknown_tags_emit_nothing() {
        let (post, _) = run("<p>Alone</p><section>Dropped</section>", &config());
        assert_eq!(post.description, DESCRIPTION_UNSET);
        assert!(post.items.is_empty());
    }

    #[test]
    fn test_quote_segmented_without_recursion() {
        let (post, _) = run(
            "<div>Lead</div><blockquote>Q1<br>Q2<div><img src=\"/q.jpg\"></div></blockquote>",
            &config(),
        );
        assert_eq!(post.description, "Lead");
        assert_eq!(post.items, vec![PostItem::text("Q1")]);
        assert!(post.cover_image_url.is_none());
    }

    #[test]
    fn test_depth_bound() {
        let markup = "<div><div><div><div><img src=\"/deep.jpg\"></div></div></div></div>";

        let (post, _) = run(markup, &config());
        assert!(post.cover_image_url.is_none());

        let deeper = SiteConfig {
            max_depth: 5,
            ..config()
        };
        let (post, _) = run(markup, &deeper);
        assert_eq!(
            post.cover_image_url.as_deref(),
            Some("https://example.test/deep.jpg")
        );
    }

    #[test]
    fn test_cut_marker_stops_following_siblings() {
        let config = SiteConfig {
            cut_class: "article-end".to_string(),
            ..config()
        };
        let (post, stopped) = run(
            "<div>Intro</div><div class=\"Article-End\">Footer</div><div>After</div><img src=\"/x.jpg\">",
            &config,
        );
        assert!(stopped);
        assert_eq!(post.description, "Intro");
        assert!(post.items.is_empty());
        assert!(post.cover_image_url.is_none());
    }

    #[test]
    fn test_nested_cut_marker_stops_outer_traversal() {
        let config = SiteConfig {
            cut_class: "article-end".to_string(),
            ..config()
        };
        let (post, stopped) = run(
            "<div><span class=\"article-end\"></span><img src=\"/a.jpg\"></div><div>Later</div>",
            &config,
        );
        assert!(stopped);
        assert!(post.cover_image_url.is_none());
        assert_eq!(post.description, DESCRIPTION_UNSET);
        assert!(post.items.is_empty());
    }

    #[test]
    fn test_excluded_subtree_skipped_without_stopping() {
        let config = SiteConfig {
            exclude_class_pattern: "promo".to_string(),
            ..config()
        };
        let (post, stopped) = run(
            "<div class=\"box promo-block\">Ad<img src=\"/ad.jpg\"></div><div>Body</div>",
            &config,
        );
        assert!(!stopped);
        assert_eq!(post.description, "Body");
        assert!(post.cover_image_url.is_none());
    }

    #[test]
    fn test_images_cover_then_gallery() {
        let (post, _) = run(
            "<img src=\"/a.jpg\"><img src=\"/a.jpg\"><img src=\"/b.jpg\"><img>",
            &config(),
        );
        assert_eq!(
            post.cover_image_url.as_deref(),
            Some("https://example.test/a.jpg")
        );
        assert_eq!(
            post.items,
            vec![PostItem::Image {
                url: "https://example.test/b.jpg".to_string()
            }]
        );
    }

    #[test]
    fn test_link_emitted_with_label() {
        let (post, _) = run("<a href=\"https://other.test/page\"> Other <i>site</i></a>", &config());
        assert_eq!(
            post.items,
            vec![PostItem::Link {
                label: "Other site".to_string(),
                url: "https://other.test/page".to_string()
            }]
        );
    }

    #[test]
    fn test_link_href_trimmed() {
        let (post, _) = run("<a href=\"  https://other.test/page\n\">Other</a>", &config());
        assert_eq!(
            post.items,
            vec![PostItem::Link {
                label: "Other".to_string(),
                url: "https://other.test/page".to_string()
            }]
        );
    }

    #[test]
    fn test_scheme_only_anchors_not_emitted_but_traversed() {
        let (post, _) = run(
            "<a href=\"javascript:void(0)\">Share<img src=\"/share.jpg\"></a>\
             <a href=\"tel:+73438400000\">Call<img src=\"/call.jpg\"></a>\
             <a href=\"mailto:editor@example.test\">Mail</a>",
            &config(),
        );
        assert_eq!(
            post.cover_image_url.as_deref(),
            Some("https://example.test/share.jpg")
        );
        assert_eq!(
            post.items,
            vec![PostItem::Image {
                url: "https://example.test/call.jpg".to_string()
            }]
        );
    }

    #[test]
    fn test_rejected_links_still_traverse_children() {
        let (post, _) = run(
            "<a class=\"link-more\" href=\"https://other.test/more\"><img src=\"/c.jpg\"></a>\
             <a href=\"https://other.test/big.jpg\"><img src=\"/small.jpg\"></a>",
            &config(),
        );
        assert_eq!(
            post.cover_image_url.as_deref(),
            Some("https://example.test/c.jpg")
        );
        assert_eq!(
            post.items,
            vec![PostItem::Image {
                url: "https://example.test/small.jpg".to_string()
            }]
        );
    }

    #[test]
    fn test_videos() {
        let (post, _) = run(
            "<iframe src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\"></iframe>\
             <iframe src=\"https://vimeo.com/1\"></iframe>\
             <video><source src=\"https://youtu.be/aaaaaaaaaaa\"></video>\
             <video></video>",
            &config(),
        );
        assert_eq!(
            post.items,
            vec![
                PostItem::Video {
                    external_id: "dQw4w9WgXcQ".to_string()
                },
                PostItem::Video {
                    external_id: "aaaaaaaaaaa".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_strip_floating_blocks() {
        let html = Html::parse_document(
            "<div class=\"body\">Before<div class=\"nd_ln_float\">Advert</div>After</div>",
        );
        let selector = Selector::parse(".nd_ln_float").unwrap();
        let cleaned = strip_floating_blocks(&html, &selector);

        let body = Selector::parse(".body").unwrap();
        let markup = cleaned.select(&body).next().unwrap().inner_html();
        assert_eq!(markup, "BeforeAfter");
        // The input document is left untouched.
        assert!(html.select(&selector).next().is_some());
    }

    #[test]
    fn test_stop_flag_scoped_to_one_extractor() {
        let config = SiteConfig {
            cut_class: "end".to_string(),
            ..config()
        };
        let (_, stopped) = run("<div class=\"end\"></div>", &config);
        assert!(stopped);
        let (post, stopped) = run("<div>Fresh</div>", &config);
        assert!(!stopped);
        assert_eq!(post.description, "Fresh");
    }
}
