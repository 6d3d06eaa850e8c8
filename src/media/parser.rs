//! Locating the video and title inside a fetched page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::fs::UNTITLED;

static VIDEO_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("video").expect("valid selector"));
static SOURCE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("source").expect("valid selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));

/// What an [`ExtractionRule`] pulls out of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMedia {
    pub title: String,
    pub media_url: String,
}

/// Markup convention used to find the media on a page.
///
/// Returning `None` means the page has no qualifying media; that is not an
/// error and the page is simply skipped.
pub trait ExtractionRule: Send + Sync {
    fn extract(&self, html: &str, page_url: &Url) -> Option<ExtractedMedia>;

    /// Whether a media URL found earlier still satisfies this rule.
    fn accepts(&self, media_url: &str) -> bool;
}

/// Finds the first `<video>` whose `src`, or one of whose nested `<source>`
/// elements, points at a file with the expected extension.
#[derive(Debug, Clone)]
pub struct VideoTagRule {
    suffix: String,
}

impl VideoTagRule {
    pub fn new(extension: &str) -> Self {
        Self {
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    fn qualifies(&self, src: &str) -> bool {
        src.ends_with(&self.suffix)
    }

    fn media_reference<'a>(&self, video: ElementRef<'a>) -> Option<&'a str> {
        if let Some(src) = video.value().attr("src").map(str::trim) {
            if self.qualifies(src) {
                return Some(src);
            }
        }

        video
            .select(&SOURCE_SELECTOR)
            .filter_map(|source| source.value().attr("src").map(str::trim))
            .find(|src| self.qualifies(src))
    }
}

impl Default for VideoTagRule {
    fn default() -> Self {
        Self::new("mp4")
    }
}

impl ExtractionRule for VideoTagRule {
    fn accepts(&self, media_url: &str) -> bool {
        self.qualifies(media_url)
    }

    fn extract(&self, html: &str, page_url: &Url) -> Option<ExtractedMedia> {
        let document = Html::parse_document(html);

        let reference = document
            .select(&VIDEO_SELECTOR)
            .find_map(|video| self.media_reference(video))?;

        let media_url = match page_url.join(reference) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                tracing::debug!("Unresolvable media reference {:?}: {}", reference, e);
                return None;
            }
        };

        // Resolution may normalize the path, so check the final form too.
        if !self.qualifies(&media_url) {
            return None;
        }

        let raw_title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|t| t.text().collect::<String>())
            .unwrap_or_else(|| UNTITLED.to_string());

        Some(ExtractedMedia {
            title: clean_title(&raw_title),
            media_url,
        })
    }
}

/// Clean a page title for use as an asset title.
///
/// Strips markup tags, collapses whitespace, and keeps only the text before
/// the first `-` (site names follow a dash). Empty results become
/// [`UNTITLED`].
pub fn clean_title(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, "");
    let collapsed = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");
    let head = collapsed.split('-').next().unwrap_or("").trim();

    if head.is_empty() {
        UNTITLED.to_string()
    } else {
        head.to_string()
    }
}
