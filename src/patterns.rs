//! Compiled regex patterns and CSS selectors for thread extraction.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns that depend on configured hosts or token lengths are compiled per
//! harvester instead (see `identity.rs` and `images.rs`).

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Recognized image file extensions (lowercase, with dot).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

// =============================================================================
// Header Patterns
// =============================================================================

/// Leading post number followed by a colon (ASCII or full-width).
pub static NUMBERED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*[:：]").expect("NUMBERED_HEADER regex")
});

/// Responder identity after an `ID` marker.
/// The marker must not be the tail of a longer word ("video", "valid").
pub static RESPONDER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9])(?i:id)(?:\s*[:：]\s*|\s+)([A-Za-z0-9]+)")
        .expect("RESPONDER_ID regex")
});

/// Display name between the post number and the first date-like token.
pub static DISPLAY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s*[:：]\s*(.+?)\s+\d{2,4}/\d{1,2}/\d{1,2}").expect("DISPLAY_NAME regex")
});

/// Date-time token such as `25/03/23(日) 08:24:57`.
pub static POSTED_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2,4})/(\d{1,2})/(\d{1,2})(?:\s*\([^)]*\))?\s*(\d{1,2}):(\d{2})(?::(\d{2}))?")
        .expect("POSTED_AT regex")
});

/// Plain `ID:xxxx` token used for thread-creator detection.
pub static ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ID[:：]([A-Za-z0-9]+)").expect("ID_TOKEN regex")
});

// =============================================================================
// Noise / Advertisement Patterns
// =============================================================================

/// Class/id values of images that are advertisements.
/// `ad` must stand alone as a token so that `header`, `shadow` or `lazyload` do not match.
pub static AD_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])ads?(?:[^a-z]|$)|banner|sponsor|promo|advertisement")
        .expect("AD_CLASS regex")
});

/// Class values of containers whose content is page chrome (RSS blocks, widgets, ads).
pub static NOISE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rss|related|sidebar|widget|(?:^|[^a-z])ads?(?:[^a-z]|$)")
        .expect("NOISE_CLASS regex")
});

/// Noise containers stripped before the whole-page scan.
pub static NOISE_CONTAINER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rss|related|sidebar|widget|sponsor|(?:^|[^a-z])ads?(?:[^a-z]|$)")
        .expect("NOISE_CONTAINER_CLASS regex")
});

/// Class values of elements that hold thread-creator information.
pub static THREAD_CREATOR_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])op(?:[^a-z]|$)|thread-creator|postauthor|author")
        .expect("THREAD_CREATOR_CLASS regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Bare image URLs left behind in body text.
pub static IMAGE_URL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S*\.(?:jpg|jpeg|png|gif|webp)\S*").expect("IMAGE_URL_IN_TEXT regex")
});

/// Runs of spaces produced by stripping URLs.
pub static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]{2,}").expect("SPACE_RUNS regex")
});

/// Characters not allowed in titles used as folder names.
pub static TITLE_UNSAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/:*?"<>|\s。、，．・]+"#).expect("TITLE_UNSAFE regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

/// Main article container checked first by the classifier and BodyOnly.
pub const MAIN_ARTICLE_SELECTOR: &str = "article.post, article.article, main#main.main article";

/// Main article containers tried in order by the Standard strategy.
pub const STANDARD_CONTAINER_SELECTORS: &[&str] = &[
    "article.post",
    "article.article",
    "main#main.main article",
    "article",
    ".entry-content",
    ".article-body",
    "#main article",
];

/// Content container for the sequential-block layout.
pub const SEQUENTIAL_CONTAINER_SELECTOR: &str = "article, .article-body, .entry-content, #article-body";

/// Best-guess main content region for the BodyOnly and whole-page passes.
pub const CONTENT_REGION_SELECTOR: &str =
    "article.post, article.article, main#main.main article, .entry-content";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_header_accepts_full_width_colon() {
        assert!(NUMBERED_HEADER.is_match("1: 名無し"));
        assert!(NUMBERED_HEADER.is_match("  12：名無し"));
        assert!(!NUMBERED_HEADER.is_match("no number: here"));
    }

    #[test]
    fn ad_class_requires_standalone_ad_token() {
        assert!(AD_CLASS.is_match("ad"));
        assert!(AD_CLASS.is_match("ad-slot"));
        assert!(AD_CLASS.is_match("top_ads"));
        assert!(AD_CLASS.is_match("sponsored-image"));
        assert!(!AD_CLASS.is_match("lazyload"));
        assert!(!AD_CLASS.is_match("header"));
    }

    #[test]
    fn noise_class_matches_chrome_blocks() {
        assert!(NOISE_CLASS.is_match("rss-block"));
        assert!(NOISE_CLASS.is_match("related_posts"));
        assert!(!NOISE_CLASS.is_match("t_b"));
        assert!(!NOISE_CLASS.is_match("thread-header"));
    }

    #[test]
    fn responder_id_skips_words_ending_in_id() {
        assert!(RESPONDER_ID.captures("video link").is_none());
        let caps = RESPONDER_ID.captures("08:24:57 ID:od5C");
        assert_eq!(caps.and_then(|c| c.get(1)).map(|m| m.as_str()), Some("od5C"));
    }
}
