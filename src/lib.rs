//! # thread-harvest
//!
//! Post and image extraction for blog-aggregator pages that republish forum
//! threads.
//!
//! Given fully rendered markup and its base URL, the library picks one of
//! five structural interpretations of the page, reconstructs the thread's
//! posts (header, parsed header fields, body text, images), and resolves
//! image references so that no logical image is kept twice under different
//! rendition URLs. A separate download step pairs each post's site-hosted
//! images with their mirror-host copies and falls back to the mirror when a
//! fetch fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use thread_harvest::harvest;
//!
//! let html = r#"<html><head><title>スレ</title></head><body><article class="post">
//!   <div class="t_h">1: 名無しさん 25/03/23(日) 08:24:57 ID:od5CtiXq0</div>
//!   <div class="t_b">見て<img src="/imgs/9df4f32a.jpg"></div>
//! </article></body></html>"#;
//!
//! let result = harvest(html, "https://blog.example.jp/archives/1.html")?;
//! assert_eq!(result.posts.len(), 1);
//! assert_eq!(result.posts[0].images[0].url, "https://blog.example.jp/imgs/9df4f32a.jpg");
//! # Ok::<(), thread_harvest::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Pattern classification**: header/body markers, body-only markers,
//!   numbered block sequences, definition lists, or whole-page fallback
//! - **Image references**: lazy-load attributes, full-size links over
//!   thumbnails, image hyperlinks, mirror-host embeds
//! - **Ad filtering**: URL keywords, declared size, class/id keywords
//! - **Rendition dedup**: stable ID tokens collapse thumbnail, full-size and
//!   mirror copies of one image
//! - **Fallback recovery**: failed or image-less extractions retry with a
//!   whole-page scan

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// URL resolution and image URL checks.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Parsed page and per-page extraction context.
pub mod page;

/// Image identity resolution.
pub mod identity;

/// Advertisement and noise filtering.
pub mod ad_filter;

/// Image reference extraction.
pub mod images;

/// Post header parsing.
pub mod header;

/// Body text cleaning.
pub mod text;

/// Page structure classification.
pub mod classifier;

/// Extraction strategies and fallback orchestration.
pub mod extractor;

/// Download-time mirror selection.
pub mod download;

/// Page title and thread-creator metadata.
pub mod metadata;

/// Plain-text transcript rendering.
pub mod transcript;

// Public API - re-exports
pub use download::{DownloadReport, DownloadSession, DownloadedImage, Fetcher, SlotFailure};
pub use error::{Error, ExtractError, FetchError, Result};
pub use extract::Harvester;
pub use identity::{DedupKey, IdentityResolver};
pub use options::Options;
pub use page::{Page, PageContext};
pub use result::{Harvest, ImageMedium, ImageRef, ImageSource, ParsedHeader, PatternKind, Post};
pub use transcript::render_transcript;

/// Harvests one rendered page using default options.
///
/// # Arguments
///
/// * `html` - Fully rendered page markup
/// * `base_url` - Absolute URL the page was loaded from
///
/// # Returns
///
/// Returns the reconstructed posts and page metadata. Fails only when the
/// base URL is not an absolute http(s) URL; a page without recognizable
/// structure yields an empty post list.
pub fn harvest(html: &str, base_url: &str) -> Result<Harvest> {
    harvest_with_options(html, base_url, &Options::default())
}

/// Harvests one rendered page with custom options.
///
/// # Example
///
/// ```rust
/// use thread_harvest::{harvest_with_options, Options};
///
/// let options = Options {
///     body_marker_classes: vec!["res-body".to_string()],
///     ..Options::default()
/// };
/// let html = r#"<div class="res-body">1:本文<img src="https://x.jp/p/abcdefg.png"></div>"#;
/// let result = harvest_with_options(html, "https://x.jp/", &options)?;
/// assert_eq!(result.image_count(), 1);
/// # Ok::<(), thread_harvest::Error>(())
/// ```
pub fn harvest_with_options(html: &str, base_url: &str, options: &Options) -> Result<Harvest> {
    Harvester::new(options.clone())?.harvest(html, base_url)
}

/// Harvests page bytes, decoding them by their declared charset first.
///
/// `content_type` is the transport `Content-Type` value, when known.
///
/// # Example
///
/// ```rust
/// use thread_harvest::{harvest_bytes, Options};
///
/// let (bytes, _, _) = encoding_rs::SHIFT_JIS
///     .encode(r#"<meta charset="Shift_JIS"><div class="t_b">1:すごい</div>"#);
/// let result = harvest_bytes(&bytes, None, "https://x.jp/", &Options::default())?;
/// assert_eq!(result.posts[0].body_text, "1:すごい");
/// # Ok::<(), thread_harvest::Error>(())
/// ```
pub fn harvest_bytes(
    html: &[u8],
    content_type: Option<&str>,
    base_url: &str,
    options: &Options,
) -> Result<Harvest> {
    let html = encoding::transcode_to_utf8(html, content_type);
    harvest_with_options(&html, base_url, options)
}

/// Classifies a rendered page without extracting it.
pub fn classify(html: &str, base_url: &str, options: &Options) -> Result<PatternKind> {
    let page = Page::parse(html, base_url)?;
    Ok(classifier::classify(&page, options))
}
