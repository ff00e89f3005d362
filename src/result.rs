//! Result types for harvest output.
//!
//! This module defines the structured posts produced by the extraction
//! strategies, the image references they carry, and the per-page summary
//! returned by [`crate::harvest`].

use std::fmt;

use chrono::NaiveDateTime;
use dom_query::NodeId;
use serde::Serialize;

/// Structural interpretation selected for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Paired header-marker / body-marker regions.
    Standard,
    /// Body-marker regions only.
    BodyOnly,
    /// Flat sequence of blocks under a content container, split at numbered headers.
    SequentialBlock,
    /// `<dl>` lists pairing `<dt>` headers with `<dd>` bodies.
    DefinitionList,
    /// No post boundaries: every image in the content region.
    WholePageFallback,
}

impl PatternKind {
    /// All variants in classifier priority order.
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Standard,
        PatternKind::BodyOnly,
        PatternKind::SequentialBlock,
        PatternKind::DefinitionList,
        PatternKind::WholePageFallback,
    ];

    /// Stable snake_case name (used in logs and JSON).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Standard => "standard",
            PatternKind::BodyOnly => "body_only",
            PatternKind::SequentialBlock => "sequential_block",
            PatternKind::DefinitionList => "definition_list",
            PatternKind::WholePageFallback => "whole_page_fallback",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an image reference appeared in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMedium {
    /// `<img>` element (possibly superseded by a wrapping full-size link).
    Embedded,
    /// `<a href>` pointing at an image.
    Hyperlink,
    /// `<iframe>` embed on the mirror host.
    IframeEmbed,
}

/// Which download bucket an image reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Hosted by the page's own site or a non-mirror host.
    Local,
    /// Hosted by the designated mirror host.
    Mirror,
}

/// A resolved image reference inside one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Markup form the reference came from.
    pub medium: ImageMedium,

    /// Absolute, resolved URL.
    pub url: String,

    /// Download bucket (local or mirror).
    pub source: ImageSource,

    /// Handle of the originating node in the page arena.
    ///
    /// Only meaningful together with the [`crate::Page`] it was extracted from.
    #[serde(skip)]
    pub source_node: NodeId,
}

/// Structured fields parsed from a post header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedHeader {
    /// Leading post number (`12:` → 12).
    pub sequence_number: Option<u32>,

    /// Responder identity following the `ID` marker.
    pub responder_id: Option<String>,

    /// Name between the post number and the date token.
    pub display_name: Option<String>,

    /// Posting date-time, when a date and time token is present.
    pub posted_at: Option<NaiveDateTime>,
}

impl ParsedHeader {
    /// True when no field could be parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence_number.is_none()
            && self.responder_id.is_none()
            && self.display_name.is_none()
            && self.posted_at.is_none()
    }
}

/// One reconstructed forum response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Header text as it appears on the page.
    pub header_raw: String,

    /// Fields parsed from `header_raw`.
    pub parsed_header: ParsedHeader,

    /// Body text with images and image links stripped.
    pub body_text: String,

    /// Images in position order: local references first, then mirror references.
    pub images: Vec<ImageRef>,
}

impl Post {
    /// References in the local bucket, in order.
    pub fn local_images(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter().filter(|i| i.source == ImageSource::Local)
    }

    /// References in the mirror bucket, in order.
    pub fn mirror_images(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter().filter(|i| i.source == ImageSource::Mirror)
    }
}

/// Result of harvesting one page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Harvest {
    /// Page `<title>` text (`"post"` when missing).
    pub title: String,

    /// Pattern chosen by the classifier.
    pub detected_pattern: Option<PatternKind>,

    /// Pattern whose result was kept (differs after a fallback recovery).
    pub applied_pattern: Option<PatternKind>,

    /// Reconstructed posts in page order.
    pub posts: Vec<Post>,

    /// Responder IDs judged to belong to the thread creator, sorted.
    pub thread_creator_ids: Vec<String>,
}

impl Harvest {
    /// Total number of image references across all posts.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.posts.iter().map(|p| p.images.len()).sum()
    }
}
