//! Per-post extraction state.
//!
//! A post can be assembled from several body regions. `PostBuilder` tracks
//! which image identities that post already holds so the same image is never
//! attached twice, whichever region it came from.

use std::collections::HashSet;

use crate::dom::Selection;
use crate::header::parse_header;
use crate::identity::DedupKey;
use crate::images::ImageRefExtractor;
use crate::page::PageContext;
use crate::result::{ImageRef, ImageSource, Post};
use crate::text;

/// Accumulates one post's body text and images.
pub struct PostBuilder<'c, 'p> {
    cx: &'c PageContext<'p>,
    header_raw: String,
    body_parts: Vec<String>,
    images: Vec<ImageRef>,
    seen: HashSet<DedupKey>,
}

impl<'c, 'p> PostBuilder<'c, 'p> {
    /// Start a post with the given raw header.
    #[must_use]
    pub fn new(cx: &'c PageContext<'p>, header_raw: impl Into<String>) -> Self {
        Self {
            cx,
            header_raw: header_raw.into(),
            body_parts: Vec::new(),
            images: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Raw header of the post being built.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header_raw
    }

    /// Take both the text and the images of a body region.
    pub fn add_region(&mut self, region: &Selection) {
        let body = text::body_text(self.cx, region);
        self.add_text(body);
        self.add_images_from(region);
    }

    /// Take only the images of a region.
    pub fn add_images_from(&mut self, region: &Selection) {
        let refs = ImageRefExtractor::new(self.cx).extract(region);
        self.add_images(refs);
    }

    /// Append a body text part (empty parts are ignored).
    pub fn add_text(&mut self, part: String) {
        if !part.is_empty() {
            self.body_parts.push(part);
        }
    }

    /// Append image references not yet held by this post.
    pub fn add_images(&mut self, refs: Vec<ImageRef>) {
        for image in refs {
            if self.seen.insert(self.cx.identity.key(&image.url)) {
                self.images.push(image);
            }
        }
    }

    /// Whether neither text nor images were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body_parts.is_empty() && self.images.is_empty()
    }

    /// Finish the post: local references first, then mirror references.
    #[must_use]
    pub fn build(self) -> Post {
        let (mut images, mirror): (Vec<_>, Vec<_>) =
            self.images.into_iter().partition(|i| i.source == ImageSource::Local);
        images.extend(mirror);

        Post {
            parsed_header: parse_header(&self.header_raw),
            header_raw: self.header_raw,
            body_text: self.body_parts.join("\n"),
            images,
        }
    }
}
