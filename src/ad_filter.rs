//! Advertisement and noise filtering for image references.
//!
//! The filter is a pure function of the candidate's URL, declared size and
//! class/id attributes plus the thread-body context flag. Rules are evaluated
//! in order and the first that matches decides.

use crate::dom::{self, Selection};
use crate::options::Options;
use crate::patterns::AD_CLASS;

/// Threshold regime for the size rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// 30px inside a post body, 50px elsewhere.
    Standard,
    /// Whole-page fallback pass: a single, smaller threshold.
    Relaxed,
}

/// Everything the filter looks at for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdCandidate {
    /// Resolved image URL (empty when no source attribute was usable).
    pub url: String,
    /// Declared `width` attribute, raw.
    pub width: Option<String>,
    /// Declared `height` attribute, raw.
    pub height: Option<String>,
    /// `class` attribute.
    pub class: String,
    /// `id` attribute.
    pub id: String,
    /// Whether the node sits inside a post body region.
    pub thread_body: bool,
}

impl AdCandidate {
    /// Candidate built from an `<img>` element's attributes.
    #[must_use]
    pub fn from_element(url: &str, img: &Selection, thread_body: bool) -> Self {
        Self {
            url: url.to_string(),
            width: dom::attr(img, "width"),
            height: dom::attr(img, "height"),
            class: dom::class(img),
            id: dom::id(img),
            thread_body,
        }
    }
}

/// Parse a declared dimension such as `"120"` or `"120px"`.
#[must_use]
pub fn parse_dimension(raw: &str) -> Option<u32> {
    raw.trim().trim_end_matches("px").trim().parse().ok()
}

/// Whether the URL alone marks the image as an advertisement.
#[must_use]
pub fn is_ad_url(url: &str, options: &Options) -> bool {
    let lower = url.to_lowercase();
    options.ad_url_keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Whether the declared size is below the threshold for this context.
///
/// Only applies when both dimensions are declared and parseable.
#[must_use]
pub fn is_too_small(candidate: &AdCandidate, mode: FilterMode, options: &Options) -> bool {
    let (Some(w), Some(h)) = (
        candidate.width.as_deref().and_then(parse_dimension),
        candidate.height.as_deref().and_then(parse_dimension),
    ) else {
        return false;
    };

    let min = match mode {
        FilterMode::Standard => options.min_size(candidate.thread_body),
        FilterMode::Relaxed => options.relaxed_min_size,
    };
    w < min || h < min
}

/// Classify a candidate as advertisement/noise (`true`) or content (`false`).
#[must_use]
pub fn is_ad(candidate: &AdCandidate, mode: FilterMode, options: &Options) -> bool {
    if candidate.url.trim().is_empty() {
        return true;
    }

    // URL keywords reject even inside a post body.
    if is_ad_url(&candidate.url, options) {
        return true;
    }

    if is_too_small(candidate, mode, options) {
        return true;
    }

    AD_CLASS.is_match(&candidate.class) || AD_CLASS.is_match(&candidate.id)
}
