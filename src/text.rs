//! Body text cleaning.

use crate::dom::{self, NodeRef, Selection};
use crate::page::PageContext;
use crate::patterns::{IMAGE_URL_IN_TEXT, NOISE_CLASS, SPACE_RUNS};
use crate::url_utils::is_absolute_url;

/// Tags dropped when their text carries a noise marker.
const NOISE_BLOCK_TAGS: &[&str] = &["div", "p", "span"];

/// Visible text of a body region with images, absolute links and noise
/// blocks removed.
#[must_use]
pub fn body_text(cx: &PageContext, region: &Selection) -> String {
    let raw = dom::joined_text_filtered(region, " ", |node| is_stripped(cx, node));
    clean_text(cx, &raw)
}

/// Strip bare image and mirror URLs from text and collapse the gaps.
#[must_use]
pub fn clean_text(cx: &PageContext, text: &str) -> String {
    let text = IMAGE_URL_IN_TEXT.replace_all(text, "");
    let text = cx.mirror.strip_urls(&text);
    SPACE_RUNS.replace_all(&text, " ").trim().to_string()
}

/// Whether a body region as a whole is a sponsor / RSS banner.
#[must_use]
pub fn is_noise_section(cx: &PageContext, text: &str) -> bool {
    cx.options.noise_section_markers.iter().any(|m| text.contains(m.as_str()))
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn is_stripped(cx: &PageContext, node: &NodeRef) -> bool {
    let tag = dom::node_tag(node);
    let sel = Selection::from(*node);
    match tag.as_str() {
        "img" | "iframe" => return true,
        "a" if dom::attr(&sel, "href").is_some_and(|h| is_absolute_url(&h).0) => return true,
        _ => {}
    }

    if NOISE_CLASS.is_match(&dom::class(&sel)) {
        return true;
    }

    NOISE_BLOCK_TAGS.contains(&tag.as_str()) && {
        let text = sel.text();
        cx.options.noise_text_markers.iter().any(|m| text.contains(m.as_str()))
    }
}
