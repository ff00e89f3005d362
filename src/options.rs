//! Configuration options for thread harvesting.
//!
//! The `Options` struct carries every tuned constant used by the classifier,
//! the strategies, the ad filter and the mirror selector. The size thresholds
//! and the identity token length are empirically tuned; they are exposed here
//! so callers can adjust them without touching the algorithms.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration options for harvesting.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use thread_harvest::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     relaxed_min_size: 16,
///     mirror_host: "imgur.com".to_string(),
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Class names marking a post header region.
    ///
    /// Default: `["t_h"]`
    pub header_marker_classes: Vec<String>,

    /// Class names marking a post body region.
    ///
    /// Default: `["t_b"]`
    pub body_marker_classes: Vec<String>,

    /// Attributes checked, in order, for an embedded image's source.
    ///
    /// Default: `src`, `data-src`, `data-original`, `data-lazy`, `data-image`
    pub lazy_src_attributes: Vec<String>,

    /// Substrings that mark an image URL as an advertisement regardless of context.
    pub ad_url_keywords: Vec<String>,

    /// Minimum declared width/height for images inside a post body.
    ///
    /// Default: `30`
    pub thread_body_min_size: u32,

    /// Minimum declared width/height for images outside a post body.
    ///
    /// Default: `50`
    pub page_min_size: u32,

    /// Minimum declared width/height used by the whole-page fallback pass.
    ///
    /// Default: `20`
    pub relaxed_min_size: u32,

    /// Minimum length of the alphanumeric token used as an image identity.
    ///
    /// Default: `7`
    pub min_identity_token_len: usize,

    /// Host of the mirror image service (page and embed URLs).
    ///
    /// Default: `"imgur.com"`
    pub mirror_host: String,

    /// Host serving direct images for the mirror service.
    ///
    /// Default: `"i.imgur.com"`
    pub mirror_image_host: String,

    /// Additional image-hosting domains whose links count as image links.
    ///
    /// Default: empty
    pub image_hosts: Vec<String>,

    /// Text markers identifying a whole body region as a sponsor/RSS banner.
    pub noise_section_markers: Vec<String>,

    /// Text markers identifying noise blocks inside a body region.
    pub noise_text_markers: Vec<String>,

    /// Preview length (chars) of a header synthesized from a numbered body.
    ///
    /// Default: `100`
    pub header_preview_chars: usize,

    /// Preview length (chars) of a header synthesized from an unnumbered body.
    ///
    /// Default: `50`
    pub untitled_preview_chars: usize,

    /// Header of the single synthetic post emitted by the whole-page fallback.
    ///
    /// Default: `"投稿1"`
    pub synthetic_header: String,

    /// Prefix of the local filenames assigned at download time.
    ///
    /// Default: `"image"`
    pub filename_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            header_marker_classes: strings(&["t_h"]),
            body_marker_classes: strings(&["t_b"]),
            lazy_src_attributes: strings(&["src", "data-src", "data-original", "data-lazy", "data-image"]),
            ad_url_keywords: strings(&[
                "/ads/", "adservice", "doubleclick", "tracking", "banner", "/banners/",
                "affiliate", "googleads", "ad-", "-ad.", "/ad.", ".ad/", "adsense",
                "adsbygoogle",
            ]),
            thread_body_min_size: 30,
            page_min_size: 50,
            relaxed_min_size: 20,
            min_identity_token_len: 7,
            mirror_host: "imgur.com".to_string(),
            mirror_image_host: "i.imgur.com".to_string(),
            image_hosts: Vec::new(),
            noise_section_markers: strings(&[
                "記事の途中ですが", "グルメRSS", "大人含むRSS", "スポンサーリンク", "Sponsored Link",
            ]),
            noise_text_markers: strings(&["記事の途中ですが", "RSS", "関連記事", "スポンサー", "広告"]),
            header_preview_chars: 100,
            untitled_preview_chars: 50,
            synthetic_header: "投稿1".to_string(),
            filename_prefix: "image".to_string(),
        }
    }
}

impl Options {
    /// Reject configurations the matchers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.min_identity_token_len == 0 {
            return Err(Error::InvalidOption("min_identity_token_len must be at least 1".into()));
        }
        if self.mirror_host.trim().is_empty() || self.mirror_image_host.trim().is_empty() {
            return Err(Error::InvalidOption("mirror hosts must not be empty".into()));
        }
        if self.header_marker_classes.is_empty() || self.body_marker_classes.is_empty() {
            return Err(Error::InvalidOption("marker class lists must not be empty".into()));
        }
        let valid_class = |c: &String| {
            !c.is_empty() && c.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        };
        if !self.header_marker_classes.iter().chain(&self.body_marker_classes).all(valid_class) {
            return Err(Error::InvalidOption("marker classes must be plain class names".into()));
        }
        Ok(())
    }

    /// Minimum declared image size for the given context.
    #[must_use]
    pub fn min_size(&self, thread_body: bool) -> u32 {
        if thread_body {
            self.thread_body_min_size
        } else {
            self.page_min_size
        }
    }

    /// CSS selector matching any header marker.
    #[must_use]
    pub fn header_selector(&self) -> String {
        class_selector(&self.header_marker_classes)
    }

    /// CSS selector matching any body marker.
    #[must_use]
    pub fn body_selector(&self) -> String {
        class_selector(&self.body_marker_classes)
    }

    /// CSS selector matching header or body markers.
    #[must_use]
    pub fn marker_selector(&self) -> String {
        format!("{}, {}", self.header_selector(), self.body_selector())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn class_selector(classes: &[String]) -> String {
    classes.iter().map(|c| format!(".{c}")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_match_tuned_values() {
        let options = Options::default();
        assert_eq!(options.min_size(true), 30);
        assert_eq!(options.min_size(false), 50);
        assert_eq!(options.relaxed_min_size, 20);
        assert_eq!(options.min_identity_token_len, 7);
    }

    #[test]
    fn marker_selector_joins_both_lists() {
        let options = Options {
            header_marker_classes: vec!["t_h".into(), "res-head".into()],
            ..Options::default()
        };
        assert_eq!(options.marker_selector(), ".t_h, .res-head, .t_b");
    }

    #[test]
    fn validate_rejects_zero_token_length() {
        let options = Options {
            min_identity_token_len: 0,
            ..Options::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn validate_rejects_selector_injection() {
        let options = Options {
            body_marker_classes: vec!["t_b, div".into()],
            ..Options::default()
        };
        assert!(options.validate().is_err());
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"relaxed_min_size": 10}"#).expect("partial options parse");
        assert_eq!(options.relaxed_min_size, 10);
        assert_eq!(options.page_min_size, 50);
    }
}
