//! Image identity resolution.
//!
//! Different renditions of one image (thumbnail vs. full size, site copy vs.
//! mirror copy) usually share a stable alphanumeric ID segment right before
//! the file extension: `/9df4f32a-s.jpg` and `/9df4f32a.jpg`, or
//! `https://i.imgur.com/nKqZYrk.jpg` and `/imgs/nKqZYrk-640x480.jpg`.
//! The resolver collapses such URLs onto one [`DedupKey`]. Two different
//! images sharing a coincidental token collide; that is accepted.

use std::fmt;

use regex::Regex;

use crate::error::{Error, Result};
use crate::url_utils::strip_query;

/// Canonical identity of a logical image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives [`DedupKey`]s from absolute image URLs.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    /// Token directly after a path separator, optional `-suffix`, then extension.
    anchored: Regex,
    /// Same token anywhere in the URL.
    loose: Regex,
}

impl IdentityResolver {
    /// Build a resolver requiring tokens of at least `min_token_len` characters.
    pub fn new(min_token_len: usize) -> Result<Self> {
        if min_token_len == 0 {
            return Err(Error::InvalidOption("identity token length must be at least 1".into()));
        }
        let token = format!(r"([a-zA-Z0-9]{{{min_token_len},}})(?:-[a-z0-9]+)?\.(?:jpg|jpeg|png|gif|webp)");
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| Error::InvalidOption(format!("identity pattern: {e}")))
        };
        Ok(Self {
            anchored: compile(format!("(?i)/{token}"))?,
            loose: compile(format!("(?i){token}"))?,
        })
    }

    /// Identity key for `url`: the lowercase ID token when one is found,
    /// otherwise the lowercase URL without its query string and fragment.
    #[must_use]
    pub fn key(&self, url: &str) -> DedupKey {
        let token = [&self.anchored, &self.loose]
            .iter()
            .find_map(|re| re.captures(url).and_then(|c| c.get(1)))
            .map(|m| m.as_str().to_lowercase());

        DedupKey(token.unwrap_or_else(|| strip_query(url).to_lowercase()))
    }

    /// Whether two URLs resolve to the same logical image.
    #[must_use]
    pub fn same_image(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        // The default token length always compiles.
        #[allow(clippy::expect_used)]
        Self::new(7).expect("default identity patterns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_and_full_size_share_key() {
        let resolver = IdentityResolver::default();
        assert!(resolver.same_image(
            "https://livedoor.blogimg.jp/x/imgs/9/d/9df4f32a-s.jpg",
            "https://livedoor.blogimg.jp/x/imgs/9/d/9df4f32a.jpg",
        ));
        assert_eq!(
            resolver.key("https://livedoor.blogimg.jp/x/imgs/9df4f32a-s.jpg").as_str(),
            "9df4f32a"
        );
    }

    #[test]
    fn mirror_and_local_copies_share_key() {
        let resolver = IdentityResolver::default();
        assert!(resolver.same_image(
            "https://i.imgur.com/nKqZYrk.jpg",
            "https://example.jp/wp-content/uploads/nKqZYrk-640x480.png",
        ));
    }

    #[test]
    fn key_is_lowercase() {
        let resolver = IdentityResolver::default();
        assert_eq!(resolver.key("https://i.imgur.com/NKQZyrk.JPG").as_str(), "nkqzyrk");
    }

    #[test]
    fn loose_match_without_separator() {
        let resolver = IdentityResolver::default();
        assert_eq!(
            resolver.key("https://example.com/photo_abcdefg1.jpg").as_str(),
            "abcdefg1"
        );
    }

    #[test]
    fn short_tokens_fall_back_to_url_without_query() {
        let resolver = IdentityResolver::default();
        assert_eq!(
            resolver.key("https://Example.com/img/a1.png?w=300").as_str(),
            "https://example.com/img/a1.png"
        );
    }

    #[test]
    fn custom_token_length() {
        let resolver = IdentityResolver::new(3).expect("valid token length");
        assert_eq!(resolver.key("https://example.com/abc.gif").as_str(), "abc");
        assert!(IdentityResolver::new(0).is_err());
    }

    #[test]
    fn fallback_key_drops_fragment_too() {
        let resolver = IdentityResolver::default();
        assert!(resolver.same_image("https://x.com/p/a1.png?w=1", "https://X.com/p/a1.png#top"));
    }
}
