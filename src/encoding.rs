//! Character encoding detection and transcoding.
//!
//! Aggregator blogs of this kind still serve a fair share of Shift_JIS and
//! EUC-JP pages. Bytes are decoded to UTF-8 before parsing, using the first
//! charset found in: byte-order mark, transport `Content-Type`, `<meta charset>`,
//! `<meta http-equiv="Content-Type">`. UTF-8 otherwise.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

/// Bytes of the document head examined for meta declarations.
const HEAD_SCAN_BYTES: usize = 1024;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// `charset=` parameter of a transport `Content-Type` value.
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// Detect the character encoding of page bytes.
///
/// `content_type` is the transport header value reported by the rendering
/// collaborator, when it has one.
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let from_header = content_type.and_then(|ct| capture(&HEADER_CHARSET_RE, ct));
    if let Some(encoding) = from_header.as_deref().and_then(label_encoding) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(HEAD_SCAN_BYTES)]);
    [&*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE]
        .into_iter()
        .filter_map(|re| capture(re, &head))
        .find_map(|label| label_encoding(&label))
        .unwrap_or(UTF_8)
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

fn label_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decode page bytes to UTF-8.
///
/// Undecodable sequences become U+FFFD; this never fails.
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);
    if encoding == UTF_8 {
        return match String::from_utf8_lossy(html) {
            Cow::Borrowed(s) => s.trim_start_matches('\u{feff}').to_string(),
            Cow::Owned(s) => s,
        };
    }

    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        debug!(encoding = used.name(), "page bytes contained undecodable sequences");
    }
    decoded.into_owned()
}
