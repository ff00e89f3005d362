//! URL Utility Functions
//!
//! Resolution of raw attribute values against the page base URL, plus the
//! image-extension and host checks used throughout image extraction.

use url::Url;

use crate::patterns::IMAGE_EXTENSIONS;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string into a Url object.
///
/// # Returns
/// * `Some(Url)` if valid absolute URL, `None` otherwise
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    let (is_abs, parsed) = is_absolute_url(url_str);
    if is_abs {
        parsed
    } else {
        None
    }
}

/// Resolve a raw `src`/`href` value to an absolute http(s) URL.
///
/// Scheme-relative values (`//host/path`) get `https:`. Special schemes and
/// fragment-only values cannot name an image and resolve to `None`, as does
/// anything that fails to join against `base`.
#[must_use]
pub fn resolve(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    if ["data:", "javascript:", "mailto:", "tel:", "about:", "blob:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return parse_url(&format!("https://{rest}")).map(String::from);
    }

    if let Some(url) = parse_url(raw) {
        return Some(url.to_string());
    }

    let joined = base.join(raw).ok()?;
    let (is_abs, _) = is_absolute_url(joined.as_str());
    is_abs.then(|| joined.to_string())
}

/// URL with any query string (and fragment) removed.
#[must_use]
pub fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Whether the URL path ends with a recognized image extension.
#[must_use]
pub fn has_image_extension(url: &str) -> bool {
    let path = strip_query(url).to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Whether a recognized image extension appears anywhere in the URL.
///
/// Looser than [`has_image_extension`]; used where hosts append size or
/// format suffixes after the extension.
#[must_use]
pub fn mentions_image_extension(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Extension (with dot) to save the image under: the URL's own recognized
/// extension, or `.jpg`.
#[must_use]
pub fn image_extension(url: &str) -> &'static str {
    let filename = extract_filename(url).to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|ext| filename.ends_with(*ext))
        .copied()
        .unwrap_or(".jpg")
}

/// Whether the URL's host is `host` or one of its subdomains.
#[must_use]
pub fn host_matches(url: &str, host: &str) -> bool {
    let host = host.trim().trim_start_matches("www.").to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }
    parse_url(url)
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|h| h == host || h.ends_with(&format!(".{host}")))
}

/// Whether the text is itself a bare http(s) URL.
#[must_use]
pub fn is_bare_url(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("http://") || text.starts_with("https://")
}

/// Extract filename from a URL, stripping query parameters and fragments.
///
/// # Examples
/// ```
/// use thread_harvest::url_utils::extract_filename;
///
/// assert_eq!(extract_filename("https://example.com/images/photo.jpg"), "photo.jpg");
/// assert_eq!(extract_filename("https://example.com/images/photo.jpg?v=123"), "photo.jpg");
/// assert_eq!(extract_filename("/path/to/image.png#section"), "image.png");
/// assert_eq!(extract_filename("https://example.com/"), "");
/// ```
#[must_use]
pub fn extract_filename(url: &str) -> String {
    let filename = strip_query(url.trim())
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim();

    // Don't return empty-looking filenames
    if filename.is_empty() || filename == "." || filename == ".." {
        return String::new();
    }

    filename.to_string()
}
