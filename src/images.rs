//! Image reference extraction.
//!
//! Walks a markup subtree and returns its image references in a stable
//! order: local references first (embedded images, then image hyperlinks, in
//! document order), then references on the mirror host. No two returned
//! references share a [`DedupKey`](crate::identity::DedupKey). The bucket
//! order is what the download-time mirror selector pairs positionally.

use std::collections::HashSet;

use regex::Regex;

use crate::ad_filter::{self, AdCandidate, FilterMode};
use crate::dom::{self, NodeId, Selection};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::page::PageContext;
use crate::patterns::NOISE_CLASS;
use crate::result::{ImageMedium, ImageRef, ImageSource};
use crate::url_utils::{has_image_extension, host_matches, is_bare_url, mentions_image_extension};

/// Matcher for the designated mirror image host.
#[derive(Debug, Clone)]
pub struct MirrorHost {
    host: String,
    image_host: String,
    /// `<host>/<id>` or `<host>/<id>/embed`; the ID is the whole path.
    item_id: Regex,
    /// Mirror URLs left as bare text in a body.
    url_in_text: Regex,
}

impl MirrorHost {
    /// Build the matcher from configured hosts and token length.
    pub fn new(options: &Options) -> Result<Self> {
        let host = options.mirror_host.trim().to_ascii_lowercase();
        let image_host = options.mirror_image_host.trim().to_ascii_lowercase();
        if host.is_empty() || image_host.is_empty() {
            return Err(Error::InvalidOption("mirror hosts must not be empty".into()));
        }
        let min = options.min_identity_token_len.max(1);
        let escaped = regex::escape(&host);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| Error::InvalidOption(format!("mirror pattern: {e}")))
        };
        Ok(Self {
            item_id: compile(format!(
                r"(?i)(?:^|[/.]){escaped}/([A-Za-z0-9]{{{min},}})(?:/embed)?/?(?:[?#]|$)"
            ))?,
            url_in_text: compile(format!(r"(?i)https?://\S*{escaped}\S*"))?,
            host,
            image_host,
        })
    }

    /// Whether the URL is served by the mirror service.
    #[must_use]
    pub fn is_mirror(&self, url: &str) -> bool {
        host_matches(url, &self.host) || host_matches(url, &self.image_host)
    }

    /// Direct-image URL for a mirror item ID.
    #[must_use]
    pub fn direct_url(&self, item_id: &str) -> String {
        format!("https://{}/{}.jpg", self.image_host, item_id)
    }

    /// Translate an `<iframe>` embed URL into a direct-image URL.
    #[must_use]
    pub fn embed_image_url(&self, src: &str) -> Option<String> {
        if !host_matches(src, &self.host) || host_matches(src, &self.image_host) {
            return None;
        }
        self.item_id
            .captures(src)
            .and_then(|c| c.get(1))
            .map(|m| self.direct_url(m.as_str()))
    }

    /// Normalize a mirror hyperlink to something downloadable.
    ///
    /// Direct-host URLs and URLs with an image extension are kept; page URLs
    /// (`https://imgur.com/<id>`) are translated. Gallery, album and other
    /// nested paths are `None`.
    #[must_use]
    pub fn link_image_url(&self, url: &str) -> Option<String> {
        if host_matches(url, &self.image_host) || mentions_image_extension(url) {
            return Some(url.to_string());
        }
        self.embed_image_url(url)
    }

    /// Remove bare mirror URLs from text.
    #[must_use]
    pub fn strip_urls(&self, text: &str) -> String {
        self.url_in_text.replace_all(text, "").into_owned()
    }
}

struct Candidate {
    medium: ImageMedium,
    url: String,
    node: NodeId,
}

/// Collects image references from subtrees of one page.
pub struct ImageRefExtractor<'c, 'p> {
    cx: &'c PageContext<'p>,
    mode: FilterMode,
    excluded: HashSet<NodeId>,
}

impl<'c, 'p> ImageRefExtractor<'c, 'p> {
    /// Extractor with the standard ad-filter thresholds.
    #[must_use]
    pub fn new(cx: &'c PageContext<'p>) -> Self {
        Self {
            cx,
            mode: FilterMode::Standard,
            excluded: HashSet::new(),
        }
    }

    /// Use the relaxed whole-page thresholds.
    #[must_use]
    pub fn relaxed(mut self) -> Self {
        self.mode = FilterMode::Relaxed;
        self
    }

    /// Ignore anything inside the given container nodes.
    #[must_use]
    pub fn excluding(mut self, containers: HashSet<NodeId>) -> Self {
        self.excluded = containers;
        self
    }

    /// Ordered, deduplicated image references of `subtree`.
    #[must_use]
    pub fn extract(&self, subtree: &Selection) -> Vec<ImageRef> {
        let mut local = Vec::new();
        let mut mirror = Vec::new();

        self.collect_embedded(subtree, &mut local, &mut mirror);
        self.collect_hyperlinks(subtree, &mut local, &mut mirror);
        self.collect_embeds(subtree, &mut mirror);

        let mut seen = HashSet::new();
        let mut refs = Vec::with_capacity(local.len() + mirror.len());
        let buckets = [(ImageSource::Local, local), (ImageSource::Mirror, mirror)];
        for (source, candidates) in buckets {
            for c in candidates {
                if seen.insert(self.cx.identity.key(&c.url)) {
                    refs.push(ImageRef {
                        medium: c.medium,
                        url: c.url,
                        source,
                        source_node: c.node,
                    });
                }
            }
        }
        refs
    }

    fn collect_embedded(&self, subtree: &Selection, local: &mut Vec<Candidate>, mirror: &mut Vec<Candidate>) {
        let options = self.cx.options;
        for img in dom::find_inclusive(subtree, "img") {
            let Some(node) = dom::node_id(&img) else { continue };
            if self.is_excluded(node) {
                continue;
            }
            let Some(url) = embedded_source(&img, options).and_then(|raw| self.cx.resolve(&raw)) else {
                continue;
            };

            let candidate = AdCandidate::from_element(&url, &img, self.cx.in_thread_body(node));
            if ad_filter::is_ad(&candidate, self.mode, options) {
                continue;
            }

            // A wrapping link to the full-size file wins over the thumbnail.
            let url = self.full_size_link(&img).unwrap_or(url);
            let candidate = Candidate { medium: ImageMedium::Embedded, url, node };
            if self.cx.mirror.is_mirror(&candidate.url) {
                mirror.push(candidate);
            } else {
                local.push(candidate);
            }
        }
    }

    fn collect_hyperlinks(&self, subtree: &Selection, local: &mut Vec<Candidate>, mirror: &mut Vec<Candidate>) {
        for a in dom::find_inclusive(subtree, "a") {
            let Some(node) = dom::node_id(&a) else { continue };
            if self.is_excluded(node) {
                continue;
            }
            let Some(url) = dom::attr(&a, "href").and_then(|raw| self.cx.resolve(&raw)) else {
                continue;
            };

            let on_mirror = self.cx.mirror.is_mirror(&url);
            let url = if on_mirror {
                match self.cx.mirror.link_image_url(&url) {
                    Some(direct) => direct,
                    None => continue,
                }
            } else if has_image_extension(&url) || self.on_image_host(&url) {
                url
            } else {
                continue;
            };

            // The wrapped <img> was already taken in the embedded pass.
            if a.select("img").exists() {
                continue;
            }
            if in_noise_container(&a) || ad_filter::is_ad_url(&url, self.cx.options) {
                continue;
            }

            let candidate = Candidate { medium: ImageMedium::Hyperlink, url, node };
            if on_mirror {
                mirror.push(candidate);
            } else if !is_bare_url(&dom::trimmed_text(&a)) {
                local.push(candidate);
            }
        }
    }

    fn collect_embeds(&self, subtree: &Selection, mirror: &mut Vec<Candidate>) {
        for iframe in dom::find_inclusive(subtree, "iframe") {
            let Some(node) = dom::node_id(&iframe) else { continue };
            if self.is_excluded(node) {
                continue;
            }
            let Some(url) = dom::attr(&iframe, "src")
                .and_then(|raw| self.cx.resolve(&raw))
                .and_then(|src| self.cx.mirror.embed_image_url(&src))
            else {
                continue;
            };
            mirror.push(Candidate { medium: ImageMedium::IframeEmbed, url, node });
        }
    }

    fn full_size_link(&self, img: &Selection) -> Option<String> {
        let link = dom::nearest_ancestor(img, "a")?;
        let url = dom::attr(&link, "href").and_then(|raw| self.cx.resolve(&raw))?;
        (mentions_image_extension(&url) && !ad_filter::is_ad_url(&url, self.cx.options)).then_some(url)
    }

    fn on_image_host(&self, url: &str) -> bool {
        self.cx.options.image_hosts.iter().any(|host| host_matches(url, host))
    }

    fn is_excluded(&self, node: NodeId) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        self.cx.page.node(node).is_some_and(|n| {
            dom::self_or_ancestor_matches(&n, |m| self.excluded.contains(&m.id))
        })
    }
}

/// First usable source attribute of an `<img>`, in lazy-load priority order.
/// Inline `data:` placeholders are skipped.
#[must_use]
pub fn embedded_source(img: &Selection, options: &Options) -> Option<String> {
    options
        .lazy_src_attributes
        .iter()
        .filter_map(|name| dom::attr(img, name))
        .find(|value| !value.to_ascii_lowercase().starts_with("data:"))
}

fn in_noise_container(a: &Selection) -> bool {
    let parent = a.parent();
    parent.exists() && NOISE_CLASS.is_match(&dom::class(&parent))
}
