//! Parsed page and per-page extraction context.
//!
//! A [`Page`] owns the parsed document arena. Image references point back
//! into it by [`NodeId`] only, so ancestry questions are answered by looking
//! the handle up here rather than by holding a node.

use url::Url;

use crate::dom::{self, Document, NodeId, NodeRef, Selection};
use crate::error::{Error, Result};
use crate::identity::IdentityResolver;
use crate::images::MirrorHost;
use crate::options::Options;
use crate::url_utils;

/// Fully rendered page markup plus its resolved base URL.
pub struct Page {
    document: Document,
    base_url: Url,
}

impl Page {
    /// Parse rendered HTML for the page at `base_url`.
    pub fn parse(html: &str, base_url: &str) -> Result<Self> {
        let base_url = url_utils::parse_url(base_url)
            .ok_or_else(|| Error::InvalidBaseUrl(base_url.to_string()))?;
        Ok(Self::from_document(dom::parse(html), base_url))
    }

    /// Wrap an already parsed document.
    #[must_use]
    pub fn from_document(document: Document, base_url: Url) -> Self {
        Self { document, base_url }
    }

    /// The parsed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Base URL used to resolve relative references.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whole-document selection (the `<html>` element).
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        self.document.select("html")
    }

    /// First element matching `selector` anywhere in the document.
    #[must_use]
    pub fn select_first(&self, selector: &str) -> Option<Selection<'_>> {
        let sel = self.root().select_single(selector);
        sel.exists().then_some(sel)
    }

    /// Look up a node handle produced from this page.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.document.tree.get(&id)
    }

    /// Whether the node or any of its ancestors carries one of `classes`.
    #[must_use]
    pub fn within_class(&self, id: NodeId, classes: &[String]) -> bool {
        self.node(id).is_some_and(|node| {
            dom::self_or_ancestor_matches(&node, |n| {
                n.is_element() && dom::has_any_class(&Selection::from(*n), classes)
            })
        })
    }
}

/// Everything a component needs while extracting one page.
///
/// Created per page and never shared across pages.
#[derive(Clone, Copy)]
pub struct PageContext<'p> {
    /// Page being extracted.
    pub page: &'p Page,
    /// Tuned constants.
    pub options: &'p Options,
    /// Identity resolver for extraction-time dedup.
    pub identity: &'p IdentityResolver,
    /// Mirror host matcher.
    pub mirror: &'p MirrorHost,
}

impl<'p> PageContext<'p> {
    /// Resolve a raw attribute value against the page base URL.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<String> {
        url_utils::resolve(raw, self.page.base_url())
    }

    /// Whether the node lies inside a post body region.
    #[must_use]
    pub fn in_thread_body(&self, id: NodeId) -> bool {
        self.page.within_class(id, &self.options.body_marker_classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_relative_base_url() {
        assert!(matches!(
            Page::parse("<p>x</p>", "/relative"),
            Err(Error::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn within_class_checks_ancestry_by_handle() {
        let page = Page::parse(
            r#"<div class="t_b"><p><img id="in" src="a.jpg"></p></div><img id="out" src="b.jpg">"#,
            "https://example.com/",
        )
        .unwrap_or_else(|e| panic!("{e}"));
        let classes = vec!["t_b".to_string()];

        let inside = dom::node_id(&page.document().select("#in"));
        let outside = dom::node_id(&page.document().select("#out"));
        assert!(inside.is_some_and(|id| page.within_class(id, &classes)));
        assert!(outside.is_some_and(|id| !page.within_class(id, &classes)));
    }
}
