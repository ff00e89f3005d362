//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate. Every node handed out by this
//! module borrows the arena owned by a [`Document`]; nothing here extends the
//! lifetime of the parsed tree.

pub use dom_query::{Document, NodeId, NodeRef, Selection};

/// Tags whose text never counts as visible content.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// === Attribute Operations ===

/// Get a non-empty, trimmed attribute value.
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    sel.attr("class").map(|s| s.to_string()).unwrap_or_default()
}

/// Get element ID attribute (empty string if missing)
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> String {
    sel.attr("id").map(|s| s.to_string()).unwrap_or_default()
}

/// Whether a whitespace-separated class attribute contains one of `classes`.
#[must_use]
pub fn class_list_contains(class_attr: &str, classes: &[String]) -> bool {
    class_attr
        .split_whitespace()
        .any(|token| classes.iter().any(|c| c == token))
}

/// Whether the element carries one of `classes`.
#[must_use]
pub fn has_any_class(sel: &Selection, classes: &[String]) -> bool {
    class_list_contains(&class(sel), classes)
}

// === Tag/Node Information ===

/// Get tag name (lowercase, empty for non-elements)
#[must_use]
pub fn tag_name(sel: &Selection) -> String {
    sel.nodes().first().map(node_tag).unwrap_or_default()
}

/// Tag name of a raw node (lowercase, empty for non-elements).
#[must_use]
pub fn node_tag(node: &NodeRef) -> String {
    if !node.is_element() {
        return String::new();
    }
    node.node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Arena handle of the first node in the selection.
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

// === Tree Navigation ===

/// Direct element children, in document order.
#[must_use]
pub fn element_children<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes()
        .first()
        .map(|node| {
            node.children()
                .into_iter()
                .filter(NodeRef::is_element)
                .map(Selection::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Direct element children with the given tag.
#[must_use]
pub fn children_by_tag<'a>(sel: &Selection<'a>, tag: &str) -> Vec<Selection<'a>> {
    element_children(sel)
        .into_iter()
        .filter(|child| tag_name(child) == tag)
        .collect()
}

/// The element itself (if it has `tag`) followed by all descendants with `tag`.
///
/// `Selection::select` never matches the root, but a sequential block may
/// itself be an `<img>` or `<a>`.
#[must_use]
pub fn find_inclusive<'a>(sel: &Selection<'a>, tag: &str) -> Vec<Selection<'a>> {
    let mut found = Vec::new();
    if tag_name(sel) == tag {
        found.push(sel.clone());
    }
    found.extend(sel.select(tag).nodes().iter().map(|n| Selection::from(*n)));
    found
}

/// Nearest strict ancestor with the given tag.
#[must_use]
pub fn nearest_ancestor<'a>(sel: &Selection<'a>, tag: &str) -> Option<Selection<'a>> {
    let mut current = sel.nodes().first()?.parent();
    while let Some(node) = current {
        if node_tag(&node) == tag {
            return Some(Selection::from(node));
        }
        current = node.parent();
    }
    None
}

/// Whether `node` or one of its ancestors satisfies `pred`.
pub fn self_or_ancestor_matches(node: &NodeRef, pred: impl Fn(&NodeRef) -> bool) -> bool {
    let mut current = Some(*node);
    while let Some(n) = current {
        if pred(&n) {
            return true;
        }
        current = n.parent();
    }
    false
}

// === Text Content ===

/// Text with surrounding whitespace removed (bs4 `get_text(strip=True)` style
/// for prefix checks, where inner whitespace does not matter).
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// Visible text, each stripped text node joined by `separator`.
#[must_use]
pub fn joined_text(sel: &Selection, separator: &str) -> String {
    joined_text_filtered(sel, separator, |_| false)
}

/// Like [`joined_text`], skipping any element subtree for which `skip` is true.
/// The root itself is never skipped.
pub fn joined_text_filtered(
    sel: &Selection,
    separator: &str,
    skip: impl Fn(&NodeRef) -> bool,
) -> String {
    let mut parts = Vec::new();
    if let Some(root) = sel.nodes().first() {
        if root.is_text() {
            push_text(root, &mut parts);
        } else {
            collect_text(root, &skip, &mut parts);
        }
    }
    parts.join(separator)
}

fn collect_text(node: &NodeRef, skip: &impl Fn(&NodeRef) -> bool, parts: &mut Vec<String>) {
    for child in node.children() {
        if child.is_text() {
            push_text(&child, parts);
        } else if child.is_element() {
            if INVISIBLE_TAGS.contains(&node_tag(&child).as_str()) || skip(&child) {
                continue;
            }
            collect_text(&child, skip, parts);
        }
    }
}

fn push_text(node: &NodeRef, parts: &mut Vec<String>) {
    let text = node.text();
    let text = text.trim();
    if !text.is_empty() {
        parts.push(text.to_string());
    }
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
