//! Page structure classification.
//!
//! Picks exactly one [`PatternKind`] for any page. The checks run from the
//! most specific structure to the least; a page with none of the signals is
//! classified as [`PatternKind::WholePageFallback`].

use tracing::debug;

use crate::dom::{self, Selection};
use crate::extractor::definition_list::has_numbered_terms;
use crate::extractor::sequential::sequence_blocks;
use crate::header::is_numbered_header;
use crate::options::Options;
use crate::page::Page;
use crate::patterns::MAIN_ARTICLE_SELECTOR;
use crate::result::PatternKind;

/// Select the structural interpretation for `page`.
#[must_use]
pub fn classify(page: &Page, options: &Options) -> PatternKind {
    let kind = classify_inner(page, options);
    debug!(pattern = %kind, "page classified");
    kind
}

fn classify_inner(page: &Page, options: &Options) -> PatternKind {
    let main_article = page.select_first(MAIN_ARTICLE_SELECTOR);
    if let Some(kind) = main_article.and_then(|article| marker_pattern(&article, options)) {
        return kind;
    }

    if let Some(kind) = marker_pattern(&page.root(), options) {
        return kind;
    }

    if sequence_blocks(page)
        .iter()
        .any(|block| is_numbered_header(&dom::joined_text(block, "")))
    {
        return PatternKind::SequentialBlock;
    }

    if has_numbered_terms(page) {
        return PatternKind::DefinitionList;
    }

    PatternKind::WholePageFallback
}

/// Standard when both marker kinds are present, BodyOnly when only bodies are.
fn marker_pattern(scope: &Selection, options: &Options) -> Option<PatternKind> {
    let has_bodies = scope.select(&options.body_selector()).exists();
    if !has_bodies {
        return None;
    }
    if scope.select(&options.header_selector()).exists() {
        Some(PatternKind::Standard)
    } else {
        Some(PatternKind::BodyOnly)
    }
}
