//! Flat block sequence split at numbered headers.
//!
//! Used by blogs that paste a thread as sibling `<div>`/`<p>`/`<blockquote>`
//! blocks directly under the article container.

use tracing::debug;

use super::{PostBuilder, Strategy, StrategyResult};
use crate::dom::{self, Selection};
use crate::error::ExtractError;
use crate::header::is_numbered_header;
use crate::page::{Page, PageContext};
use crate::patterns::SEQUENTIAL_CONTAINER_SELECTOR;
use crate::result::PatternKind;
use crate::text;

/// Block tags taking part in the sequence.
pub const BLOCK_TAGS: &[&str] = &["div", "p", "blockquote"];

/// Sequential block strategy.
pub struct SequentialBlock;

/// Direct block children of the page's sequential content container.
#[must_use]
pub fn sequence_blocks(page: &Page) -> Vec<Selection<'_>> {
    page.select_first(SEQUENTIAL_CONTAINER_SELECTOR)
        .map(|container| {
            dom::element_children(&container)
                .into_iter()
                .filter(|child| BLOCK_TAGS.contains(&dom::tag_name(child).as_str()))
                .collect()
        })
        .unwrap_or_default()
}

impl Strategy for SequentialBlock {
    fn kind(&self) -> PatternKind {
        PatternKind::SequentialBlock
    }

    fn extract(&self, cx: &PageContext) -> StrategyResult {
        let blocks = sequence_blocks(cx.page);
        if blocks.is_empty() {
            return Err(ExtractError::mismatch(PatternKind::SequentialBlock, "no content container blocks"));
        }

        let mut posts = Vec::new();
        let mut current: Option<PostBuilder> = None;

        for block in &blocks {
            let compact = dom::joined_text(block, "");
            if !compact.is_empty() && is_numbered_header(&compact) {
                posts.extend(current.take().map(PostBuilder::build));
                current = Some(PostBuilder::new(cx, compact));
                continue;
            }

            // Blocks before the first header belong to no post.
            let Some(post) = current.as_mut() else { continue };
            post.add_images_from(block);
            let body = text::body_text(cx, block);
            if body != post.header() {
                post.add_text(body);
            }
        }
        posts.extend(current.map(PostBuilder::build));

        if posts.is_empty() {
            return Err(ExtractError::mismatch(PatternKind::SequentialBlock, "no numbered header block"));
        }

        debug!(blocks = blocks.len(), posts = posts.len(), "sequential pattern extracted");
        Ok(posts)
    }
}
