//! `<dl>` threads: the i-th `<dt>` is the header of the i-th `<dd>`.

use tracing::debug;

use super::{PostBuilder, Strategy, StrategyResult};
use crate::dom::{self, Selection};
use crate::error::ExtractError;
use crate::header::is_numbered_header;
use crate::page::{Page, PageContext};
use crate::result::PatternKind;
use crate::text;

/// Definition-list strategy.
pub struct DefinitionList;

/// Whether any `<dl>` on the page has a numbered `<dt>` child.
#[must_use]
pub fn has_numbered_terms(page: &Page) -> bool {
    lists(page).iter().any(|dl| {
        dom::children_by_tag(dl, "dt")
            .iter()
            .any(|dt| is_numbered_header(&dom::joined_text(dt, "")))
    })
}

fn lists(page: &Page) -> Vec<Selection<'_>> {
    page.root().select("dl").nodes().iter().map(|n| Selection::from(*n)).collect()
}

impl Strategy for DefinitionList {
    fn kind(&self) -> PatternKind {
        PatternKind::DefinitionList
    }

    fn extract(&self, cx: &PageContext) -> StrategyResult {
        let mut posts = Vec::new();

        for dl in lists(cx.page) {
            let terms = dom::children_by_tag(&dl, "dt");
            let definitions = dom::children_by_tag(&dl, "dd");

            for (i, dt) in terms.iter().enumerate() {
                let header = dom::joined_text(dt, "");
                if !is_numbered_header(&header) {
                    continue;
                }

                let mut post = PostBuilder::new(cx, header);
                if let Some(dd) = definitions.get(i) {
                    post.add_images_from(dd);
                    post.add_text(text::body_text(cx, dd));
                }
                posts.push(post.build());
            }
        }

        if posts.is_empty() {
            return Err(ExtractError::mismatch(PatternKind::DefinitionList, "no numbered <dt> terms"));
        }
        debug!(posts = posts.len(), "definition-list pattern extracted");
        Ok(posts)
    }
}
