//! Body marker regions without headers.
//!
//! Every body region becomes one post. The header is synthesized from the
//! body's leading `N:` prefix, or from a short preview when unnumbered.

use tracing::debug;

use super::{PostBuilder, Strategy, StrategyResult};
use crate::dom::{self, Selection};
use crate::error::ExtractError;
use crate::header::sequence_number;
use crate::page::PageContext;
use crate::patterns::CONTENT_REGION_SELECTOR;
use crate::result::PatternKind;
use crate::text;

/// Body-only strategy.
pub struct BodyOnly;

impl Strategy for BodyOnly {
    fn kind(&self) -> PatternKind {
        PatternKind::BodyOnly
    }

    fn extract(&self, cx: &PageContext) -> StrategyResult {
        let options = cx.options;
        let scope = cx.page.select_first(CONTENT_REGION_SELECTOR).unwrap_or_else(|| cx.page.root());
        let bodies: Vec<Selection> =
            scope.select(&options.body_selector()).nodes().iter().map(|n| Selection::from(*n)).collect();

        if bodies.is_empty() {
            return Err(ExtractError::mismatch(PatternKind::BodyOnly, "no body markers"));
        }

        let mut posts = Vec::with_capacity(bodies.len());
        for body in &bodies {
            if text::is_noise_section(cx, &dom::joined_text(body, "")) {
                continue;
            }

            let body_text = text::body_text(cx, body);
            let header = match sequence_number(&body_text) {
                Some(n) => format!("{n}: {}", text::preview(&body_text, options.header_preview_chars)),
                None => text::preview(&body_text, options.untitled_preview_chars),
            };

            let mut post = PostBuilder::new(cx, header);
            post.add_text(body_text);
            post.add_images_from(body);
            if !post.is_empty() {
                posts.push(post.build());
            }
        }

        debug!(regions = bodies.len(), posts = posts.len(), "body-only pattern extracted");
        Ok(posts)
    }
}
