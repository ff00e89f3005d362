//! Last-resort extraction ignoring post boundaries.
//!
//! Every image in the best-guess content region goes into one synthetic
//! post. Noise containers (RSS, related, sidebar, widget, sponsor, ad) are
//! skipped and the relaxed size threshold applies.

use std::collections::HashSet;

use tracing::debug;

use super::{PostBuilder, Strategy, StrategyResult};
use crate::dom::{self, NodeId, Selection};
use crate::images::ImageRefExtractor;
use crate::page::PageContext;
use crate::patterns::{CONTENT_REGION_SELECTOR, NOISE_CONTAINER_CLASS};
use crate::result::{ImageRef, PatternKind};

/// Whole-page fallback strategy.
pub struct WholePageFallback;

impl Strategy for WholePageFallback {
    fn kind(&self) -> PatternKind {
        PatternKind::WholePageFallback
    }

    fn extract(&self, cx: &PageContext) -> StrategyResult {
        let root = cx.page.root();
        let mut images = match cx.page.select_first(CONTENT_REGION_SELECTOR) {
            Some(region) => scan(cx, &region),
            None => Vec::new(),
        };
        if images.is_empty() {
            images = scan(cx, &root);
        }

        debug!(images = images.len(), "whole-page scan");
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let mut post = PostBuilder::new(cx, cx.options.synthetic_header.clone());
        post.add_images(images);
        Ok(vec![post.build()])
    }
}

fn scan(cx: &PageContext, region: &Selection) -> Vec<ImageRef> {
    ImageRefExtractor::new(cx)
        .relaxed()
        .excluding(noise_containers(region))
        .extract(region)
}

/// Handles of noise containers below `region`.
fn noise_containers(region: &Selection) -> HashSet<NodeId> {
    region
        .select("[class]")
        .nodes()
        .iter()
        .filter(|n| NOISE_CONTAINER_CLASS.is_match(&dom::class(&Selection::from(**n))))
        .map(|n| n.id)
        .collect()
}
