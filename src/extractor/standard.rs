//! Paired header / body marker extraction.
//!
//! Headers (`.t_h`) and bodies (`.t_b`) normally alternate, but some sites
//! emit a body directly before the next header out of strict interleaving.
//! Such a body is deferred and attached to the header that precedes it.

use tracing::debug;

use super::{PostBuilder, Strategy, StrategyResult};
use crate::dom::{self, Selection};
use crate::error::ExtractError;
use crate::header::sequence_number;
use crate::options::Options;
use crate::page::PageContext;
use crate::patterns::STANDARD_CONTAINER_SELECTORS;
use crate::result::PatternKind;
use crate::text;

/// Header / body pair strategy.
pub struct Standard;

#[derive(Clone)]
enum Region<'a> {
    Header(Selection<'a>),
    Body(Selection<'a>),
}

impl Strategy for Standard {
    fn kind(&self) -> PatternKind {
        PatternKind::Standard
    }

    fn extract(&self, cx: &PageContext) -> StrategyResult {
        let options = cx.options;
        let selector = options.marker_selector();
        let root = cx.page.root();

        let targets = STANDARD_CONTAINER_SELECTORS
            .iter()
            .filter_map(|s| cx.page.select_first(s))
            .map(|container| marker_nodes(&container, &selector))
            .find(|targets| !targets.is_empty())
            .unwrap_or_else(|| marker_nodes(&root, &selector));

        if targets.is_empty() {
            return Err(ExtractError::mismatch(PatternKind::Standard, "no header or body markers"));
        }

        let mut posts = Vec::new();
        let mut current: Option<PostBuilder> = None;

        for region in pair_regions(classify_targets(targets, options)) {
            match region {
                Region::Header(header) => {
                    posts.extend(current.take().map(PostBuilder::build));
                    let header_raw = dom::joined_text(&header, " ");
                    if !header_raw.is_empty() {
                        current = Some(PostBuilder::new(cx, header_raw));
                    }
                }
                Region::Body(body) => {
                    let compact = dom::joined_text(&body, "");
                    if current.is_none() {
                        // A body with no header can still open a post if it is numbered.
                        let Some(n) = sequence_number(&compact) else { continue };
                        let preview = text::preview(&compact, options.untitled_preview_chars);
                        current = Some(PostBuilder::new(cx, format!("{n}: {preview}")));
                    }
                    if text::is_noise_section(cx, &compact) {
                        continue;
                    }
                    if let Some(post) = current.as_mut() {
                        post.add_region(&body);
                    }
                }
            }
        }
        posts.extend(current.map(PostBuilder::build));

        debug!(posts = posts.len(), "standard pattern extracted");
        Ok(posts)
    }
}

fn marker_nodes<'a>(scope: &Selection<'a>, selector: &str) -> Vec<Selection<'a>> {
    scope.select(selector).nodes().iter().map(|n| Selection::from(*n)).collect()
}

fn classify_targets<'a>(targets: Vec<Selection<'a>>, options: &Options) -> Vec<Region<'a>> {
    targets
        .into_iter()
        .map(|sel| {
            if dom::has_any_class(&sel, &options.header_marker_classes) {
                Region::Header(sel)
            } else {
                Region::Body(sel)
            }
        })
        .collect()
}

/// Greedy pairing with one-step lookahead: a body followed directly by a
/// header is held back and emitted just before that header.
fn pair_regions(targets: Vec<Region<'_>>) -> Vec<Region<'_>> {
    let mut ordered = Vec::with_capacity(targets.len());
    let mut pending = None;

    for (i, region) in targets.iter().enumerate() {
        match region {
            Region::Header(_) => {
                ordered.extend(pending.take());
                ordered.push(region.clone());
            }
            Region::Body(_) => {
                if matches!(targets.get(i + 1), Some(Region::Header(_))) {
                    ordered.extend(pending.replace(region.clone()));
                } else {
                    ordered.push(region.clone());
                }
            }
        }
    }
    ordered.extend(pending);
    ordered
}
