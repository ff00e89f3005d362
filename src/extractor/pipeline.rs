//! Fallback orchestration.
//!
//! An explicit state machine: `Classify -> Extract -> Validate`, with a
//! detour through `Recover` when the chosen strategy fails or finds nothing
//! useful, ending in `Done`. No error leaves this module; the worst outcome
//! is an empty post list.

use tracing::{debug, warn};

use super::{extract_with, StrategyResult};
use crate::classifier::classify;
use crate::page::PageContext;
use crate::result::{PatternKind, Post};

/// Final result of the pipeline for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Pattern chosen by the classifier.
    pub detected: PatternKind,
    /// Pattern whose posts were kept, `None` when nothing could be extracted.
    pub applied: Option<PatternKind>,
    /// Posts in page order.
    pub posts: Vec<Post>,
}

enum Stage {
    Classify,
    Extract(PatternKind),
    Validate(PatternKind, StrategyResult),
    Recover {
        detected: PatternKind,
        /// Posts without images kept in case the fallback finds none either.
        original: Option<Vec<Post>>,
    },
    Done(PipelineOutcome),
}

fn image_count(posts: &[Post]) -> usize {
    posts.iter().map(|p| p.images.len()).sum()
}

/// Run classification, extraction and recovery for one page.
#[must_use]
pub fn run_pipeline(cx: &PageContext) -> PipelineOutcome {
    let mut stage = Stage::Classify;
    loop {
        stage = match stage {
            Stage::Classify => Stage::Extract(classify(cx.page, cx.options)),
            Stage::Extract(kind) => Stage::Validate(kind, extract_with(kind, cx)),
            Stage::Validate(kind, result) => validate(kind, result),
            Stage::Recover { detected, original } => recover(cx, detected, original),
            Stage::Done(outcome) => return outcome,
        };
    }
}

fn validate(kind: PatternKind, result: StrategyResult) -> Stage {
    let is_fallback = kind == PatternKind::WholePageFallback;
    match result {
        Err(err) if is_fallback => {
            warn!(error = %err, "whole-page fallback failed");
            Stage::Done(PipelineOutcome { detected: kind, applied: None, posts: Vec::new() })
        }
        Err(err) => {
            warn!(error = %err, "strategy failed, recovering");
            Stage::Recover { detected: kind, original: None }
        }
        Ok(posts) if posts.is_empty() && !is_fallback => {
            warn!(pattern = %kind, "strategy produced no posts, recovering");
            Stage::Recover { detected: kind, original: None }
        }
        Ok(posts) if image_count(&posts) == 0 && !is_fallback => {
            debug!(pattern = %kind, posts = posts.len(), "posts without images, trying whole-page scan");
            Stage::Recover { detected: kind, original: Some(posts) }
        }
        Ok(posts) => Stage::Done(PipelineOutcome { detected: kind, applied: Some(kind), posts }),
    }
}

fn recover(cx: &PageContext, detected: PatternKind, original: Option<Vec<Post>>) -> Stage {
    let fallback = extract_with(PatternKind::WholePageFallback, cx);
    let outcome = match (fallback, original) {
        (Ok(posts), Some(_)) if image_count(&posts) > 0 => applied_fallback(detected, posts),
        (_, Some(original)) => {
            debug!(pattern = %detected, "whole-page scan found no images, keeping original posts");
            PipelineOutcome { detected, applied: Some(detected), posts: original }
        }
        (Ok(posts), None) => applied_fallback(detected, posts),
        (Err(err), None) => {
            warn!(error = %err, "whole-page fallback failed");
            PipelineOutcome { detected, applied: None, posts: Vec::new() }
        }
    };
    Stage::Done(outcome)
}

fn applied_fallback(detected: PatternKind, posts: Vec<Post>) -> PipelineOutcome {
    warn!(pattern = %detected, images = image_count(&posts), "replaced by whole-page fallback");
    PipelineOutcome { detected, applied: Some(PatternKind::WholePageFallback), posts }
}
