//! Post extraction strategies.
//!
//! # Module Structure
//!
//! - `state`: per-post accumulation with image dedup across body regions
//! - `standard`: paired header / body marker regions
//! - `body_only`: body marker regions with synthesized headers
//! - `sequential`: flat child sequence split at numbered headers
//! - `definition_list`: `<dt>` / `<dd>` pairs
//! - `whole_page`: every image in the content region as one post
//! - `pipeline`: classify, extract, validate and recover
//!
//! Strategies are selected through the closed [`PatternKind`] enum; there is
//! no lookup by name.

pub mod body_only;
pub mod definition_list;
pub mod pipeline;
pub mod sequential;
pub mod standard;
pub mod state;
pub mod whole_page;

use crate::error::ExtractError;
use crate::page::PageContext;
use crate::result::{PatternKind, Post};

pub use pipeline::{run_pipeline, PipelineOutcome};
pub use state::PostBuilder;

/// Result of one strategy run.
pub type StrategyResult = std::result::Result<Vec<Post>, ExtractError>;

/// One structural interpretation of a page.
pub trait Strategy {
    /// Pattern this strategy implements.
    fn kind(&self) -> PatternKind;

    /// Reconstruct the page's posts in page order.
    ///
    /// Returns [`ExtractError::StructuralMismatch`] when the page has none of
    /// the structure this strategy relies on.
    fn extract(&self, cx: &PageContext) -> StrategyResult;
}

static STANDARD: standard::Standard = standard::Standard;
static BODY_ONLY: body_only::BodyOnly = body_only::BodyOnly;
static SEQUENTIAL: sequential::SequentialBlock = sequential::SequentialBlock;
static DEFINITION_LIST: definition_list::DefinitionList = definition_list::DefinitionList;
static WHOLE_PAGE: whole_page::WholePageFallback = whole_page::WholePageFallback;

/// The strategy implementing `kind`.
#[must_use]
pub fn strategy_for(kind: PatternKind) -> &'static (dyn Strategy + Sync) {
    match kind {
        PatternKind::Standard => &STANDARD,
        PatternKind::BodyOnly => &BODY_ONLY,
        PatternKind::SequentialBlock => &SEQUENTIAL,
        PatternKind::DefinitionList => &DEFINITION_LIST,
        PatternKind::WholePageFallback => &WHOLE_PAGE,
    }
}

/// Run the strategy for `kind` on one page.
pub fn extract_with(kind: PatternKind, cx: &PageContext) -> StrategyResult {
    strategy_for(kind).extract(cx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_is_consistent() {
        for kind in PatternKind::ALL {
            assert_eq!(strategy_for(kind).kind(), kind);
        }
    }
}
