//! Error types for thread-harvest.
//!
//! Only [`Error`] crosses the public API boundary. [`ExtractError`] is consumed
//! by the fallback pipeline and [`FetchError`] by the mirror selector; neither
//! is ever surfaced to the caller of [`crate::harvest`].

use crate::result::PatternKind;

/// Error type for harvest operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A configured option cannot be used to build the matchers.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Result type alias for harvest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The strategy could not locate any post boundary it recognizes.
    #[error("{pattern} found no post boundaries: {reason}")]
    StructuralMismatch {
        /// Strategy that gave up.
        pattern: PatternKind,
        /// Short description of what was missing.
        reason: &'static str,
    },
}

impl ExtractError {
    pub(crate) fn mismatch(pattern: PatternKind, reason: &'static str) -> Self {
        Self::StructuralMismatch { pattern, reason }
    }
}

/// Failure reported by the download collaborator for one URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Http {
        /// Response status code.
        status: u16,
    },

    /// The request did not complete (DNS, connect, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),
}
