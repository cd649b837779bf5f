//! Error types for surface operations
//!
//! Validation happens once, at the orchestrator boundary. Everything below
//! it (buffer slicing after validation, range transformation) is total.

use thiserror::Error;

/// Errors raised by the surface orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Index or range outside `[0, len]`
    #[error("range error: index {index} with length {length} is outside buffer of length {len}")]
    Range {
        index: usize,
        length: usize,
        len: usize,
    },

    /// An edit arrived while a paste was waiting to be resolved
    #[error("a paste is still being resolved")]
    PasteInFlight,

    /// `resolve_paste` called with no paste pending
    #[error("no paste is pending")]
    NoPasteInFlight,

    /// Named key the surface does not handle
    #[error("unsupported key: {0}")]
    InvalidKey(String),

    /// Options that fail to deserialize or do not fit their content
    #[error("invalid surface options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;

impl SurfaceError {
    pub(crate) fn range(index: usize, length: usize, len: usize) -> Self {
        SurfaceError::Range { index, length, len }
    }
}
