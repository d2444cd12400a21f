//! User-facing error types.

use thiserror::Error;

use crate::value::Kind;

/// An index outside `[0, len)` was passed to an indexed update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of bounds for length {len}")]
pub struct IndexError {
    /// The offending index.
    pub index: usize,
    /// The length of the sequence at the time of the call.
    pub len: usize,
}

/// Errors raised by draft operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    /// An indexed write missed the sequence bounds.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// An operation for one kind of draft was applied to another.
    #[error("expected a {expected} draft, found {found}")]
    KindMismatch {
        /// The kind the operation requires.
        expected: Kind,
        /// The kind of the draft it was applied to.
        found: Kind,
    },
}
