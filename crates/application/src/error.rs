//! Application error types

use postbox_domain::DomainError;
use thiserror::Error;

/// Reasons a workspace operation refuses to change anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// The edit buffer does not have the shape the current selection expects.
    #[error("expected {expected}, buffer has {segments} line(s)")]
    MalformedBuffer {
        /// Segment count of the committed buffer.
        segments: usize,
        /// Human-readable description of the accepted shapes.
        expected: &'static str,
    },

    /// The action needs an active entity and none is selected.
    #[error("nothing selected")]
    NothingSelected,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
