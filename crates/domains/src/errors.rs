//! # DomainError
//!
//! Centralized error handling for the board domain.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

use crate::models::CommentId;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found (e.g., Article)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty comment, bad configuration value)
    #[error("validation error: {0}")]
    Validation(String),

    /// A comment points at a parent that is not part of the same batch
    #[error("comment {id} references missing parent {parent_id}")]
    DanglingParentReference { id: CommentId, parent_id: CommentId },

    /// Two records in one batch share an id
    #[error("duplicate comment id {0}")]
    DuplicateCommentId(CommentId),

    /// Comments whose parent chain loops back on itself
    #[error("cyclic parent chain through comments {0:?}")]
    CyclicParentChain(Vec<CommentId>),

    /// Infrastructure failure (e.g., data source unavailable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    /// True for errors caused by an inconsistent comment batch rather than
    /// a missing resource or infrastructure failure.
    pub fn is_malformed_batch(&self) -> bool {
        matches!(
            self,
            Self::DanglingParentReference { .. }
                | Self::DuplicateCommentId(_)
                | Self::CyclicParentChain(_)
        )
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, DomainError>;
