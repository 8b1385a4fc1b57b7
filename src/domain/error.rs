//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodeId;

/// Domain errors represent violations of the tree invariants.
/// A failed operation never leaves a partially mutated tree behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(NodeId),

    #[error("cannot remove root directory")]
    CannotRemoveRoot,

    #[error("not a card deck: {0}")]
    NotADeck(NodeId),

    #[error("invalid name '{name}': {message}")]
    InvalidName { name: String, message: String },

    #[error("duplicate id in tree: {0}")]
    DuplicateId(NodeId),

    #[error("invalid file type: {0}")]
    InvalidFileType(String),
}

impl DomainError {
    /// True for the errors a caller provoked by passing a bad argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DomainError::CannotRemoveRoot
                | DomainError::InvalidName { .. }
                | DomainError::InvalidFileType(_)
                | DomainError::NotADeck(_)
        )
    }
}
