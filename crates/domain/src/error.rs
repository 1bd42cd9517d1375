//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A collection or request name is empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A collection with this name already exists.
    #[error("a collection named '{0}' already exists")]
    DuplicateCollection(String),

    /// A request with this name already exists in the collection.
    #[error("a request named '{request}' already exists in '{collection}'")]
    DuplicateRequest {
        /// Owning collection name.
        collection: String,
        /// Conflicting request name.
        request: String,
    },

    /// No collection carries this name.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// No request in the collection carries this name.
    #[error("request not found: {0}")]
    RequestNotFound(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
