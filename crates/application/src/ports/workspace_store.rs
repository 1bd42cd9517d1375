//! Persistence gateway port
//!
//! Collections and the environment live in two independent documents.
//! Each save replaces the whole document.

use std::fmt;
use std::future::Future;

use postbox_domain::{Collection, Environment};

use super::FileSystemError;

/// The two persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    /// The array of collections with their requests.
    Collections,
    /// The array of environment variables.
    Environment,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collections => f.write_str("collections"),
            Self::Environment => f.write_str("environment"),
        }
    }
}

/// Errors raised while reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document could not be read or written.
    #[error("{document} document I/O failed: {source}")]
    Io {
        /// Which document.
        document: Document,
        /// Underlying failure.
        #[source]
        source: FileSystemError,
    },

    /// The document could not be encoded or decoded.
    #[error("{document} document is not valid: {message}")]
    Serialization {
        /// Which document.
        document: Document,
        /// Parser or encoder message.
        message: String,
    },
}

/// Port for loading and saving the workspace documents.
pub trait WorkspaceStore: Send + Sync {
    /// Loads every collection. A document that does not exist yet loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    fn load_collections(&self) -> impl Future<Output = Result<Vec<Collection>, StoreError>> + Send;

    /// Replaces the collections document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    fn save_collections(
        &self,
        collections: &[Collection],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads the environment. A document that does not exist yet loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    fn load_environment(&self) -> impl Future<Output = Result<Environment, StoreError>> + Send;

    /// Replaces the environment document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    fn save_environment(
        &self,
        environment: &Environment,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
