//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod file_system;
mod http_client;
mod workspace_store;

pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{
    CancellationReceiver, CancellationToken, HttpCall, HttpClient, HttpClientError, HttpReply,
};
pub use workspace_store::{Document, StoreError, WorkspaceStore};
