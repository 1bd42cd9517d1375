//! Postbox Application - Workspace state machine, use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for persistence, file access and HTTP)
//! - The navigation/selection model and the `Workspace` commit protocol
//! - The fire-request use case and `{{variable}}` resolution
//! - Application-level error handling

pub mod error;
pub mod execute_request;
pub mod navigation;
pub mod ports;
pub mod variable_resolver;
pub mod workspace;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequestError, ExecuteResult, FireRequest, prepare_call};
pub use navigation::{EditorAction, Focus, ListKind, Selection, display_list, editor_seed};
pub use ports::{
    CancellationReceiver, CancellationToken, Document, FileSystem, FileSystemError, HttpCall,
    HttpClient, HttpClientError, HttpReply, StoreError, WorkspaceStore,
};
pub use workspace::{CommitOutcome, DeleteOutcome, MutationReport, Workspace};
