//! Persistence implementations for file-based storage.

mod file_system;
mod json_store;
mod settings_repository;

pub use file_system::*;
pub use json_store::*;
pub use settings_repository::*;
