//! Postbox Domain - Core business types
//!
//! This crate defines the domain model for the Postbox terminal API client:
//! collections of saved requests, the ad-hoc environment, user settings and
//! the text protocol used to present an entity inside the single edit buffer.
//! All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod edit_buffer;
pub mod environment;
pub mod error;
pub mod request;
pub mod settings;

pub use collection::Collection;
pub use edit_buffer::{Decoded, RequestPayload};
pub use environment::{Environment, EnvironmentVariable};
pub use error::{DomainError, DomainResult};
pub use request::{Headers, Request};
pub use settings::UserSettings;
