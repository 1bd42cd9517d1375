//! Deterministic JSON serialization for the Postbox documents.
//!
//! Keeps saved files stable between writes by:
//! - Sorting header keys alphabetically (via `BTreeMap` in domain types)
//! - Using 2-space indentation
//! - Adding a trailing newline

mod json;

pub use json::*;
