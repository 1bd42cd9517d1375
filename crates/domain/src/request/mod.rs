//! HTTP Request domain types

mod model;

pub use model::{Headers, Request};
