//! Ad-hoc environment variables

mod variable;

pub use variable::{Environment, EnvironmentVariable};
