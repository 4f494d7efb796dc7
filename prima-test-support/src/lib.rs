//! Shared test utilities used across prima crates.

pub mod env;
pub mod profile;
pub mod tracing;
