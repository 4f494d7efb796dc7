//! Benchmark support crate for prima.
//!
//! Provides seeded graph fixtures and parameter types used by the Criterion
//! benchmarks that compare the four Prim variants and the matrix file codec.

pub mod error;
pub mod fixture;
pub mod params;
