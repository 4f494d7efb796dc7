//! Property-based tests for the Prim selectors.
//!
//! Checks every selector against the sequential reference, checks the
//! sequential result against an independent Kruskal oracle and structural
//! invariants, and re-runs the thread-backed selectors to catch
//! non-determinism.

mod concurrency;
mod equivalence;
mod oracle;
mod strategies;
mod structural;
mod types;
