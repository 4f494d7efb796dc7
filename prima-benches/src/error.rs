//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark inputs so
//! that setup functions can propagate failures with `?` instead of using
//! `.expect()`.

use prima_core::{GraphSpecError, LoadError, MstError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Random graph generation rejected its settings.
    #[error("graph generation failed: {0}")]
    Graph(#[from] GraphSpecError),
    /// MST computation failed.
    #[error("MST computation failed: {0}")]
    Mst(#[from] MstError),
    /// A fixture could not be encoded.
    #[error("fixture encoding failed: {0}")]
    Encode(#[from] std::io::Error),
    /// A fixture could not be read back.
    #[error("fixture load failed: {0}")]
    Load(#[from] LoadError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
