//! Builder utilities for configuring engine runs.
//!
//! Exposes the run configuration surface and the validation applied before an
//! [`Engine`] is constructed.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{
    Result,
    engine::Engine,
    error::MstError,
    mst::{MstVariant, Parallelism},
};

/// Input read when no path is configured.
pub const DEFAULT_INPUT: &str = "input.csv";
/// Execution log appended to when no path is configured.
pub const DEFAULT_LOG: &str = "log_time.txt";

/// Output path used for `variant` when none is configured.
///
/// # Examples
/// ```
/// use prima_core::{MstVariant, default_output};
///
/// assert_eq!(default_output(MstVariant::Hybrid).to_str(), Some("hybrid_output.csv"));
/// ```
#[must_use]
pub fn default_output(variant: MstVariant) -> PathBuf {
    PathBuf::from(format!("{variant}_output.csv"))
}

/// Validated paths and worker counts for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunConfig {
    variant: MstVariant,
    parallelism: Parallelism,
    input: PathBuf,
    output: PathBuf,
    log: PathBuf,
}

impl RunConfig {
    /// Variant that grows the tree.
    #[must_use]
    pub const fn variant(&self) -> MstVariant {
        self.variant
    }

    /// Thread and process counts.
    #[must_use]
    pub const fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Graph file read by the coordinator.
    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Result matrix written by the coordinator.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Execution log appended to by the coordinator.
    #[must_use]
    pub fn log(&self) -> &Path {
        &self.log
    }

    /// Workers recorded in the execution log.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.parallelism.worker_count(self.variant)
    }
}

/// Configures and constructs [`Engine`] instances.
///
/// # Examples
/// ```
/// use prima_core::{EngineBuilder, MstVariant};
///
/// let engine = EngineBuilder::new()
///     .with_variant(MstVariant::Shared)
///     .with_threads(4)
///     .build()
///     .expect("configuration is valid");
/// let config = engine.config();
/// assert_eq!(config.worker_count(), 4);
/// assert_eq!(config.output().to_str(), Some("shared_output.csv"));
/// assert_eq!(config.log().to_str(), Some("log_time.txt"));
/// ```
#[derive(Clone, Debug)]
pub struct EngineBuilder {
    variant: MstVariant,
    threads: usize,
    processes: usize,
    input: PathBuf,
    output: Option<PathBuf>,
    log: PathBuf,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            variant: MstVariant::Serial,
            threads: 1,
            processes: 1,
            input: PathBuf::from(DEFAULT_INPUT),
            output: None,
            log: PathBuf::from(DEFAULT_LOG),
        }
    }
}

impl EngineBuilder {
    /// Creates a builder for a serial run over the default paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the variant.
    #[must_use]
    pub fn with_variant(mut self, variant: MstVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the threads per process. Zero is rejected by [`Self::build`].
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the number of ranks. Zero is rejected by [`Self::build`].
    #[must_use]
    pub fn with_processes(mut self, processes: usize) -> Self {
        self.processes = processes;
        self
    }

    /// Sets the graph file.
    #[must_use]
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Sets the result file. Defaults to [`default_output`] for the variant.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the execution log.
    #[must_use]
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = path.into();
        self
    }

    /// Validates the configuration and constructs an [`Engine`].
    ///
    /// # Errors
    /// Returns [`MstError::InvalidWorkerCount`] when the thread or process
    /// count is zero.
    ///
    /// # Examples
    /// ```
    /// use prima_core::EngineBuilder;
    ///
    /// let err = EngineBuilder::new().with_processes(0).build().expect_err("zero ranks");
    /// assert_eq!(err.detail_code(), "MST_INVALID_WORKER_COUNT");
    /// ```
    pub fn build(self) -> Result<Engine> {
        let parallelism = Parallelism::new(
            non_zero("threads", self.threads)?,
            non_zero("processes", self.processes)?,
        );
        let output = self
            .output
            .unwrap_or_else(|| default_output(self.variant));
        Ok(Engine::new(RunConfig {
            variant: self.variant,
            parallelism,
            input: self.input,
            output,
            log: self.log,
        }))
    }
}

fn non_zero(name: &'static str, got: usize) -> core::result::Result<NonZeroUsize, MstError> {
    NonZeroUsize::new(got).ok_or(MstError::InvalidWorkerCount { name, got })
}
