//! Run orchestration: load, solve, store, record.
//!
//! Only the coordinator touches the filesystem. The clock covers the
//! computation and the result write; loading happens before it starts and
//! the log append after it stops.

use std::{num::NonZeroUsize, path::PathBuf, time::Instant};

use tracing::{info, instrument, warn};

use crate::{
    Result,
    builder::RunConfig,
    graph::WeightedGraph,
    io,
    mst::{self, MstOutcome, MstVariant, Parallelism, comm::Communicator},
    record::{ExecutionRecord, RecordLog},
};

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// The line appended to the execution log.
    pub record: ExecutionRecord,
    /// Where the result matrix was written.
    pub output: PathBuf,
    /// Tree edges in the result.
    pub edge_count: usize,
    /// Sum of the tree's edge weights.
    pub total_weight: u64,
    /// Selections that found no edge into the tree; non-zero when the graph
    /// is disconnected.
    pub phantom_selections: usize,
}

/// Executes configured runs.
///
/// # Examples
/// ```
/// use prima_core::{EngineBuilder, MstVariant};
///
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("input.csv"), "0,1,4\n1,0,2\n4,2,0\n")?;
///
/// let engine = EngineBuilder::new()
///     .with_variant(MstVariant::Distributed)
///     .with_processes(2)
///     .with_input(dir.path().join("input.csv"))
///     .with_output(dir.path().join("tree.csv"))
///     .with_log(dir.path().join("log_time.txt"))
///     .build()?;
/// let summary = engine.run()?;
/// assert_eq!(summary.total_weight, 3);
/// assert_eq!(summary.record.worker_count, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    config: RunConfig,
}

impl Engine {
    pub(crate) const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the configured variant in this process.
    ///
    /// Distributed and hybrid runs use in-process ranks connected by
    /// channels.
    ///
    /// # Errors
    /// Returns [`crate::RunError::Load`] before any computation, [`crate::RunError::Mst`]
    /// when the selector fails, and [`crate::RunError::Write`] when the result or
    /// the record cannot be written.
    #[instrument(
        name = "core.run",
        err,
        skip(self),
        fields(
            variant = %self.config.variant(),
            threads = self.config.parallelism().threads.get(),
            processes = self.config.parallelism().processes.get(),
        ),
    )]
    pub fn run(&self) -> Result<RunSummary> {
        let graph = io::load(self.config.input())?;
        let started = Instant::now();
        let outcome = mst::solve(&graph, self.config.variant(), self.config.parallelism())?;
        self.finish(&graph, &outcome, started, self.config.worker_count())
    }

    /// Runs this rank's share of the configured variant over `comm`.
    ///
    /// The coordinator loads, stores and records and returns the summary;
    /// every other rank returns `None`. Serial and shared runs are computed
    /// by the coordinator alone. The process count recorded is the size of
    /// `comm`, not the configured one.
    ///
    /// # Errors
    /// As for [`Engine::run`]. A coordinator that fails to load still takes
    /// part in the graph broadcast so the other ranks fail instead of
    /// waiting.
    #[instrument(
        name = "core.run",
        err,
        skip(self, comm),
        fields(
            variant = %self.config.variant(),
            rank = comm.rank(),
            size = comm.size(),
        ),
    )]
    pub fn run_as_rank<C: Communicator>(&self, comm: &C) -> Result<Option<RunSummary>> {
        let variant = self.config.variant();
        let coordinator = comm.is_coordinator();
        let graph = if coordinator {
            match io::load(self.config.input()) {
                Ok(graph) => Some(graph),
                Err(err) => {
                    if matches!(variant, MstVariant::Distributed | MstVariant::Hybrid) {
                        abandon_broadcast(comm);
                    }
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let started = Instant::now();
        let outcome = match (variant, graph.as_ref()) {
            (MstVariant::Distributed, replica) => mst::distributed_rank(comm, replica)?,
            #[cfg(feature = "threads")]
            (MstVariant::Hybrid, replica) => {
                mst::hybrid_rank(comm, replica, self.config.parallelism().threads)?
            }
            #[cfg(not(feature = "threads"))]
            (MstVariant::Hybrid, _) => {
                return Err(crate::error::MstError::BackendUnavailable { variant }.into());
            }
            (MstVariant::Serial | MstVariant::Shared, Some(loaded)) => {
                mst::solve(loaded, variant, self.config.parallelism())?
            }
            (MstVariant::Serial | MstVariant::Shared, None) => return Ok(None),
        };

        let Some(graph) = graph else {
            return Ok(None);
        };
        let processes = NonZeroUsize::new(comm.size()).unwrap_or(NonZeroUsize::MIN);
        let workers =
            Parallelism::new(self.config.parallelism().threads, processes).worker_count(variant);
        self.finish(&graph, &outcome, started, workers).map(Some)
    }

    fn finish(
        &self,
        graph: &WeightedGraph,
        outcome: &MstOutcome,
        started: Instant,
        worker_count: usize,
    ) -> Result<RunSummary> {
        let tree = outcome.to_matrix(graph);
        io::store(&tree, self.config.output())?;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        let record = ExecutionRecord {
            variant: self.config.variant(),
            vertex_count: graph.vertex_count(),
            worker_count,
            elapsed_seconds,
        };
        RecordLog::new(self.config.log()).append(&record)?;

        if outcome.phantom_selections > 0 {
            warn!(
                phantom_selections = outcome.phantom_selections,
                "graph is disconnected; result is a spanning forest"
            );
        }
        info!(
            vertices = record.vertex_count,
            workers = record.worker_count,
            elapsed_seconds,
            output = %self.config.output().display(),
            "run complete"
        );
        Ok(RunSummary {
            record,
            output: self.config.output().to_path_buf(),
            edge_count: outcome.edge_count(),
            total_weight: tree.total_weight(),
            phantom_selections: outcome.phantom_selections,
        })
    }
}

fn abandon_broadcast<C: Communicator>(comm: &C) {
    if let Err(err) = comm.broadcast_graph(None) {
        warn!(error = %err, "released peers after failed load");
    }
}
