//! Minimum spanning tree construction with Prim's algorithm.
//!
//! Four selectors share one growth loop ([`grow_tree`]): the sequential
//! reference, a Rayon-backed shared-memory selector, a distributed selector
//! that agrees on each step through a [`Communicator`](comm::Communicator)
//! reduction, and a hybrid that runs the shared-memory search inside each
//! distributed rank. Every selector breaks ties by `(key, vertex)`, so all of
//! them produce the same parent array for the same graph.

pub mod comm;
mod distributed;
#[cfg(feature = "threads")]
mod hybrid;
mod sequential;
#[cfg(feature = "threads")]
mod shared;

use std::{fmt, num::NonZeroUsize, str::FromStr};

use tracing::{trace, warn};

use crate::{
    error::MstError,
    frontier::{Candidate, FrontierState},
    graph::{NO_EDGE, WeightedGraph},
};

pub use self::{
    distributed::{distributed_prim, distributed_rank},
    sequential::sequential_prim,
};
#[cfg(feature = "threads")]
pub use self::{
    hybrid::{hybrid_prim, hybrid_rank},
    shared::shared_prim,
};

/// Execution strategy used to grow the tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum MstVariant {
    /// Single-threaded reference.
    Serial,
    /// Threads sharing one frontier.
    Shared,
    /// Ranks holding replicated state, agreeing through a reduction.
    Distributed,
    /// Ranks that each search their stride with a thread pool.
    Hybrid,
}

impl MstVariant {
    /// Every variant, in reporting order.
    pub const ALL: [Self; 4] = [Self::Serial, Self::Shared, Self::Distributed, Self::Hybrid];

    /// Label used in execution records and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Shared => "shared",
            Self::Distributed => "distributed",
            Self::Hybrid => "hybrid",
        }
    }

    /// Label written by the older C++ programs, still accepted when parsing
    /// their logs.
    #[must_use]
    pub const fn legacy_label(self) -> &'static str {
        match self {
            Self::Serial => "Serial",
            Self::Shared => "OpenMP",
            Self::Distributed => "MPI",
            Self::Hybrid => "MPI+OpenMP",
        }
    }
}

impl fmt::Display for MstVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label did not name a variant.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown MST variant `{0}` (expected serial, shared, distributed or hybrid)")]
pub struct UnknownVariant(pub String);

impl FromStr for MstVariant {
    type Err = UnknownVariant;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|variant| {
                variant.as_str().eq_ignore_ascii_case(label)
                    || variant.legacy_label().eq_ignore_ascii_case(label)
            })
            .ok_or_else(|| UnknownVariant(label.to_owned()))
    }
}

/// Worker counts available to the parallel variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Parallelism {
    /// Threads per process.
    pub threads: NonZeroUsize,
    /// Distributed ranks.
    pub processes: NonZeroUsize,
}

impl Default for Parallelism {
    fn default() -> Self {
        Self {
            threads: NonZeroUsize::MIN,
            processes: NonZeroUsize::MIN,
        }
    }
}

impl Parallelism {
    /// Creates a parallelism description.
    #[must_use]
    pub const fn new(threads: NonZeroUsize, processes: NonZeroUsize) -> Self {
        Self { threads, processes }
    }

    /// Worker count recorded for `variant`.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use prima_core::{MstVariant, Parallelism};
    ///
    /// let four = NonZeroUsize::new(4).expect("non-zero");
    /// let two = NonZeroUsize::new(2).expect("non-zero");
    /// let parallelism = Parallelism::new(four, two);
    /// assert_eq!(parallelism.worker_count(MstVariant::Serial), 1);
    /// assert_eq!(parallelism.worker_count(MstVariant::Shared), 4);
    /// assert_eq!(parallelism.worker_count(MstVariant::Distributed), 2);
    /// assert_eq!(parallelism.worker_count(MstVariant::Hybrid), 8);
    /// ```
    #[must_use]
    pub const fn worker_count(&self, variant: MstVariant) -> usize {
        match variant {
            MstVariant::Serial => 1,
            MstVariant::Shared => self.threads.get(),
            MstVariant::Distributed => self.processes.get(),
            MstVariant::Hybrid => self.processes.get().saturating_mul(self.threads.get()),
        }
    }
}

/// Parent array and selection trace produced by one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MstOutcome {
    /// Tree neighbour of each vertex; `None` for roots.
    pub parents: Vec<Option<usize>>,
    /// Vertices in the order they were selected.
    pub order: Vec<usize>,
    /// Vertices that joined without an edge into the tree, the final
    /// unselected vertex included; one less than the component count.
    pub phantom_selections: usize,
}

impl MstOutcome {
    /// Number of tree edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.iter().flatten().count()
    }

    /// Builds the symmetric result matrix from `graph`.
    ///
    /// Cells off the tree, including the diagonal, hold [`NO_EDGE`].
    #[must_use]
    pub fn to_matrix(&self, graph: &WeightedGraph) -> WeightedGraph {
        let mut matrix = WeightedGraph::filled(graph.vertex_count(), NO_EDGE);
        for (vertex, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = *parent {
                matrix.set(parent, vertex, graph.weight(parent, vertex));
                matrix.set(vertex, parent, graph.weight(vertex, parent));
            }
        }
        matrix
    }
}

/// Computes the tree of `graph` with `variant`.
///
/// The distributed and hybrid variants run in-process ranks connected by
/// channels.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for a graph without vertices and
/// [`MstError::BackendUnavailable`] when a thread-backed variant was not
/// compiled in, plus any failure raised by the selector.
pub fn solve(
    graph: &WeightedGraph,
    variant: MstVariant,
    parallelism: Parallelism,
) -> Result<MstOutcome, MstError> {
    match variant {
        MstVariant::Serial => sequential_prim(graph),
        #[cfg(feature = "threads")]
        MstVariant::Shared => shared_prim(graph, parallelism.threads),
        MstVariant::Distributed => distributed_prim(graph, parallelism.processes),
        #[cfg(feature = "threads")]
        MstVariant::Hybrid => hybrid_prim(graph, parallelism),
        #[cfg(not(feature = "threads"))]
        MstVariant::Shared | MstVariant::Hybrid => Err(MstError::BackendUnavailable { variant }),
    }
}

/// One way of finding the next vertex and updating the frontier.
pub(crate) trait Selector {
    /// Returns the agreed minimum unvisited candidate.
    fn select(&self, frontier: &FrontierState) -> Result<Option<Candidate>, MstError>;

    /// Relaxes the edges leaving `vertex` over the slots this selector owns.
    fn relax(&self, frontier: &mut FrontierState, graph: &WeightedGraph, vertex: usize);
}

/// Runs the `V − 1` selections of Prim's algorithm.
///
/// A vertex whose key is still [`NO_EDGE`] when selected keeps no parent and
/// roots a new component; the loop carries on so the result is a spanning
/// forest. The vertex left over after the last selection is checked the same
/// way, so `phantom_selections` is always one less than the component count.
pub(crate) fn grow_tree<S: Selector>(
    graph: &WeightedGraph,
    selector: &S,
) -> Result<MstOutcome, MstError> {
    let vertex_count = graph.vertex_count();
    if vertex_count == 0 {
        return Err(MstError::EmptyGraph);
    }

    let mut frontier = FrontierState::new(vertex_count);
    let mut order = Vec::with_capacity(vertex_count - 1);
    let mut phantom_selections = 0;
    for iteration in 0..vertex_count - 1 {
        let chosen = selector
            .select(&frontier)?
            .ok_or(MstError::FrontierExhausted { iteration })?;
        frontier.admit(chosen.vertex);
        if chosen.is_phantom() {
            phantom_selections += 1;
            warn!(
                iteration,
                vertex = chosen.vertex,
                "selected vertex has no edge into the tree"
            );
        } else {
            trace!(iteration, vertex = chosen.vertex, key = chosen.key, "vertex selected");
        }
        order.push(chosen.vertex);
        selector.relax(&mut frontier, graph, chosen.vertex);
    }

    // The last vertex is never selected; it is disconnected when its key is
    // still the sentinel.
    let last = vertex_count - 1;
    let remaining = selector
        .select(&frontier)?
        .ok_or(MstError::FrontierExhausted { iteration: last })?;
    if remaining.is_phantom() {
        phantom_selections += 1;
        warn!(
            vertex = remaining.vertex,
            "final vertex has no edge into the tree"
        );
    }

    Ok(MstOutcome {
        parents: frontier.into_parents(),
        order,
        phantom_selections,
    })
}

#[cfg(all(test, feature = "threads"))]
mod property;
