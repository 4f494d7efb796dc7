//! Shared-memory selector backed by a Rayon thread pool.
//!
//! The search folds thread-local minima over contiguous vertex blocks and
//! reduces them with [`combine`]. Relaxation zips the frontier arrays with the
//! selected row so each thread writes a disjoint block of slots.

use std::num::NonZeroUsize;

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::instrument;

use super::{MstOutcome, Selector, grow_tree};
use crate::{
    error::MstError,
    frontier::{Candidate, FrontierState, combine, relax_slot},
    graph::WeightedGraph,
};

/// Builds a pool of `threads` workers named `{prefix}-{index}`.
pub(super) fn build_pool(threads: NonZeroUsize, prefix: &str) -> Result<ThreadPool, MstError> {
    let prefix = prefix.to_owned();
    ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .thread_name(move |index| format!("{prefix}-{index}"))
        .build()
        .map_err(|error| MstError::ThreadPool {
            message: error.to_string(),
        })
}

struct Shared {
    pool: ThreadPool,
    block: usize,
}

impl Shared {
    fn new(threads: NonZeroUsize, vertex_count: usize) -> Result<Self, MstError> {
        Ok(Self {
            pool: build_pool(threads, "prima-worker")?,
            block: vertex_count.div_ceil(threads.get()).max(1),
        })
    }
}

impl Selector for Shared {
    fn select(&self, frontier: &FrontierState) -> Result<Option<Candidate>, MstError> {
        let keys = frontier.keys();
        let in_tree = frontier.in_tree();
        Ok(self.pool.install(|| {
            keys.par_iter()
                .zip(in_tree.par_iter())
                .enumerate()
                .with_min_len(self.block)
                .filter(|(_, (_, visited))| !**visited)
                .map(|(vertex, (&key, _))| Candidate::new(key, vertex))
                .fold(|| None, |best, candidate| combine(best, Some(candidate)))
                .reduce(|| None, combine)
        }))
    }

    fn relax(&self, frontier: &mut FrontierState, graph: &WeightedGraph, vertex: usize) {
        let row = graph.row(vertex);
        let (in_tree, keys, parents) = frontier.split_mut();
        self.pool.install(|| {
            keys.par_iter_mut()
                .zip(parents.par_iter_mut())
                .zip(in_tree.par_iter())
                .zip(row.par_iter())
                .with_min_len(self.block)
                .for_each(|(((key, parent), &visited), &weight)| {
                    relax_slot(visited, weight, vertex, key, parent);
                });
        });
    }
}

/// Grows the tree with `threads` workers sharing one frontier.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for an empty graph and
/// [`MstError::ThreadPool`] when the pool cannot be built.
#[instrument(
    name = "mst.shared",
    err,
    skip(graph, threads),
    fields(vertices = graph.vertex_count(), threads = threads.get()),
)]
pub fn shared_prim(graph: &WeightedGraph, threads: NonZeroUsize) -> Result<MstOutcome, MstError> {
    if graph.is_empty() {
        return Err(MstError::EmptyGraph);
    }
    let selector = Shared::new(threads, graph.vertex_count())?;
    grow_tree(graph, &selector)
}
