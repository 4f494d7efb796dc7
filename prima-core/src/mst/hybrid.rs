//! Hybrid selector: a thread pool inside every distributed rank.
//!
//! The frontier arrays are viewed as rows of `size` slots; slot `rank` of
//! each row is the vertex this rank owns. Both the search and the relaxation
//! walk those rows in parallel, so a rank only ever reads or writes the keys
//! of its own stride. Keys outside the stride go stale, which is harmless
//! because no search reads them. Parent assignments are merged across ranks
//! once the loop ends.

use std::num::NonZeroUsize;

use rayon::{ThreadPool, prelude::*};
use tracing::{debug, instrument};

use super::{
    MstOutcome, Parallelism, Selector,
    comm::{ChannelCluster, Communicator, Stride},
    grow_tree,
    shared::build_pool,
};
use crate::{
    error::MstError,
    frontier::{Candidate, FrontierState, combine, relax_slot},
    graph::WeightedGraph,
};

struct Hybrid<'c, C> {
    comm: &'c C,
    stride: Stride,
    pool: ThreadPool,
}

impl<C: Communicator> Selector for Hybrid<'_, C> {
    fn select(&self, frontier: &FrontierState) -> Result<Option<Candidate>, MstError> {
        let (rank, size) = (self.stride.rank(), self.stride.size());
        let keys = frontier.keys();
        let in_tree = frontier.in_tree();
        let local = self.pool.install(|| {
            keys.par_chunks(size)
                .zip(in_tree.par_chunks(size))
                .enumerate()
                .filter_map(|(row, (keys, in_tree))| {
                    match (keys.get(rank), in_tree.get(rank)) {
                        (Some(&key), Some(&false)) => Some(Candidate::new(key, row * size + rank)),
                        _ => None,
                    }
                })
                .fold(|| None, |best, candidate| combine(best, Some(candidate)))
                .reduce(|| None, combine)
        });
        self.comm.all_reduce_min(local)
    }

    fn relax(&self, frontier: &mut FrontierState, graph: &WeightedGraph, vertex: usize) {
        let (rank, size) = (self.stride.rank(), self.stride.size());
        let row = graph.row(vertex);
        let (in_tree, keys, parents) = frontier.split_mut();
        self.pool.install(|| {
            keys.par_chunks_mut(size)
                .zip(parents.par_chunks_mut(size))
                .zip(in_tree.par_chunks(size))
                .zip(row.par_chunks(size))
                .for_each(|(((keys, parents), in_tree), weights)| {
                    if let (Some(key), Some(parent), Some(&visited), Some(&weight)) = (
                        keys.get_mut(rank),
                        parents.get_mut(rank),
                        in_tree.get(rank),
                        weights.get(rank),
                    ) {
                        relax_slot(visited, weight, vertex, key, parent);
                    }
                });
        });
    }
}

/// Runs one rank of the hybrid selector with a pool of `threads` workers.
///
/// Every rank returns the same merged outcome.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for an empty graph,
/// [`MstError::ThreadPool`] when the pool cannot be built, and any failure
/// raised by the communicator.
#[instrument(
    name = "mst.rank",
    err,
    skip(comm, graph, threads),
    fields(
        variant = "hybrid",
        rank = comm.rank(),
        size = comm.size(),
        threads = threads.get(),
    ),
)]
pub fn hybrid_rank<C: Communicator>(
    comm: &C,
    graph: Option<&WeightedGraph>,
    threads: NonZeroUsize,
) -> Result<MstOutcome, MstError> {
    let replica = comm.broadcast_graph(graph)?;
    debug!(vertices = replica.vertex_count(), "graph replicated");
    let selector = Hybrid {
        comm,
        stride: Stride::of(comm),
        pool: build_pool(threads, &format!("prima-r{}-worker", comm.rank()))?,
    };
    let mut outcome = grow_tree(&replica, &selector)?;

    let stride = selector.stride;
    let owned: Vec<_> = outcome
        .parents
        .iter()
        .enumerate()
        .map(|(vertex, parent)| parent.filter(|_| stride.owns(vertex)))
        .collect();
    outcome.parents = comm.merge_parents(owned)?;
    Ok(outcome)
}

/// Grows the tree with `parallelism.processes` in-process ranks of
/// `parallelism.threads` workers each.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for an empty graph and any rank failure.
#[instrument(
    name = "mst.hybrid",
    err,
    skip(graph, parallelism),
    fields(
        vertices = graph.vertex_count(),
        processes = parallelism.processes.get(),
        threads = parallelism.threads.get(),
    ),
)]
pub fn hybrid_prim(
    graph: &WeightedGraph,
    parallelism: Parallelism,
) -> Result<MstOutcome, MstError> {
    if graph.is_empty() {
        return Err(MstError::EmptyGraph);
    }
    ChannelCluster::new(parallelism.processes).run(|comm| {
        hybrid_rank(
            comm,
            comm.is_coordinator().then_some(graph),
            parallelism.threads,
        )
    })
}
