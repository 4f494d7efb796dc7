//! Distributed selector: replicated state agreeing through a reduction.
//!
//! Every rank holds the whole graph and its own frontier. A rank searches
//! only its [`Stride`], the local minima meet in
//! [`Communicator::all_reduce_min`], and every rank then applies the agreed
//! selection to its own copy. The copies evolve identically, so no frontier
//! state is ever exchanged.

use std::num::NonZeroUsize;

use tracing::{debug, instrument};

use super::{
    MstOutcome, Selector,
    comm::{ChannelCluster, Communicator, Stride},
    grow_tree,
};
use crate::{
    error::MstError,
    frontier::{Candidate, FrontierState},
    graph::WeightedGraph,
};

struct Distributed<'c, C> {
    comm: &'c C,
    stride: Stride,
}

impl<C: Communicator> Selector for Distributed<'_, C> {
    fn select(&self, frontier: &FrontierState) -> Result<Option<Candidate>, MstError> {
        let local = frontier.local_minimum(self.stride.vertices(frontier.len()));
        self.comm.all_reduce_min(local)
    }

    fn relax(&self, frontier: &mut FrontierState, graph: &WeightedGraph, vertex: usize) {
        frontier.relax(graph, vertex);
    }
}

/// Runs one rank of the distributed selector.
///
/// Only the coordinator's `graph` is read; it is broadcast before the loop.
/// Every rank returns the same outcome.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for an empty graph and any failure raised
/// by the communicator.
#[instrument(
    name = "mst.rank",
    err,
    skip(comm, graph),
    fields(variant = "distributed", rank = comm.rank(), size = comm.size()),
)]
pub fn distributed_rank<C: Communicator>(
    comm: &C,
    graph: Option<&WeightedGraph>,
) -> Result<MstOutcome, MstError> {
    let replica = comm.broadcast_graph(graph)?;
    debug!(vertices = replica.vertex_count(), "graph replicated");
    let selector = Distributed {
        comm,
        stride: Stride::of(comm),
    };
    grow_tree(&replica, &selector)
}

/// Grows the tree with `processes` in-process ranks.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] for an empty graph and any rank failure.
#[instrument(
    name = "mst.distributed",
    err,
    skip(graph, processes),
    fields(vertices = graph.vertex_count(), processes = processes.get()),
)]
pub fn distributed_prim(
    graph: &WeightedGraph,
    processes: NonZeroUsize,
) -> Result<MstOutcome, MstError> {
    if graph.is_empty() {
        return Err(MstError::EmptyGraph);
    }
    ChannelCluster::new(processes)
        .run(|comm| distributed_rank(comm, comm.is_coordinator().then_some(graph)))
}
