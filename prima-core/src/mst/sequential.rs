//! Single-threaded reference selector.

use tracing::instrument;

use super::{MstOutcome, Selector, grow_tree};
use crate::{
    error::MstError,
    frontier::{Candidate, FrontierState},
    graph::WeightedGraph,
};

struct Sequential;

impl Selector for Sequential {
    fn select(&self, frontier: &FrontierState) -> Result<Option<Candidate>, MstError> {
        Ok(frontier.local_minimum(0..frontier.len()))
    }

    fn relax(&self, frontier: &mut FrontierState, graph: &WeightedGraph, vertex: usize) {
        frontier.relax(graph, vertex);
    }
}

/// Grows the tree with a linear scan per iteration.
///
/// This is the oracle every other selector must match.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] when `graph` has no vertices.
///
/// # Examples
/// ```
/// use prima_core::{WeightedGraph, mst::sequential_prim};
///
/// let graph = WeightedGraph::from_rows(vec![
///     vec![0, 1, 4],
///     vec![1, 0, 2],
///     vec![4, 2, 0],
/// ])
/// .expect("square");
/// let outcome = sequential_prim(&graph).expect("non-empty graph");
/// assert_eq!(outcome.parents, vec![None, Some(0), Some(1)]);
/// ```
#[instrument(name = "mst.sequential", err, skip(graph), fields(vertices = graph.vertex_count()))]
pub fn sequential_prim(graph: &WeightedGraph) -> Result<MstOutcome, MstError> {
    grow_tree(graph, &Sequential)
}
