//! Per-vertex frontier bookkeeping shared by every selector.
//!
//! [`FrontierState`] holds the three parallel arrays that drive Prim's
//! algorithm: the cheapest known edge into the tree (`key`), tree membership,
//! and the tree neighbour supplying that edge (`parent`). Selectors differ
//! only in how they search the keys and partition relaxation; the state
//! transitions themselves live here.

use std::cmp::Ordering;

use crate::graph::{NO_EDGE, Weight, WeightedGraph, is_edge};

/// Vertex that seeds every run.
pub const START_VERTEX: usize = 0;

/// An unvisited vertex together with its frontier key.
///
/// Candidates order lexicographically by `(key, vertex)`, so the minimum is
/// the cheapest vertex with ties resolved towards the lowest index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// Frontier key of `vertex`.
    pub key: Weight,
    /// Vertex index.
    pub vertex: usize,
}

impl Candidate {
    /// Creates a candidate.
    #[must_use]
    pub const fn new(key: Weight, vertex: usize) -> Self {
        Self { key, vertex }
    }

    /// Returns `true` when no edge connects the vertex to the tree.
    ///
    /// Selecting such a vertex starts a new component of a spanning forest.
    #[must_use]
    pub const fn is_phantom(&self) -> bool {
        self.key >= NO_EDGE
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the lexicographic minimum of two optional candidates.
///
/// `None` is the identity, which makes this usable as the reduction operator
/// for thread-local, process-local and global minima alike.
///
/// # Examples
/// ```
/// use prima_core::{Candidate, combine};
///
/// let a = Some(Candidate::new(4, 2));
/// let b = Some(Candidate::new(4, 1));
/// assert_eq!(combine(a, b), b);
/// assert_eq!(combine(a, None), a);
/// ```
#[must_use]
pub fn combine(left: Option<Candidate>, right: Option<Candidate>) -> Option<Candidate> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (left, None) => left,
        (None, right) => right,
    }
}

/// Frontier arrays for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrontierState {
    key: Vec<Weight>,
    in_tree: Vec<bool>,
    parent: Vec<Option<usize>>,
}

impl FrontierState {
    /// Fresh state for `vertex_count` vertices with [`START_VERTEX`] keyed at
    /// zero and everything else at [`NO_EDGE`].
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        let mut key = vec![NO_EDGE; vertex_count];
        if let Some(start) = key.get_mut(START_VERTEX) {
            *start = 0;
        }
        Self {
            key,
            in_tree: vec![false; vertex_count],
            parent: vec![None; vertex_count],
        }
    }

    /// Number of vertices tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Returns `true` when no vertices are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Frontier keys, indexed by vertex.
    #[must_use]
    pub fn keys(&self) -> &[Weight] {
        &self.key
    }

    /// Tree membership, indexed by vertex.
    #[must_use]
    pub fn in_tree(&self) -> &[bool] {
        &self.in_tree
    }

    /// Parent assignments, indexed by vertex.
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parent
    }

    /// Consumes the state, yielding the parent array.
    #[must_use]
    pub fn into_parents(self) -> Vec<Option<usize>> {
        self.parent
    }

    /// The candidate for `vertex`, or `None` once it joined the tree.
    #[must_use]
    pub fn candidate(&self, vertex: usize) -> Option<Candidate> {
        (!self.in_tree[vertex]).then(|| Candidate::new(self.key[vertex], vertex))
    }

    /// Minimum candidate among `vertices`.
    pub fn local_minimum(&self, vertices: impl IntoIterator<Item = usize>) -> Option<Candidate> {
        vertices
            .into_iter()
            .fold(None, |best, vertex| combine(best, self.candidate(vertex)))
    }

    /// Marks `vertex` as part of the tree. Membership is never revoked.
    pub fn admit(&mut self, vertex: usize) {
        self.in_tree[vertex] = true;
    }

    /// Relaxes every edge leaving `from`.
    pub fn relax(&mut self, graph: &WeightedGraph, from: usize) {
        for (vertex, &weight) in graph.row(from).iter().enumerate() {
            self.relax_edge(vertex, weight, from);
        }
    }

    /// Offers `weight` as the cost of reaching `vertex` from `from`.
    ///
    /// Returns `true` when the key and parent were lowered.
    pub fn relax_edge(&mut self, vertex: usize, weight: Weight, from: usize) -> bool {
        relax_slot(
            self.in_tree[vertex],
            weight,
            from,
            &mut self.key[vertex],
            &mut self.parent[vertex],
        )
    }

    /// Splits the state so parallel relaxation can borrow each array
    /// independently.
    pub(crate) fn split_mut(&mut self) -> (&[bool], &mut [Weight], &mut [Option<usize>]) {
        (&self.in_tree, &mut self.key, &mut self.parent)
    }
}

/// Relaxation of a single vertex slot; the only place keys are lowered.
pub(crate) fn relax_slot(
    visited: bool,
    weight: Weight,
    from: usize,
    key: &mut Weight,
    parent: &mut Option<usize>,
) -> bool {
    if visited || !is_edge(weight) || weight >= *key {
        return false;
    }
    *key = weight;
    *parent = Some(from);
    true
}
