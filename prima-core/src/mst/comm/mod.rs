//! Message passing between distributed ranks.
//!
//! The distributed selectors never share frontier memory. They interact only
//! through the three collectives of [`Communicator`]: a one-off graph
//! broadcast, a per-iteration minimum reduction, and a final parent merge.

mod channel;
#[cfg(feature = "mpi")]
mod mpi;

use std::{borrow::Cow, iter::StepBy, ops::Range};

use crate::{error::MstError, frontier::Candidate, graph::WeightedGraph};

pub use self::channel::{ChannelCluster, ChannelCommunicator};
#[cfg(feature = "mpi")]
pub use self::mpi::MpiCommunicator;

/// Rank that performs all file I/O.
pub const COORDINATOR: usize = 0;

/// Collective operations available to a rank.
///
/// Every rank must call each collective the same number of times and in the
/// same order; the calls are rendezvous points.
pub trait Communicator {
    /// Zero-based index of this rank.
    fn rank(&self) -> usize;

    /// Number of ranks, at least one.
    fn size(&self) -> usize;

    /// Returns `true` on the rank that owns I/O.
    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Replicates the coordinator's graph on every rank.
    ///
    /// Only the coordinator's `graph` argument is read; the coordinator gets
    /// its own graph back borrowed.
    ///
    /// # Errors
    /// Returns [`MstError::MissingGraph`] when the coordinator passes `None`
    /// and a link error when a peer is gone.
    fn broadcast_graph<'g>(
        &self,
        graph: Option<&'g WeightedGraph>,
    ) -> Result<Cow<'g, WeightedGraph>, MstError>;

    /// Reduces every rank's local candidate to the global minimum, which all
    /// ranks receive.
    ///
    /// # Errors
    /// Returns a link error when a peer is gone.
    fn all_reduce_min(&self, local: Option<Candidate>) -> Result<Option<Candidate>, MstError>;

    /// Merges parent arrays slot by slot, keeping the smallest assigned
    /// parent, and hands the merged array to every rank.
    ///
    /// # Errors
    /// Returns a link error when a peer is gone.
    fn merge_parents(&self, local: Vec<Option<usize>>) -> Result<Vec<Option<usize>>, MstError>;
}

/// The vertices a rank searches: `rank, rank + size, rank + 2·size, …`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stride {
    rank: usize,
    size: usize,
}

impl Stride {
    /// Stride of `rank` among `size` ranks.
    ///
    /// # Panics
    /// Panics when `rank >= size`.
    #[must_use]
    pub fn new(rank: usize, size: usize) -> Self {
        assert!(rank < size, "rank {rank} outside a world of {size}");
        Self { rank, size }
    }

    /// Stride owned by `comm`.
    #[must_use]
    pub fn of(comm: &impl Communicator) -> Self {
        Self::new(comm.rank(), comm.size())
    }

    /// Offset of the first owned vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn rank(self) -> usize { self.rank }

    /// Distance between owned vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(self) -> usize { self.size }

    /// Owned vertices below `vertex_count`.
    ///
    /// # Examples
    /// ```
    /// use prima_core::mst::comm::Stride;
    ///
    /// let stride = Stride::new(1, 3);
    /// assert_eq!(stride.vertices(8).collect::<Vec<_>>(), vec![1, 4, 7]);
    /// ```
    #[must_use]
    pub fn vertices(self, vertex_count: usize) -> StepBy<Range<usize>> {
        (self.rank..vertex_count.max(self.rank)).step_by(self.size)
    }

    /// Returns `true` when `vertex` belongs to this stride.
    #[must_use]
    pub fn owns(self, vertex: usize) -> bool {
        vertex % self.size == self.rank
    }
}

/// Folds `incoming` into `merged`, keeping the smaller parent per slot.
pub(crate) fn merge_parent_slots(merged: &mut [Option<usize>], incoming: &[Option<usize>]) {
    for (slot, &other) in merged.iter_mut().zip(incoming) {
        *slot = match (*slot, other) {
            (Some(current), Some(other)) => Some(current.min(other)),
            (current, None) => current,
            (None, other) => other,
        };
    }
}
