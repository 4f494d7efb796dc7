//! [`Communicator`] over an MPI world.
//!
//! Candidates travel as a single `u64` with the key in the high half and the
//! vertex in the low half, so MPI's built-in `MIN` reduction yields the
//! lexicographic minimum. `u64::MAX` encodes "no candidate" and also "no
//! parent" in the parent merge.

use std::borrow::Cow;

use mpi::{collective::SystemOperation, topology::SimpleCommunicator, traits::*};

use super::{COORDINATOR, Communicator};
use crate::{error::MstError, frontier::Candidate, graph::WeightedGraph};

const NONE: u64 = u64::MAX;
const VERTEX_MASK: u64 = 0xFFFF_FFFF;

/// Communicator backed by an MPI world.
///
/// MPI aborts the job on transport failures, so the collectives here only
/// fail on protocol errors.
pub struct MpiCommunicator {
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
}

impl MpiCommunicator {
    /// Wraps `world`, typically `universe.world()`.
    ///
    /// # Errors
    /// Returns [`MstError::UnexpectedMessage`] when MPI reports a negative
    /// rank and [`MstError::InvalidWorkerCount`] for an empty world.
    pub fn new(world: SimpleCommunicator) -> Result<Self, MstError> {
        let rank = usize::try_from(world.rank()).map_err(|_| MstError::UnexpectedMessage {
            rank: COORDINATOR,
            expected: "non-negative rank",
        })?;
        let size = usize::try_from(world.size())
            .ok()
            .filter(|&size| size > rank)
            .ok_or(MstError::InvalidWorkerCount {
                name: "MPI world size",
                got: 0,
            })?;
        Ok(Self { world, rank, size })
    }

    const fn protocol_error(&self, expected: &'static str) -> MstError {
        protocol_error(self.rank, expected)
    }
}

const fn protocol_error(rank: usize, expected: &'static str) -> MstError {
    MstError::UnexpectedMessage { rank, expected }
}

fn pack(candidate: Option<Candidate>, rank: usize) -> Result<u64, MstError> {
    candidate.map_or(Ok(NONE), |candidate| {
        let vertex =
            u32::try_from(candidate.vertex).map_err(|_| protocol_error(rank, "candidate"))?;
        Ok((u64::from(candidate.key) << 32) | u64::from(vertex))
    })
}

fn unpack(packed: u64, rank: usize) -> Result<Option<Candidate>, MstError> {
    if packed == NONE {
        return Ok(None);
    }
    let key = u32::try_from(packed >> 32).map_err(|_| protocol_error(rank, "candidate"))?;
    let vertex =
        usize::try_from(packed & VERTEX_MASK).map_err(|_| protocol_error(rank, "candidate"))?;
    Ok(Some(Candidate::new(key, vertex)))
}

impl Communicator for MpiCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_graph<'g>(
        &self,
        graph: Option<&'g WeightedGraph>,
    ) -> Result<Cow<'g, WeightedGraph>, MstError> {
        let root = self.world.process_at_rank(0);
        if self.is_coordinator() {
            // Peers learn about a missing graph from the header instead of
            // waiting for cells that never come.
            let mut header = match graph {
                Some(graph) => u64::try_from(graph.vertex_count())
                    .map_err(|_| self.protocol_error("graph"))?,
                None => NONE,
            };
            root.broadcast_into(&mut header);
            let graph = graph.ok_or(MstError::MissingGraph { rank: COORDINATOR })?;
            let mut cells = graph.as_slice().to_vec();
            root.broadcast_into(&mut cells[..]);
            return Ok(Cow::Borrowed(graph));
        }

        let mut header = 0_u64;
        root.broadcast_into(&mut header);
        if header == NONE {
            return Err(MstError::MissingGraph { rank: COORDINATOR });
        }
        let vertex_count = usize::try_from(header).map_err(|_| self.protocol_error("graph"))?;
        let cell_count = vertex_count
            .checked_mul(vertex_count)
            .ok_or_else(|| self.protocol_error("graph"))?;
        let mut cells = vec![0; cell_count];
        root.broadcast_into(&mut cells[..]);
        WeightedGraph::from_flat(vertex_count, cells)
            .map(Cow::Owned)
            .ok_or_else(|| self.protocol_error("graph"))
    }

    fn all_reduce_min(&self, local: Option<Candidate>) -> Result<Option<Candidate>, MstError> {
        let mut global = NONE;
        self.world
            .all_reduce_into(&pack(local, self.rank)?, &mut global, SystemOperation::min());
        unpack(global, self.rank)
    }

    fn merge_parents(&self, local: Vec<Option<usize>>) -> Result<Vec<Option<usize>>, MstError> {
        let packed = local
            .iter()
            .map(|parent| {
                parent.map_or(Ok(NONE), |parent| {
                    u64::try_from(parent).map_err(|_| self.protocol_error("parents"))
                })
            })
            .collect::<Result<Vec<u64>, MstError>>()?;
        let mut merged = vec![NONE; packed.len()];
        self.world
            .all_reduce_into(&packed[..], &mut merged[..], SystemOperation::min());
        merged
            .into_iter()
            .map(|parent| {
                if parent == NONE {
                    return Ok(None);
                }
                usize::try_from(parent)
                    .map(Some)
                    .map_err(|_| self.protocol_error("parents"))
            })
            .collect()
    }
}
