//! In-process ranks connected by channels.
//!
//! Each rank runs on its own thread with its own copy of every piece of
//! state. Links form a star through the coordinator: one channel pair per
//! peer, so a rank that dies disconnects exactly one link and the
//! coordinator notices it on the next collective instead of blocking.

use std::{
    borrow::Cow,
    num::NonZeroUsize,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use tracing::{Span, debug, warn};

use super::{COORDINATOR, Communicator, merge_parent_slots};
use crate::{
    error::MstError,
    frontier::{Candidate, combine},
    graph::WeightedGraph,
};

#[derive(Debug)]
enum Message {
    Graph(WeightedGraph),
    Candidate(Option<Candidate>),
    Parents(Vec<Option<usize>>),
}

/// A value carried by one kind of [`Message`].
trait Payload: Clone + Sized {
    const KIND: &'static str;

    fn pack(self) -> Message;

    fn unpack(message: Message) -> Option<Self>;
}

impl Payload for WeightedGraph {
    const KIND: &'static str = "graph";

    fn pack(self) -> Message {
        Message::Graph(self)
    }

    fn unpack(message: Message) -> Option<Self> {
        match message {
            Message::Graph(graph) => Some(graph),
            _ => None,
        }
    }
}

impl Payload for Option<Candidate> {
    const KIND: &'static str = "candidate";

    fn pack(self) -> Message {
        Message::Candidate(self)
    }

    fn unpack(message: Message) -> Option<Self> {
        match message {
            Message::Candidate(candidate) => Some(candidate),
            _ => None,
        }
    }
}

impl Payload for Vec<Option<usize>> {
    const KIND: &'static str = "parents";

    fn pack(self) -> Message {
        Message::Parents(self)
    }

    fn unpack(message: Message) -> Option<Self> {
        match message {
            Message::Parents(parents) => Some(parents),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum Link {
    Coordinator {
        inbound: Vec<Receiver<Message>>,
        outbound: Vec<Sender<Message>>,
    },
    Peer {
        to_root: Sender<Message>,
        from_root: Receiver<Message>,
    },
}

/// One rank's endpoint in a [`ChannelCluster`].
#[derive(Debug)]
pub struct ChannelCommunicator {
    rank: usize,
    size: usize,
    link: Link,
}

impl ChannelCommunicator {
    fn send<P: Payload>(
        &self,
        sender: &Sender<Message>,
        peer: usize,
        value: P,
    ) -> Result<(), MstError> {
        sender.send(value.pack()).map_err(|_| MstError::PeerDisconnected {
            rank: self.rank,
            peer,
        })
    }

    fn receive<P: Payload>(
        &self,
        receiver: &Receiver<Message>,
        peer: usize,
    ) -> Result<P, MstError> {
        let message = receiver.recv().map_err(|_| MstError::PeerDisconnected {
            rank: self.rank,
            peer,
        })?;
        P::unpack(message).ok_or(MstError::UnexpectedMessage {
            rank: self.rank,
            expected: P::KIND,
        })
    }

    /// Sends `value` to every peer. Coordinator only.
    fn scatter<P: Payload>(
        &self,
        outbound: &[Sender<Message>],
        value: &P,
    ) -> Result<(), MstError> {
        for (offset, sender) in outbound.iter().enumerate() {
            self.send(sender, offset + 1, value.clone())?;
        }
        Ok(())
    }

    /// Folds every peer's value into `local` in rank order, then hands the
    /// result back to all of them.
    fn collective<P: Payload>(&self, local: P, fold: impl Fn(P, P) -> P) -> Result<P, MstError> {
        match &self.link {
            Link::Coordinator { inbound, outbound } => {
                let mut acc = local;
                for (offset, receiver) in inbound.iter().enumerate() {
                    acc = fold(acc, self.receive(receiver, offset + 1)?);
                }
                self.scatter(outbound, &acc)?;
                Ok(acc)
            }
            Link::Peer { to_root, from_root } => {
                self.send(to_root, COORDINATOR, local)?;
                self.receive(from_root, COORDINATOR)
            }
        }
    }
}

impl Communicator for ChannelCommunicator {
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
        match &self.link {
            Link::Coordinator { outbound, .. } => {
                let graph = graph.ok_or(MstError::MissingGraph { rank: self.rank })?;
                self.scatter(outbound, graph)?;
                Ok(Cow::Borrowed(graph))
            }
            Link::Peer { from_root, .. } => self.receive(from_root, COORDINATOR).map(Cow::Owned),
        }
    }

    fn all_reduce_min(&self, local: Option<Candidate>) -> Result<Option<Candidate>, MstError> {
        self.collective(local, combine)
    }

    fn merge_parents(&self, local: Vec<Option<usize>>) -> Result<Vec<Option<usize>>, MstError> {
        self.collective(local, |mut merged, incoming| {
            merge_parent_slots(&mut merged, &incoming);
            merged
        })
    }
}

/// A fixed number of in-process ranks.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use prima_core::{Candidate, mst::comm::{ChannelCluster, Communicator}};
///
/// let cluster = ChannelCluster::new(NonZeroUsize::new(3).expect("non-zero"));
/// let agreed = cluster
///     .run(|comm| {
///         let key = 10 - u32::try_from(comm.rank()).expect("small rank");
///         comm.all_reduce_min(Some(Candidate::new(key, comm.rank())))
///     })
///     .expect("all ranks succeed");
/// assert_eq!(agreed, Some(Candidate::new(8, 2)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ChannelCluster {
    size: NonZeroUsize,
}

impl ChannelCluster {
    /// Creates a cluster of `size` ranks.
    #[must_use]
    pub const fn new(size: NonZeroUsize) -> Self {
        Self { size }
    }

    /// Number of ranks.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size.get()
    }

    /// Wires one communicator per rank, coordinator first.
    #[must_use]
    pub fn communicators(&self) -> Vec<ChannelCommunicator> {
        let size = self.size();
        let mut inbound = Vec::with_capacity(size - 1);
        let mut outbound = Vec::with_capacity(size - 1);
        let mut peers = Vec::with_capacity(size);
        for rank in 1..size {
            let (to_root, from_peer) = mpsc::channel();
            let (to_peer, from_root) = mpsc::channel();
            inbound.push(from_peer);
            outbound.push(to_peer);
            peers.push(ChannelCommunicator {
                rank,
                size,
                link: Link::Peer { to_root, from_root },
            });
        }
        let coordinator = ChannelCommunicator {
            rank: COORDINATOR,
            size,
            link: Link::Coordinator { inbound, outbound },
        };
        std::iter::once(coordinator).chain(peers).collect()
    }

    /// Runs `work` on every rank, each on its own thread, and returns the
    /// coordinator's value.
    ///
    /// # Errors
    /// When several ranks fail, the root cause is reported in preference to
    /// the disconnections it triggered on other ranks. A panicking rank is
    /// reported as [`MstError::WorkerPanicked`].
    pub fn run<T, F>(&self, work: F) -> Result<T, MstError>
    where
        T: Send,
        F: Fn(&ChannelCommunicator) -> Result<T, MstError> + Sync,
    {
        let work = &work;
        let parent = Span::current();
        let results = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size());
            let mut spawn_failure = None;
            for comm in self.communicators() {
                let rank = comm.rank;
                let span = parent.clone();
                let spawned = thread::Builder::new()
                    .name(format!("prima-rank-{rank}"))
                    .spawn_scoped(scope, move || span.in_scope(|| work(&comm)));
                match spawned {
                    Ok(handle) => handles.push((rank, handle)),
                    Err(error) => {
                        warn!(rank, error = %error, "failed to start rank thread");
                        spawn_failure = Some(MstError::Spawn {
                            rank,
                            message: error.to_string(),
                        });
                        break;
                    }
                }
            }
            // Ranks left unspawned have dropped their links, so every started
            // rank finishes with either a value or a disconnect.
            let mut results: Vec<_> = handles
                .into_iter()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(MstError::WorkerPanicked { rank }))
                })
                .collect();
            results.extend(spawn_failure.map(Err));
            results
        });
        debug!(ranks = results.len(), "ranks joined");
        pick_result(results)
    }
}

/// Returns the coordinator's value or the most informative failure.
fn pick_result<T>(results: Vec<Result<T, MstError>>) -> Result<T, MstError> {
    let mut root_cause = None;
    let mut fallback = None;
    let mut coordinator = None;
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) if rank == COORDINATOR => coordinator = Some(value),
            Ok(_) => {}
            Err(error @ MstError::PeerDisconnected { .. }) => {
                fallback.get_or_insert(error);
            }
            Err(error) => {
                root_cause.get_or_insert(error);
            }
        }
    }
    match (root_cause.or(fallback), coordinator) {
        (Some(error), _) => Err(error),
        (None, Some(value)) => Ok(value),
        (None, None) => Err(MstError::WorkerPanicked { rank: COORDINATOR }),
    }
}
