//! Fixture and configuration types for the MST property tests.

use crate::graph::WeightedGraph;

/// How edge weights and topology are chosen for a generated graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum WeightDistribution {
    /// Every edge carries a distinct weight.
    Unique,
    /// Edges draw from a pool of one to three weights, forcing key ties.
    ManyIdentical,
    /// A random spanning path plus a handful of extra edges.
    Sparse,
    /// Edge probability between 0.7 and 0.95.
    Dense,
    /// Two to five components with no edges between them.
    Disconnected,
}

/// A generated graph together with the distribution that produced it.
#[derive(Clone, Debug)]
pub(super) struct MstFixture {
    /// Symmetric adjacency matrix.
    pub graph: WeightedGraph,
    /// Distribution used during generation.
    pub distribution: WeightDistribution,
}

impl MstFixture {
    /// Short context string appended to failure messages.
    pub(super) fn describe(&self) -> String {
        format!(
            "distribution={:?}, vertices={}, edges={}",
            self.distribution,
            self.graph.vertex_count(),
            self.graph.edge_count(),
        )
    }
}

/// Repetition count for the determinism property.
pub(super) struct ConcurrencyConfig {
    /// Number of runs compared against the first.
    pub repetitions: usize,
}

impl ConcurrencyConfig {
    /// Reads `PRIMA_MST_PBT_CONCURRENCY_REPS`, defaulting to 4.
    pub(super) fn load() -> Self {
        let repetitions = std::env::var("PRIMA_MST_PBT_CONCURRENCY_REPS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(4);
        Self { repetitions }
    }
}
