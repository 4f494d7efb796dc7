//! Random symmetric graphs for experiments and benchmarks.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::graph::{MAX_WEIGHT, NO_EDGE, Weight, WeightedGraph};

/// Shape of a generated graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphSpec {
    /// Number of vertices.
    pub vertices: usize,
    /// Chance that any given pair is joined by an edge.
    pub edge_probability: f64,
    /// Heaviest edge; weights are drawn uniformly from `1..=max_weight`.
    pub max_weight: Weight,
    /// Seed for reproducible output; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GraphSpec {
    fn default() -> Self {
        Self {
            vertices: 1000,
            edge_probability: 0.5,
            max_weight: MAX_WEIGHT,
            seed: None,
        }
    }
}

/// A [`GraphSpec`] that cannot be generated.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphSpecError {
    /// The probability is outside `[0, 1]` or not a number.
    #[error("edge probability must lie in [0, 1] (got {got})")]
    Probability {
        /// Value supplied.
        got: f64,
    },
    /// The weight bound is zero or would collide with the sentinel.
    #[error("max weight must lie in 1..{} (got {got})", NO_EDGE)]
    MaxWeight {
        /// Value supplied.
        got: Weight,
    },
}

/// Generates a symmetric graph with a zero diagonal and [`NO_EDGE`] gaps.
///
/// # Errors
/// Returns [`GraphSpecError`] when the probability or weight bound is out of
/// range.
///
/// # Examples
/// ```
/// use prima_core::{GraphSpec, random_graph};
///
/// let spec = GraphSpec { vertices: 6, edge_probability: 1.0, seed: Some(7), ..GraphSpec::default() };
/// let graph = random_graph(&spec).expect("valid spec");
/// assert!(graph.is_symmetric());
/// assert_eq!(graph.edge_count(), 15);
/// ```
pub fn random_graph(spec: &GraphSpec) -> Result<WeightedGraph, GraphSpecError> {
    if !(0.0..=1.0).contains(&spec.edge_probability) {
        return Err(GraphSpecError::Probability {
            got: spec.edge_probability,
        });
    }
    if spec.max_weight == 0 || spec.max_weight >= NO_EDGE {
        return Err(GraphSpecError::MaxWeight {
            got: spec.max_weight,
        });
    }

    let mut rng = spec
        .seed
        .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
    let mut graph = WeightedGraph::filled(spec.vertices, NO_EDGE);
    for row in 0..spec.vertices {
        graph.set(row, row, 0);
        for column in row + 1..spec.vertices {
            if rng.gen_bool(spec.edge_probability) {
                let weight = rng.gen_range(1..=spec.max_weight);
                graph.set(row, column, weight);
                graph.set(column, row, weight);
            }
        }
    }
    Ok(graph)
}
