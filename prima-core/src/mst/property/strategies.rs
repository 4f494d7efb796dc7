//! Graph generators for the MST property tests.
//!
//! Every generator produces a symmetric matrix with a zero diagonal and
//! [`NO_EDGE`] gaps, the shape the loader hands to the engine.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::graph::{NO_EDGE, Weight, WeightedGraph};

use super::types::{MstFixture, WeightDistribution};

/// Smallest generated vertex count.
const MIN_VERTICES: usize = 2;
/// Largest generated vertex count.
const MAX_VERTICES: usize = 40;
/// Largest vertex count for dense graphs.
const DENSE_MAX_VERTICES: usize = 24;

/// Samples a distribution and a seed, then builds the fixture.
pub(super) fn mst_fixture_strategy() -> impl Strategy<Value = MstFixture> {
    (any::<WeightDistribution>(), any::<u64>()).prop_map(|(distribution, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(distribution, &mut rng)
    })
}

/// Builds a fixture for an explicit distribution.
pub(super) fn generate_fixture(distribution: WeightDistribution, rng: &mut SmallRng) -> MstFixture {
    let graph = match distribution {
        WeightDistribution::Unique => generate_unique(rng),
        WeightDistribution::ManyIdentical => generate_identical(rng),
        WeightDistribution::Sparse => generate_sparse(rng),
        WeightDistribution::Dense => generate_dense(rng),
        WeightDistribution::Disconnected => generate_disconnected(rng),
    };
    MstFixture {
        graph,
        distribution,
    }
}

/// A graph of `vertex_count` isolated vertices.
fn empty_graph(vertex_count: usize) -> WeightedGraph {
    let mut graph = WeightedGraph::filled(vertex_count, NO_EDGE);
    for vertex in 0..vertex_count {
        graph.set(vertex, vertex, 0);
    }
    graph
}

fn connect(graph: &mut WeightedGraph, a: usize, b: usize, weight: Weight) {
    graph.set(a, b, weight);
    graph.set(b, a, weight);
}

/// Adds each pair with probability `edge_probability`, weighted by `weight`.
fn random_pairs(
    graph: &mut WeightedGraph,
    vertices: std::ops::Range<usize>,
    edge_probability: f64,
    rng: &mut SmallRng,
    mut weight: impl FnMut(&mut SmallRng) -> Weight,
) {
    for a in vertices.clone() {
        for b in a + 1..vertices.end {
            if rng.gen_bool(edge_probability) {
                let w = weight(rng);
                connect(graph, a, b, w);
            }
        }
    }
}

fn generate_unique(rng: &mut SmallRng) -> WeightedGraph {
    let vertex_count = rng.gen_range(MIN_VERTICES..=MAX_VERTICES);
    let pair_count = vertex_count * (vertex_count - 1) / 2;
    let last = Weight::try_from(pair_count).unwrap_or(NO_EDGE - 1);
    let mut weights: Vec<Weight> = (1..=last).collect();
    weights.shuffle(rng);
    let mut weights = weights.into_iter();
    let mut graph = empty_graph(vertex_count);
    let edge_probability = rng.gen_range(0.2..=0.6);
    random_pairs(&mut graph, 0..vertex_count, edge_probability, rng, |_| {
        weights.next().unwrap_or(NO_EDGE - 1)
    });
    graph
}

fn generate_identical(rng: &mut SmallRng) -> WeightedGraph {
    let vertex_count = rng.gen_range(MIN_VERTICES..=MAX_VERTICES);
    let pool_size = rng.gen_range(1..=3);
    let pool: Vec<Weight> = (0..pool_size).map(|_| rng.gen_range(1..=10)).collect();
    let mut graph = empty_graph(vertex_count);
    let edge_probability = rng.gen_range(0.3..=0.7);
    random_pairs(&mut graph, 0..vertex_count, edge_probability, rng, |r| {
        pool[r.gen_range(0..pool.len())]
    });
    graph
}

fn generate_sparse(rng: &mut SmallRng) -> WeightedGraph {
    let vertex_count = rng.gen_range(MIN_VERTICES..=MAX_VERTICES);
    let mut graph = empty_graph(vertex_count);

    let mut path: Vec<usize> = (0..vertex_count).collect();
    path.shuffle(rng);
    for pair in path.windows(2) {
        let weight = rng.gen_range(1..=100);
        connect(&mut graph, pair[0], pair[1], weight);
    }

    let extra = rng.gen_range(vertex_count / 2..=vertex_count);
    for _ in 0..extra {
        let a = rng.gen_range(0..vertex_count);
        let b = rng.gen_range(0..vertex_count);
        if a != b {
            let weight = rng.gen_range(1..=100);
            connect(&mut graph, a, b, weight);
        }
    }
    graph
}

fn generate_dense(rng: &mut SmallRng) -> WeightedGraph {
    let vertex_count = rng.gen_range(MIN_VERTICES..=DENSE_MAX_VERTICES);
    let mut graph = empty_graph(vertex_count);
    let edge_probability = rng.gen_range(0.7..=0.95);
    random_pairs(&mut graph, 0..vertex_count, edge_probability, rng, |r| {
        r.gen_range(1..=100)
    });
    graph
}

/// Components of 1 to 10 vertices laid out in consecutive index ranges.
fn generate_disconnected(rng: &mut SmallRng) -> WeightedGraph {
    let sizes: Vec<usize> = (0..rng.gen_range(2..=5))
        .map(|_| rng.gen_range(1..=10))
        .collect();
    let vertex_count = sizes.iter().sum();
    let mut graph = empty_graph(vertex_count);
    let mut offset = 0;
    for size in sizes {
        let edge_probability = rng.gen_range(0.3..=0.8);
        random_pairs(&mut graph, offset..offset + size, edge_probability, rng, |r| {
            r.gen_range(1..=100)
        });
        offset += size;
    }
    graph
}

impl proptest::arbitrary::Arbitrary for WeightDistribution {
    type Parameters = ();
    type Strategy = proptest::strategy::TupleUnion<(
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
    )>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            2 => Just(Self::Unique),
            3 => Just(Self::ManyIdentical),
            2 => Just(Self::Sparse),
            2 => Just(Self::Dense),
            2 => Just(Self::Disconnected),
        ]
    }
}
