//! Seeded graph fixtures shared by the benchmarks.

use std::num::NonZeroUsize;

use prima_core::{GraphSpec, Parallelism, WeightedGraph, random_graph};

use crate::error::BenchSetupError;

/// Seed used for all generated benchmark graphs.
pub const SEED: u64 = 42;

/// Edge density of the generated graphs, matching the CLI default.
pub const EDGE_PROBABILITY: f64 = 0.5;

/// Generates the seeded benchmark graph with `vertices` vertices.
///
/// # Errors
/// Returns [`BenchSetupError::Graph`] if the generator rejects its settings.
pub fn seeded_graph(vertices: usize) -> Result<WeightedGraph, BenchSetupError> {
    Ok(random_graph(&GraphSpec {
        vertices,
        edge_probability: EDGE_PROBABILITY,
        seed: Some(SEED),
        ..GraphSpec::default()
    })?)
}

/// Builds a [`Parallelism`] from raw counts.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when either count is zero.
pub fn parallelism(threads: usize, processes: usize) -> Result<Parallelism, BenchSetupError> {
    let non_zero = |value: usize, context: &'static str| {
        NonZeroUsize::new(value).ok_or(BenchSetupError::ZeroValue { context })
    };
    Ok(Parallelism::new(
        non_zero(threads, "threads")?,
        non_zero(processes, "processes")?,
    ))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn seeded_graphs_are_stable() {
        let first = seeded_graph(24).expect("valid settings");
        let second = seeded_graph(24).expect("valid settings");
        assert_eq!(first, second);
        assert_eq!(first.vertex_count(), 24);
    }

    #[rstest]
    #[case::threads(0, 1, "threads")]
    #[case::processes(1, 0, "processes")]
    fn zero_counts_are_rejected(
        #[case] threads: usize,
        #[case] processes: usize,
        #[case] expected: &str,
    ) {
        let err = parallelism(threads, processes).expect_err("zero is invalid");
        assert!(matches!(err, BenchSetupError::ZeroValue { context } if context == expected));
    }
}
