//! Shared test utilities for `prima-core`.

use std::num::NonZeroUsize;

use prima_test_support::profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    graph::{Weight, WeightedGraph},
    mst::Parallelism,
};

/// Builds a proptest configuration from the shared run profile so every
/// suite honours `PROGTEST_CASES` and `PRIMA_PBT_FORK` the same way.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a graph from literal rows, panicking on a ragged matrix.
#[must_use]
pub(crate) fn graph_from_rows(rows: &[&[Weight]]) -> WeightedGraph {
    WeightedGraph::from_rows(rows.iter().map(|row| row.to_vec()).collect())
        .expect("test rows must form a square matrix")
}

/// Parallelism from plain counts, panicking on zero.
#[must_use]
pub(crate) fn parallelism(threads: usize, processes: usize) -> Parallelism {
    Parallelism::new(
        NonZeroUsize::new(threads).expect("threads must be non-zero"),
        NonZeroUsize::new(processes).expect("processes must be non-zero"),
    )
}
