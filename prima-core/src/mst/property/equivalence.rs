//! Property 1: every selector matches the sequential reference.
//!
//! For each variant and worker count the outcome (parents, selection order,
//! phantom count) and the materialised matrix must equal the sequential
//! ones exactly.

use std::num::NonZeroUsize;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::mst::{MstVariant, Parallelism, sequential_prim, solve};

use super::types::MstFixture;

/// Worker counts exercised for each parallel variant.
const WORKER_COUNTS: [usize; 3] = [1, 2, 3];

/// Compares every variant against [`sequential_prim`].
pub(super) fn run_oracle_equivalence_property(fixture: &MstFixture) -> TestCaseResult {
    let graph = &fixture.graph;
    let reference = sequential_prim(graph).map_err(|err| {
        TestCaseError::fail(format!("sequential failed: {err} ({})", fixture.describe()))
    })?;
    let reference_matrix = reference.to_matrix(graph);

    for variant in MstVariant::ALL {
        for workers in WORKER_COUNTS {
            let workers = NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN);
            let parallelism = Parallelism::new(workers, workers);
            let outcome = solve(graph, variant, parallelism).map_err(|err| {
                TestCaseError::fail(format!(
                    "{variant} with {workers} workers failed: {err} ({})",
                    fixture.describe(),
                ))
            })?;
            if outcome != reference {
                return Err(TestCaseError::fail(format!(
                    "{variant} with {workers} workers diverged: parents={:?}, expected={:?} ({})",
                    outcome.parents,
                    reference.parents,
                    fixture.describe(),
                )));
            }
            if outcome.to_matrix(graph) != reference_matrix {
                return Err(TestCaseError::fail(format!(
                    "{variant} with {workers} workers produced a different matrix ({})",
                    fixture.describe(),
                )));
            }
        }
    }
    Ok(())
}
