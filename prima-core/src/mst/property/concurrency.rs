//! Property 3: repeated runs agree.
//!
//! Re-runs the thread-backed variants on the same input with the most
//! workers the suite uses and requires every run to reproduce the first
//! outcome exactly, catching schedule-dependent selection.

use std::num::NonZeroUsize;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::mst::{MstVariant, Parallelism, solve};

use super::types::{ConcurrencyConfig, MstFixture};

const WORKERS: NonZeroUsize = NonZeroUsize::new(4).expect("4 is non-zero");

/// Runs each parallel variant `repetitions` times and compares outcomes.
pub(super) fn run_concurrency_safety_property(fixture: &MstFixture) -> TestCaseResult {
    let config = ConcurrencyConfig::load();
    let parallelism = Parallelism::new(WORKERS, WORKERS);
    for variant in [MstVariant::Shared, MstVariant::Distributed, MstVariant::Hybrid] {
        let run = |attempt: usize| {
            solve(&fixture.graph, variant, parallelism).map_err(|err| {
                TestCaseError::fail(format!(
                    "{variant} run {attempt} failed: {err} ({})",
                    fixture.describe(),
                ))
            })
        };
        let baseline = run(0)?;
        for attempt in 1..config.repetitions {
            if run(attempt)? != baseline {
                return Err(TestCaseError::fail(format!(
                    "{variant} run {attempt} diverged from the first run ({})",
                    fixture.describe(),
                )));
            }
        }
    }
    Ok(())
}
