//! End-to-end runs through the public engine API.

mod common;

use std::{fs, thread};

use common::{TRIANGLE, TRIANGLE_TREE, Workspace};
use prima_core::{
    ExecutionRecord, GraphSpec, MstVariant, RecordLog, RunError, io, mst::comm::ChannelCluster,
    random_graph,
};
use rstest::rstest;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
#[case::serial(MstVariant::Serial)]
#[case::shared(MstVariant::Shared)]
#[case::distributed(MstVariant::Distributed)]
#[case::hybrid(MstVariant::Hybrid)]
fn every_variant_writes_the_same_tree(#[case] variant: MstVariant) -> TestResult {
    let workspace = Workspace::with_input(TRIANGLE)?;
    let summary = workspace.engine(variant, 2, 3)?.run()?;

    assert_eq!(summary.output, workspace.output(variant));
    assert_eq!(fs::read_to_string(&summary.output)?, TRIANGLE_TREE);
    let records = RecordLog::new(workspace.log()).read_all()?;
    assert_eq!(records, [summary.record]);
    Ok(())
}

#[test]
fn variants_agree_on_a_random_graph() -> TestResult {
    let workspace = Workspace::with_input("")?;
    let graph = random_graph(&GraphSpec {
        vertices: 60,
        edge_probability: 0.2,
        seed: Some(2024),
        ..GraphSpec::default()
    })?;
    io::store(&graph, workspace.input())?;

    let mut totals = Vec::new();
    for variant in MstVariant::ALL {
        let summary = workspace.engine(variant, 3, 4)?.run()?;
        totals.push((summary.total_weight, summary.phantom_selections));
    }
    assert!(totals.windows(2).all(|pair| pair[0] == pair[1]), "{totals:?}");

    let reference = io::load(workspace.output(MstVariant::Serial))?;
    for variant in MstVariant::ALL {
        assert_eq!(io::load(workspace.output(variant))?, reference, "{variant}");
    }
    Ok(())
}

#[test]
fn log_accumulates_across_runs() -> TestResult {
    let workspace = Workspace::with_input(TRIANGLE)?;
    for variant in MstVariant::ALL {
        workspace.engine(variant, 2, 2)?.run()?;
    }

    let records = RecordLog::new(workspace.log()).read_all()?;
    let seen: Vec<_> = records
        .iter()
        .map(|ExecutionRecord { variant, worker_count, .. }| (*variant, *worker_count))
        .collect();
    assert_eq!(
        seen,
        [
            (MstVariant::Serial, 1),
            (MstVariant::Shared, 2),
            (MstVariant::Distributed, 2),
            (MstVariant::Hybrid, 4),
        ]
    );
    assert!(records.iter().all(|record| record.vertex_count == 3));
    Ok(())
}

#[test]
fn ragged_input_is_rejected_before_any_output() -> TestResult {
    let workspace = Workspace::with_input("0,1\n1\n")?;
    let err = workspace
        .engine(MstVariant::Serial, 1, 1)?
        .run()
        .expect_err("second row is short");

    assert_eq!(err.detail_code(), "LOAD_RAGGED");
    assert!(!workspace.output(MstVariant::Serial).exists());
    assert!(!workspace.log().exists());
    Ok(())
}

#[test]
fn zero_workers_fail_at_build_time() -> TestResult {
    let workspace = Workspace::with_input(TRIANGLE)?;
    let err = workspace
        .engine(MstVariant::Hybrid, 0, 2)
        .expect_err("zero threads");
    assert!(matches!(err, RunError::Mst(_)));
    assert_eq!(err.detail_code(), "MST_INVALID_WORKER_COUNT");
    Ok(())
}

#[test]
fn ranks_of_a_cluster_share_one_run() -> TestResult {
    let workspace = Workspace::with_input(TRIANGLE)?;
    let engine = &workspace.engine(MstVariant::Hybrid, 2, 1)?;
    let cluster = ChannelCluster::new(std::num::NonZeroUsize::new(3).ok_or("non-zero")?);

    let reports = thread::scope(|scope| {
        let handles: Vec<_> = cluster
            .communicators()
            .into_iter()
            .map(|comm| scope.spawn(move || engine.run_as_rank(&comm).map(|s| s.is_some())))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| "rank panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let reports = reports.into_iter().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(reports, [true, false, false]);
    assert_eq!(fs::read_to_string(workspace.output(MstVariant::Hybrid))?, TRIANGLE_TREE);
    let records = RecordLog::new(workspace.log()).read_all()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].worker_count, 6);
    Ok(())
}
