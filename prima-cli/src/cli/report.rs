//! Accuracy and timing comparison against the serial reference.
//!
//! Each candidate matrix is compared with the serial one cell by cell and
//! joined with the latest log record of its variant. Times are reported
//! relative to the latest serial record.

use std::{collections::HashMap, io};

use prima_core::{ExecutionRecord, MstVariant, WeightedGraph};
use thiserror::Error;

/// Header of the comparison CSV.
pub const REPORT_HEADER: &str = "variant,vertices,workers,accuracy_percent,seconds,seconds_delta";

/// One compared variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReportRow {
    /// Variant compared.
    pub variant: MstVariant,
    /// Vertex count from its latest record.
    pub vertices: usize,
    /// Worker count from its latest record.
    pub workers: usize,
    /// Share of cells equal to the reference, in percent.
    pub accuracy_percent: f64,
    /// Elapsed seconds from its latest record.
    pub seconds: f64,
    /// `seconds` minus the latest serial time.
    pub seconds_delta: f64,
}

/// The log lacks what the report needs.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ReportError {
    /// No run of `variant` was recorded.
    #[error("no {variant} run in the execution log")]
    MissingRecord {
        /// Variant without a record.
        variant: MstVariant,
    },
}

/// Percentage of `reference` cells that `candidate` reproduces.
///
/// Cells outside a smaller candidate count as mismatches. Two empty
/// matrices agree completely.
///
/// # Examples
/// ```
/// use prima_cli::cli::accuracy_percent;
/// use prima_core::WeightedGraph;
///
/// let reference = WeightedGraph::from_rows(vec![vec![0, 1], vec![1, 0]]).expect("square");
/// let candidate = WeightedGraph::from_rows(vec![vec![0, 1], vec![2, 0]]).expect("square");
/// assert!((accuracy_percent(&reference, &candidate) - 75.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn accuracy_percent(reference: &WeightedGraph, candidate: &WeightedGraph) -> f64 {
    let total = reference.as_slice().len();
    if total == 0 {
        return 100.0;
    }
    let matching = reference
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let other = (row < candidate.vertex_count()).then(|| candidate.row(row));
            cells
                .iter()
                .enumerate()
                .filter(|&(column, weight)| {
                    other.and_then(|other| other.get(column)) == Some(weight)
                })
                .count()
        })
        .sum::<usize>();
    ratio(matching, total) * 100.0
}

// Cell counts stay far below 2^52, so the conversion is exact.
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

/// Latest record per variant; later lines win.
#[must_use]
pub fn latest_records(records: &[ExecutionRecord]) -> HashMap<MstVariant, ExecutionRecord> {
    records
        .iter()
        .map(|record| (record.variant, *record))
        .collect()
}

/// Builds one row per candidate, in the order given.
///
/// # Errors
/// Returns [`ReportError::MissingRecord`] when the serial run or a candidate
/// variant has no record.
pub fn build_report(
    reference: &WeightedGraph,
    candidates: &[(MstVariant, WeightedGraph)],
    records: &[ExecutionRecord],
) -> Result<Vec<ReportRow>, ReportError> {
    let latest = latest_records(records);
    let record_of = |variant: MstVariant| {
        latest
            .get(&variant)
            .copied()
            .ok_or(ReportError::MissingRecord { variant })
    };
    let serial = record_of(MstVariant::Serial)?;
    candidates
        .iter()
        .map(|(variant, matrix)| {
            let record = record_of(*variant)?;
            Ok(ReportRow {
                variant: *variant,
                vertices: record.vertex_count,
                workers: record.worker_count,
                accuracy_percent: accuracy_percent(reference, matrix),
                seconds: record.elapsed_seconds,
                seconds_delta: record.elapsed_seconds - serial.elapsed_seconds,
            })
        })
        .collect()
}

/// Writes the header and rows, numbers fixed to two decimals.
///
/// # Errors
/// Returns any error from `writer`.
pub fn write_report(rows: &[ReportRow], mut writer: impl io::Write) -> io::Result<()> {
    writeln!(writer, "{REPORT_HEADER}")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{:.2},{:.2},{:.2}",
            row.variant,
            row.vertices,
            row.workers,
            row.accuracy_percent,
            row.seconds,
            row.seconds_delta
        )?;
    }
    Ok(())
}
