//! Command-line interface for running and comparing the MST variants.
//!
//! `run` computes a tree and appends to the execution log, `generate` writes
//! random input graphs, and `report` compares variant outputs with the serial
//! reference.

mod commands;
mod report;

pub use commands::{
    Cli, CliError, Command, CommandOutcome, DEFAULT_REPORT, GenerateCommand, ReportCommand,
    RunCommand, render_outcome, run_cli,
};
pub use report::{
    REPORT_HEADER, ReportError, ReportRow, accuracy_percent, build_report, latest_records,
    write_report,
};
