//! Prima core library.
//!
//! Minimum spanning trees of dense weighted graphs with Prim's algorithm,
//! grown by one of four interchangeable selectors, plus the file formats and
//! run orchestration around them.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod engine;
mod error;
mod frontier;
mod generate;
mod graph;
pub mod io;
pub mod mst;
mod record;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_INPUT, DEFAULT_LOG, EngineBuilder, RunConfig, default_output},
    engine::{Engine, RunSummary},
    error::{
        LoadError, LoadErrorCode, MstError, MstErrorCode, Result, RunError, RunErrorCode,
        WriteError, WriteErrorCode,
    },
    frontier::{Candidate, FrontierState, START_VERTEX, combine},
    generate::{GraphSpec, GraphSpecError, random_graph},
    graph::{MAX_WEIGHT, NO_EDGE, RaggedRow, Weight, WeightedGraph, is_edge},
    mst::{MstOutcome, MstVariant, Parallelism, UnknownVariant, solve},
    record::{ExecutionRecord, RecordLog, RecordLogError, RecordParseError},
};
