//! Append-only execution log.
//!
//! Each completed run adds one line `variant,vertex_count,worker_count,elapsed_seconds`
//! with no header. The engine only ever appends; [`RecordLog::read_all`]
//! exists for the reporting tools.

use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    num::ParseIntError,
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    error::WriteError,
    mst::{MstVariant, UnknownVariant},
};

/// One completed run.
///
/// # Examples
/// ```
/// use prima_core::{ExecutionRecord, MstVariant};
///
/// let record: ExecutionRecord = "hybrid,1000,8,0.25".parse().expect("valid line");
/// assert_eq!(record.variant, MstVariant::Hybrid);
/// assert_eq!(record.to_string(), "hybrid,1000,8,0.25");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExecutionRecord {
    /// Variant that produced the tree.
    pub variant: MstVariant,
    /// Vertices in the input graph.
    pub vertex_count: usize,
    /// Workers used, per [`crate::Parallelism::worker_count`].
    pub worker_count: usize,
    /// Wall-clock seconds spent computing and storing the tree.
    pub elapsed_seconds: f64,
}

impl fmt::Display for ExecutionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.variant, self.vertex_count, self.worker_count, self.elapsed_seconds
        )
    }
}

/// A log line that is not a valid [`ExecutionRecord`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RecordParseError {
    /// The line did not have exactly four fields.
    #[error("expected 4 comma-separated fields, found {found}")]
    FieldCount {
        /// Fields present.
        found: usize,
    },
    /// The first field is not a variant label.
    #[error(transparent)]
    Variant(#[from] UnknownVariant),
    /// A count field is not a non-negative integer.
    #[error("{field} `{value}` is not a count: {source}")]
    Count {
        /// Name of the field.
        field: &'static str,
        /// Raw text.
        value: String,
        /// Parser error.
        #[source]
        source: ParseIntError,
    },
    /// The elapsed time is not a finite non-negative number.
    #[error("elapsed seconds `{value}` is not a duration")]
    Seconds {
        /// Raw text.
        value: String,
    },
}

impl FromStr for ExecutionRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        let [variant, vertices, workers, seconds] = fields.as_slice() else {
            return Err(RecordParseError::FieldCount {
                found: fields.len(),
            });
        };
        Ok(Self {
            variant: variant.parse()?,
            vertex_count: parse_count("vertex_count", vertices)?,
            worker_count: parse_count("worker_count", workers)?,
            elapsed_seconds: parse_seconds(seconds)?,
        })
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<usize, RecordParseError> {
    value.parse().map_err(|source| RecordParseError::Count {
        field,
        value: value.to_owned(),
        source,
    })
}

fn parse_seconds(value: &str) -> Result<f64, RecordParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && seconds.is_sign_positive())
        .ok_or_else(|| RecordParseError::Seconds {
            value: value.to_owned(),
        })
}

/// Failure while reading a log back.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RecordLogError {
    /// The log could not be read.
    #[error("failed to read execution log `{}`: {source}", path.display())]
    Read {
        /// Log path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line could not be parsed.
    #[error("line {line} of execution log `{}`: {source}", path.display())]
    Malformed {
        /// Log path.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Parse failure.
        #[source]
        source: RecordParseError,
    },
}

/// Handle on a log file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordLog {
    path: PathBuf,
}

impl RecordLog {
    /// Wraps `path`; nothing is opened until a record is appended or read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` as one line, creating the file if needed.
    ///
    /// The line is handed to the operating system in a single write on a file
    /// opened in append mode, so concurrent writers never split a record.
    ///
    /// # Errors
    /// Returns [`WriteError::Log`] when the file cannot be opened or written.
    pub fn append(&self, record: &ExecutionRecord) -> Result<(), WriteError> {
        let line = format!("{record}\n");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| WriteError::Log {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), record = %record, "execution record appended");
        Ok(())
    }

    /// Reads every record in file order. Blank lines are skipped.
    ///
    /// # Errors
    /// Returns [`RecordLogError::Read`] when the file cannot be read and
    /// [`RecordLogError::Malformed`] for the first invalid line.
    pub fn read_all(&self) -> Result<Vec<ExecutionRecord>, RecordLogError> {
        let text = fs::read_to_string(&self.path).map_err(|source| RecordLogError::Read {
            path: self.path.clone(),
            source,
        })?;
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                line.parse().map_err(|source| RecordLogError::Malformed {
                    path: self.path.clone(),
                    line: index + 1,
                    source,
                })
            })
            .collect()
    }
}
