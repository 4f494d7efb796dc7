//! Error types for the prima core library.
//!
//! Each concern gets its own enum paired with a stable machine-readable code
//! so the CLI and log consumers can report failures without matching on
//! display strings.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::mst::MstVariant;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// Failure while reading a graph file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input path could not be opened.
    #[error("failed to open `{}`: {source}", path.display())]
    Open {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading a line from the input failed.
    #[error("failed to read line {line} of `{}`: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A cell did not parse as a non-negative integer weight.
    #[error("line {line}, column {column} of `{}`: `{value}` is not a weight", path.display())]
    Parse {
        /// Path being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// The offending cell text.
        value: String,
    },
    /// A row did not have one cell per vertex.
    #[error("line {line} of `{}` has {actual} cells but {expected} were expected", path.display())]
    Ragged {
        /// Path being read.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Number of cells required (the row count).
        expected: usize,
        /// Number of cells found.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`LoadError`] variants.
    enum LoadErrorCode for LoadError {
        /// The input path could not be opened.
        Open => Open { .. } => "LOAD_OPEN",
        /// Reading a line from the input failed.
        Read => Read { .. } => "LOAD_READ",
        /// A cell did not parse as a weight.
        Parse => Parse { .. } => "LOAD_PARSE",
        /// A row did not have one cell per vertex.
        Ragged => Ragged { .. } => "LOAD_RAGGED",
    }
}

/// Failure while writing the result matrix or the execution log.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WriteError {
    /// The result matrix could not be written.
    #[error("failed to write result to `{}`: {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The execution record could not be appended.
    #[error("failed to append execution record to `{}`: {source}", path.display())]
    Log {
        /// Log path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`WriteError`] variants.
    enum WriteErrorCode for WriteError {
        /// The result matrix could not be written.
        Output => Output { .. } => "WRITE_OUTPUT",
        /// The execution record could not be appended.
        Log => Log { .. } => "WRITE_LOG",
    }
}

/// Errors raised while computing a minimum spanning tree.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MstError {
    /// The graph has no vertices.
    #[error("cannot compute an MST for an empty graph")]
    EmptyGraph,
    /// The coordinator was asked to distribute a graph it does not hold.
    #[error("coordinator rank {rank} has no graph to distribute")]
    MissingGraph {
        /// Rank that lacked the graph.
        rank: usize,
    },
    /// A peer hung up before a collective operation completed.
    #[error("rank {rank} lost its link to rank {peer}")]
    PeerDisconnected {
        /// Rank that observed the failure.
        rank: usize,
        /// Rank whose link closed.
        peer: usize,
    },
    /// A collective operation received the wrong message kind.
    #[error("rank {rank} expected a {expected} message")]
    UnexpectedMessage {
        /// Rank that received the message.
        rank: usize,
        /// Message kind the collective was waiting for.
        expected: &'static str,
    },
    /// The worker thread pool could not be created.
    #[error("failed to build worker thread pool: {message}")]
    ThreadPool {
        /// Rendered builder error.
        message: String,
    },
    /// A rank thread could not be started.
    #[error("failed to start rank {rank}: {message}")]
    Spawn {
        /// Rank that failed to start.
        rank: usize,
        /// Rendered spawn error.
        message: String,
    },
    /// A rank thread panicked.
    #[error("rank {rank} panicked")]
    WorkerPanicked {
        /// Rank that panicked.
        rank: usize,
    },
    /// No unvisited vertex was left although iterations remain.
    #[error("frontier exhausted at iteration {iteration}")]
    FrontierExhausted {
        /// Zero-based iteration index.
        iteration: usize,
    },
    /// The variant was not compiled into this build.
    #[error("the {variant} variant is not available in this build")]
    BackendUnavailable {
        /// Variant that was requested.
        variant: MstVariant,
    },
    /// A worker count of zero was requested.
    #[error("{name} must be at least 1 (got {got})")]
    InvalidWorkerCount {
        /// Name of the setting.
        name: &'static str,
        /// Value supplied.
        got: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MstError`] variants.
    enum MstErrorCode for MstError {
        /// The graph has no vertices.
        EmptyGraph => EmptyGraph => "MST_EMPTY_GRAPH",
        /// The coordinator had no graph to distribute.
        MissingGraph => MissingGraph { .. } => "MST_MISSING_GRAPH",
        /// A peer hung up mid-collective.
        PeerDisconnected => PeerDisconnected { .. } => "MST_PEER_DISCONNECTED",
        /// A collective received the wrong message kind.
        UnexpectedMessage => UnexpectedMessage { .. } => "MST_UNEXPECTED_MESSAGE",
        /// The worker thread pool could not be created.
        ThreadPool => ThreadPool { .. } => "MST_THREAD_POOL",
        /// A rank thread could not be started.
        Spawn => Spawn { .. } => "MST_SPAWN",
        /// A rank thread panicked.
        WorkerPanicked => WorkerPanicked { .. } => "MST_WORKER_PANICKED",
        /// No unvisited vertex was left.
        FrontierExhausted => FrontierExhausted { .. } => "MST_FRONTIER_EXHAUSTED",
        /// The variant was not compiled in.
        BackendUnavailable => BackendUnavailable { .. } => "MST_BACKEND_UNAVAILABLE",
        /// A worker count of zero was requested.
        InvalidWorkerCount => InvalidWorkerCount { .. } => "MST_INVALID_WORKER_COUNT",
    }
}

/// Error produced by [`crate::Engine`] runs.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RunError {
    /// The input graph could not be loaded; nothing was computed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The computation failed.
    #[error(transparent)]
    Mst(#[from] MstError),
    /// The computation finished but its result or record was not written.
    #[error(transparent)]
    Write(#[from] WriteError),
}

define_error_codes! {
    /// Stable codes describing [`RunError`] variants.
    enum RunErrorCode for RunError {
        /// The input graph could not be loaded.
        LoadFailure => Load(..) => "RUN_LOAD_FAILURE",
        /// The computation failed.
        MstFailure => Mst(..) => "RUN_MST_FAILURE",
        /// Writing the result or record failed.
        WriteFailure => Write(..) => "RUN_WRITE_FAILURE",
    }
}

impl RunError {
    /// Returns the code of the wrapped error.
    #[must_use]
    pub const fn detail_code(&self) -> &'static str {
        match self {
            Self::Load(error) => error.code().as_str(),
            Self::Mst(error) => error.code().as_str(),
            Self::Write(error) => error.code().as_str(),
        }
    }
}

/// Convenient alias for results returned by the engine.
pub type Result<T> = core::result::Result<T, RunError>;
