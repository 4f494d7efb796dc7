//! Command implementations and argument parsing for the `prima` CLI.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    thread,
};

use clap::{Args, Parser, Subcommand};
use prima_core::{
    DEFAULT_INPUT, DEFAULT_LOG, EngineBuilder, GraphSpec, GraphSpecError, LoadError, MAX_WEIGHT,
    MstVariant, RecordLog, RecordLogError, RunError, RunSummary, Weight, WriteError,
    default_output, io as graph_io, random_graph,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::report::{ReportError, ReportRow, build_report, write_report};

/// Comparison CSV written by `report` when no path is given.
pub const DEFAULT_REPORT: &str = "accuracy_comparison.csv";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "prima",
    version,
    about = "Compute minimum spanning trees with Prim's algorithm."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the minimum spanning tree of a graph file.
    Run(RunCommand),
    /// Write a random symmetric graph file.
    Generate(GenerateCommand),
    /// Compare variant outputs with the serial reference.
    Report(ReportCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Variant: serial, shared, distributed or hybrid.
    #[arg(long, default_value = "serial")]
    pub variant: MstVariant,

    /// Threads per process. Defaults to the available parallelism.
    #[arg(long, env = "PRIMA_THREADS")]
    pub threads: Option<NonZeroUsize>,

    /// Distributed ranks.
    #[arg(long, env = "PRIMA_PROCESSES", default_value_t = NonZeroUsize::MIN)]
    pub processes: NonZeroUsize,

    /// Graph file to read.
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Result file. Defaults to `<variant>_output.csv`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Execution log to append to.
    #[arg(long, default_value = DEFAULT_LOG)]
    pub log: PathBuf,

    /// Join the MPI world this process was launched in instead of running
    /// in-process ranks. `--processes` is ignored.
    #[cfg(feature = "mpi")]
    #[arg(long)]
    pub mpi: bool,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of vertices.
    #[arg(long, default_value_t = 1000)]
    pub vertices: usize,

    /// Chance that a pair of vertices is joined.
    #[arg(long, default_value_t = 0.5)]
    pub edge_probability: f64,

    /// Heaviest edge weight.
    #[arg(long, default_value_t = MAX_WEIGHT)]
    pub max_weight: Weight,

    /// Seed for reproducible graphs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Graph file to write.
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub output: PathBuf,
}

/// Options accepted by the `report` command.
#[derive(Debug, Args, Clone)]
pub struct ReportCommand {
    /// Directory holding the `<variant>_output.csv` files.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Execution log. Defaults to `log_time.txt` in `--dir`.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Comparison CSV. Defaults to `accuracy_comparison.csv` in `--dir`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Variants compared with the serial output.
    #[arg(long, value_delimiter = ',', default_value = "shared,distributed,hybrid")]
    pub variants: Vec<MstVariant>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An engine run failed.
    #[error(transparent)]
    Run(#[from] RunError),
    /// A matrix compared by `report` could not be read.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The generated graph could not be written.
    #[error(transparent)]
    Write(#[from] WriteError),
    /// The generator settings are out of range.
    #[error(transparent)]
    Generate(#[from] GraphSpecError),
    /// The execution log could not be read.
    #[error(transparent)]
    Log(#[from] RecordLogError),
    /// The execution log lacks a needed record.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// The comparison CSV could not be written.
    #[error("failed to write report `{}`: {source}", path.display())]
    ReportIo {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The MPI runtime could not be initialised.
    #[cfg(feature = "mpi")]
    #[error("MPI is unavailable or was already initialised")]
    MpiUnavailable,
}

impl CliError {
    /// Stable code of the failure, when the core assigns one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Run(err) => Some(err.code().as_str()),
            Self::Load(err) => Some(err.code().as_str()),
            Self::Write(err) => Some(err.code().as_str()),
            _ => None,
        }
    }

    /// Code of the error wrapped by a failed run.
    #[must_use]
    pub const fn detail_code(&self) -> Option<&'static str> {
        match self {
            Self::Run(err) => Some(err.detail_code()),
            _ => None,
        }
    }
}

/// What a command produced, ready for [`render_outcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A run finished; `None` on ranks other than the coordinator.
    Run(Option<RunSummary>),
    /// A graph was generated.
    Generate {
        /// File written.
        path: PathBuf,
        /// Vertices generated.
        vertices: usize,
        /// Undirected edges generated.
        edges: usize,
    },
    /// A comparison was written.
    Report {
        /// File written.
        path: PathBuf,
        /// Rows written.
        rows: Vec<ReportRow>,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the command fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use prima_cli::cli::{Cli, CommandOutcome, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let input = dir.path().join("input.csv");
/// std::fs::write(&input, "0,1,4\n1,0,2\n4,2,0\n")?;
/// let cli = Cli::try_parse_from([
///     "prima", "run", "--variant", "shared", "--threads", "2",
///     "--input", input.to_str().ok_or("utf-8 path")?,
///     "--output", dir.path().join("tree.csv").to_str().ok_or("utf-8 path")?,
///     "--log", dir.path().join("log.txt").to_str().ok_or("utf-8 path")?,
/// ])?;
/// let CommandOutcome::Run(Some(summary)) = run_cli(cli)? else {
///     return Err("expected a run summary".into());
/// };
/// assert_eq!(summary.total_weight, 3);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Run(command) => {
            span.record("command", "run");
            run_command(command)
        }
        Command::Generate(command) => {
            span.record("command", "generate");
            generate_command(&command)
        }
        Command::Report(command) => {
            span.record("command", "report");
            report_command(command)
        }
    }
}

fn default_threads() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(variant = %command.variant, threads = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<CommandOutcome, CliError> {
    let threads = command.threads.unwrap_or_else(default_threads);
    Span::current().record("threads", threads.get());
    let mut builder = EngineBuilder::new()
        .with_variant(command.variant)
        .with_threads(threads.get())
        .with_processes(command.processes.get())
        .with_input(command.input)
        .with_log(command.log);
    if let Some(output) = command.output {
        builder = builder.with_output(output);
    }
    let engine = builder.build()?;

    #[cfg(feature = "mpi")]
    if command.mpi {
        return run_mpi(&engine).map(CommandOutcome::Run);
    }
    Ok(CommandOutcome::Run(Some(engine.run()?)))
}

#[cfg(feature = "mpi")]
fn run_mpi(engine: &prima_core::Engine) -> Result<Option<RunSummary>, CliError> {
    let universe = mpi::initialize().ok_or(CliError::MpiUnavailable)?;
    let comm =
        prima_core::mst::comm::MpiCommunicator::new(universe.world()).map_err(RunError::from)?;
    Ok(engine.run_as_rank(&comm)?)
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(vertices = command.vertices, path = %command.output.display()),
)]
pub(super) fn generate_command(command: &GenerateCommand) -> Result<CommandOutcome, CliError> {
    let graph = random_graph(&GraphSpec {
        vertices: command.vertices,
        edge_probability: command.edge_probability,
        max_weight: command.max_weight,
        seed: command.seed,
    })?;
    graph_io::store(&graph, &command.output)?;
    let edges = graph.edge_count();
    info!(edges, "graph generated");
    Ok(CommandOutcome::Generate {
        path: command.output.clone(),
        vertices: graph.vertex_count(),
        edges,
    })
}

#[instrument(name = "cli.report", err, skip(command), fields(dir = %command.dir.display()))]
pub(super) fn report_command(command: ReportCommand) -> Result<CommandOutcome, CliError> {
    let dir = command.dir;
    let reference = graph_io::load(dir.join(default_output(MstVariant::Serial)))?;
    let candidates = command
        .variants
        .iter()
        .filter(|&&variant| variant != MstVariant::Serial)
        .map(|&variant| Ok((variant, graph_io::load(dir.join(default_output(variant)))?)))
        .collect::<Result<Vec<_>, LoadError>>()?;
    let records = RecordLog::new(command.log.unwrap_or_else(|| dir.join(DEFAULT_LOG)))
        .read_all()?;
    let rows = build_report(&reference, &candidates, &records)?;

    let path = command.output.unwrap_or_else(|| dir.join(DEFAULT_REPORT));
    write_report_file(&rows, &path)?;
    info!(rows = rows.len(), path = %path.display(), "comparison written");
    Ok(CommandOutcome::Report { path, rows })
}

fn write_report_file(rows: &[ReportRow], path: &Path) -> Result<(), CliError> {
    let to_error = |source| CliError::ReportIo {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
    write_report(rows, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(to_error)
}

/// Renders `outcome` to `writer` for a human reader.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use prima_cli::cli::{CommandOutcome, render_outcome};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let outcome = CommandOutcome::Generate {
///     path: "input.csv".into(),
///     vertices: 10,
///     edges: 21,
/// };
/// let mut buffer = Vec::new();
/// render_outcome(&outcome, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "Graph with 10 vertices and 21 edges written to input.csv\n");
/// # Ok(())
/// # }
/// ```
pub fn render_outcome(outcome: &CommandOutcome, mut writer: impl Write) -> io::Result<()> {
    match outcome {
        CommandOutcome::Run(None) => Ok(()),
        CommandOutcome::Run(Some(summary)) => {
            let record = &summary.record;
            writeln!(writer, "Execution time: {:.6} seconds", record.elapsed_seconds)?;
            writeln!(writer, "Variant: {}", record.variant)?;
            writeln!(writer, "Vertices: {}", record.vertex_count)?;
            writeln!(writer, "Workers: {}", record.worker_count)?;
            writeln!(
                writer,
                "Tree edges: {} (total weight {})",
                summary.edge_count, summary.total_weight
            )?;
            if summary.phantom_selections > 0 {
                writeln!(
                    writer,
                    "Disconnected: {} vertices joined without an edge",
                    summary.phantom_selections
                )?;
            }
            writeln!(writer, "Output saved to: {}", summary.output.display())
        }
        CommandOutcome::Generate {
            path,
            vertices,
            edges,
        } => writeln!(
            writer,
            "Graph with {vertices} vertices and {edges} edges written to {}",
            path.display()
        ),
        CommandOutcome::Report { path, rows } => {
            for row in rows {
                writeln!(
                    writer,
                    "{}: {:.2}% of cells match serial, {:+.2} s",
                    row.variant, row.accuracy_percent, row.seconds_delta
                )?;
            }
            writeln!(writer, "Comparison written to {}", path.display())
        }
    }
}
