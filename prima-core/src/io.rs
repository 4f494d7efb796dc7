//! Comma-delimited adjacency matrix files.
//!
//! One row per line, cells separated by commas, no header and no trailing
//! delimiter. Blank lines are skipped; surrounding whitespace in a cell is
//! ignored.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::{debug, instrument};

use crate::{
    error::{LoadError, WriteError},
    graph::{Weight, WeightedGraph},
};

/// Loads a graph from `path`.
///
/// Symmetry and the diagonal are not validated.
///
/// # Errors
/// Returns [`LoadError::Open`] when the file cannot be opened and the
/// [`read_graph`] errors for malformed content.
#[instrument(name = "io.load", err, skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<WeightedGraph, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = read_graph(BufReader::new(file), path)?;
    debug!(vertices = graph.vertex_count(), "graph loaded");
    Ok(graph)
}

/// Parses a graph from `reader`. `origin` only labels errors.
///
/// # Errors
/// Returns [`LoadError::Read`] on I/O failure, [`LoadError::Parse`] when a
/// cell is not a non-negative integer, and [`LoadError::Ragged`] when the
/// rows do not form a square.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use prima_core::io::read_graph;
///
/// let graph = read_graph("0,5\n5,0\n".as_bytes(), Path::new("inline"))
///     .expect("valid matrix");
/// assert_eq!(graph.weight(1, 0), 5);
/// ```
pub fn read_graph(reader: impl BufRead, origin: &Path) -> Result<WeightedGraph, LoadError> {
    let mut rows: Vec<Vec<Weight>> = Vec::new();
    let mut line_numbers = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| LoadError::Read {
            path: origin.to_path_buf(),
            line: line_number,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(&line, line_number, origin)?);
        line_numbers.push(line_number);
    }

    WeightedGraph::from_rows(rows).map_err(|ragged| LoadError::Ragged {
        path: origin.to_path_buf(),
        line: line_numbers.get(ragged.row).copied().unwrap_or_default(),
        expected: ragged.expected,
        actual: ragged.actual,
    })
}

fn parse_row(line: &str, line_number: usize, origin: &Path) -> Result<Vec<Weight>, LoadError> {
    line.split(',')
        .enumerate()
        .map(|(column, cell)| {
            let cell = cell.trim();
            cell.parse::<Weight>().map_err(|_| LoadError::Parse {
                path: origin.to_path_buf(),
                line: line_number,
                column: column + 1,
                value: cell.to_owned(),
            })
        })
        .collect()
}

/// Writes `graph` to `path`, creating or truncating the file.
///
/// # Errors
/// Returns [`WriteError::Output`] when the file cannot be created or written.
#[instrument(name = "io.store", err, skip_all, fields(path = %path.as_ref().display()))]
pub fn store(graph: &WeightedGraph, path: impl AsRef<Path>) -> Result<(), WriteError> {
    let path = path.as_ref();
    let to_error = |source| WriteError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_graph(graph, &mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}

/// Serialises `graph` in the comma-delimited format.
///
/// # Errors
/// Propagates any error from `writer`.
pub fn write_graph(graph: &WeightedGraph, mut writer: impl Write) -> io::Result<()> {
    for row in graph.rows() {
        let mut cells = row.iter();
        if let Some(first) = cells.next() {
            write!(writer, "{first}")?;
        }
        for cell in cells {
            write!(writer, ",{cell}")?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}
