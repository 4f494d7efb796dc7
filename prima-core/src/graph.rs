//! Dense weighted adjacency matrix.
//!
//! Weights are stored row-major in one flat buffer. Absence of an edge is
//! marked with [`NO_EDGE`]; the diagonal is expected to be `0`. Neither the
//! diagonal nor symmetry is enforced here so that malformed inputs still flow
//! through the engine unchanged.

/// Integer edge weight.
pub type Weight = u32;

/// Sentinel marking the absence of an edge. Also used as the initial
/// frontier key, so it compares greater than every real edge.
pub const NO_EDGE: Weight = 9999;

/// Largest weight produced by the random graph generator.
pub const MAX_WEIGHT: Weight = 100;

/// Returns `true` when `weight` denotes a real edge.
///
/// Zero marks the diagonal and anything at or above [`NO_EDGE`] marks a gap.
///
/// # Examples
/// ```
/// use prima_core::{NO_EDGE, is_edge};
///
/// assert!(is_edge(7));
/// assert!(!is_edge(0));
/// assert!(!is_edge(NO_EDGE));
/// ```
#[must_use]
pub const fn is_edge(weight: Weight) -> bool {
    weight != 0 && weight < NO_EDGE
}

/// A square matrix of edge weights.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WeightedGraph {
    vertex_count: usize,
    weights: Vec<Weight>,
}

/// A row whose length differs from the number of rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RaggedRow {
    /// Zero-based row index.
    pub row: usize,
    /// Expected number of cells.
    pub expected: usize,
    /// Actual number of cells.
    pub actual: usize,
}

impl WeightedGraph {
    /// Builds a graph from rows, requiring one cell per row.
    ///
    /// # Errors
    /// Returns the first [`RaggedRow`] when the rows do not form a square.
    ///
    /// # Examples
    /// ```
    /// use prima_core::WeightedGraph;
    ///
    /// let graph = WeightedGraph::from_rows(vec![vec![0, 3], vec![3, 0]])
    ///     .expect("square input");
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert_eq!(graph.weight(0, 1), 3);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Weight>>) -> Result<Self, RaggedRow> {
        let vertex_count = rows.len();
        let mut weights = Vec::with_capacity(vertex_count.saturating_mul(vertex_count));
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != vertex_count {
                return Err(RaggedRow {
                    row,
                    expected: vertex_count,
                    actual: cells.len(),
                });
            }
            weights.extend(cells);
        }
        Ok(Self {
            vertex_count,
            weights,
        })
    }

    /// Builds a graph from a row-major buffer of `vertex_count²` cells.
    ///
    /// Returns `None` when the buffer length does not match.
    #[must_use]
    pub fn from_flat(vertex_count: usize, weights: Vec<Weight>) -> Option<Self> {
        (vertex_count.checked_mul(vertex_count) == Some(weights.len())).then_some(Self {
            vertex_count,
            weights,
        })
    }

    /// Row-major view of every cell.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[Weight] { &self.weights }

    /// Builds a `vertex_count` square matrix with every cell set to `weight`.
    #[must_use]
    pub fn filled(vertex_count: usize, weight: Weight) -> Self {
        Self {
            vertex_count,
            weights: vec![weight; vertex_count.saturating_mul(vertex_count)],
        }
    }

    /// Number of vertices (rows).
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns `true` when the graph has no vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.vertex_count == 0 }

    /// Weight stored at `(row, column)`.
    ///
    /// # Panics
    /// Panics when either index is outside the matrix.
    #[must_use]
    pub fn weight(&self, row: usize, column: usize) -> Weight {
        assert!(column < self.vertex_count, "column {column} out of range");
        self.weights[row * self.vertex_count + column]
    }

    /// Overwrites the weight at `(row, column)`.
    ///
    /// # Panics
    /// Panics when either index is outside the matrix.
    pub fn set(&mut self, row: usize, column: usize, weight: Weight) {
        assert!(column < self.vertex_count, "column {column} out of range");
        self.weights[row * self.vertex_count + column] = weight;
    }

    /// The outgoing weights of `vertex`.
    ///
    /// # Panics
    /// Panics when `vertex` is outside the matrix.
    #[must_use]
    pub fn row(&self, vertex: usize) -> &[Weight] {
        let start = vertex * self.vertex_count;
        &self.weights[start..start + self.vertex_count]
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Weight]> {
        // `chunks_exact(0)` panics, and an empty graph has no rows anyway.
        self.weights.chunks_exact(self.vertex_count.max(1))
    }

    /// Returns `true` when `graph[i][j] == graph[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.vertex_count).all(|row| {
            (row + 1..self.vertex_count).all(|column| {
                self.weight(row, column) == self.weight(column, row)
            })
        })
    }

    /// Number of real edges in the upper triangle.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.upper_edges().count()
    }

    /// Sum of real edge weights in the upper triangle.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.upper_edges().map(|(_, _, weight)| u64::from(weight)).sum()
    }

    /// Real edges `(row, column, weight)` with `row < column`.
    pub fn upper_edges(&self) -> impl Iterator<Item = (usize, usize, Weight)> + '_ {
        (0..self.vertex_count).flat_map(move |row| {
            (row + 1..self.vertex_count).filter_map(move |column| {
                let weight = self.weight(row, column);
                is_edge(weight).then_some((row, column, weight))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = WeightedGraph::from_rows(vec![vec![0, 1], vec![1]]).expect_err("ragged");
        assert_eq!(
            err,
            RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_graph_has_no_rows() {
        let graph = WeightedGraph::from_rows(Vec::new()).expect("empty is square");
        assert!(graph.is_empty());
        assert_eq!(graph.rows().count(), 0);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(NO_EDGE - 1, true)]
    #[case(NO_EDGE, false)]
    #[case(NO_EDGE + 7, false)]
    fn is_edge_excludes_zero_and_sentinel(#[case] weight: Weight, #[case] expected: bool) {
        assert_eq!(is_edge(weight), expected);
    }

    #[test]
    fn upper_edges_skip_gaps_and_diagonal() {
        let graph = WeightedGraph::from_rows(vec![
            vec![0, 1, NO_EDGE],
            vec![1, 0, 2],
            vec![NO_EDGE, 2, 0],
        ])
        .expect("square");
        let edges: Vec<_> = graph.upper_edges().collect();
        assert_eq!(edges, vec![(0, 1, 1), (1, 2, 2)]);
        assert_eq!(graph.total_weight(), 3);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn asymmetric_graph_is_detected() {
        let graph = WeightedGraph::from_rows(vec![vec![0, 1], vec![NO_EDGE, 0]]).expect("square");
        assert!(!graph.is_symmetric());
    }
}
