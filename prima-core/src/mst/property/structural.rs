//! Property 2: structural invariants of the result.
//!
//! - **Symmetry**: the result matrix mirrors itself.
//! - **Faithful weights**: every tree cell copies the input cell.
//! - **Acyclicity**: parent edges never close a cycle.
//! - **Edge count**: `V - C` edges for `C` components.
//! - **Minimality**: total weight equals the Kruskal forest.
//! - **Roots**: one root per component; phantom selections account for
//!   every root except the start vertex.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    graph::{NO_EDGE, WeightedGraph},
    mst::{MstOutcome, sequential_prim},
};

use super::{
    oracle::{find_root, kruskal_forest},
    types::MstFixture,
};

/// Checks the sequential outcome against the invariants above.
pub(super) fn run_structural_invariants_property(fixture: &MstFixture) -> TestCaseResult {
    let graph = &fixture.graph;
    let outcome = sequential_prim(graph).map_err(|err| {
        TestCaseError::fail(format!("sequential failed: {err} ({})", fixture.describe()))
    })?;
    let matrix = outcome.to_matrix(graph);
    let forest = kruskal_forest(graph);
    let context = fixture.describe();

    ensure(matrix.is_symmetric(), || format!("result is not symmetric ({context})"))?;
    validate_cells(graph, &matrix, &context)?;
    validate_acyclic(&outcome, &context)?;

    let vertex_count = graph.vertex_count();
    ensure(outcome.order.len() == vertex_count - 1, || {
        format!(
            "expected {} selections, got {} ({context})",
            vertex_count - 1,
            outcome.order.len(),
        )
    })?;
    ensure(outcome.edge_count() == forest.edge_count, || {
        format!(
            "edge count {} but forest has {} ({context})",
            outcome.edge_count(),
            forest.edge_count,
        )
    })?;
    ensure(matrix.total_weight() == forest.total_weight, || {
        format!(
            "weight {} but forest weighs {} ({context})",
            matrix.total_weight(),
            forest.total_weight,
        )
    })?;
    validate_roots(&outcome, forest.component_count, &context)
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> TestCaseResult {
    if condition {
        Ok(())
    } else {
        Err(TestCaseError::fail(message()))
    }
}

/// Tree cells copy the input; everything else is the sentinel.
fn validate_cells(graph: &WeightedGraph, matrix: &WeightedGraph, context: &str) -> TestCaseResult {
    for (row, cells) in matrix.rows().enumerate() {
        for (column, &cell) in cells.iter().enumerate() {
            ensure(cell == NO_EDGE || cell == graph.weight(row, column), || {
                format!("cell ({row}, {column}) = {cell} is not an input weight ({context})")
            })?;
        }
        ensure(cells[row] == NO_EDGE, || format!("diagonal {row} is set ({context})"))?;
    }
    Ok(())
}

fn validate_acyclic(outcome: &MstOutcome, context: &str) -> TestCaseResult {
    let mut parent: Vec<usize> = (0..outcome.parents.len()).collect();
    for (vertex, tree_parent) in outcome.parents.iter().enumerate() {
        let Some(tree_parent) = *tree_parent else {
            continue;
        };
        let root_a = find_root(&mut parent, vertex);
        let root_b = find_root(&mut parent, tree_parent);
        ensure(root_a != root_b, || {
            format!("edge ({tree_parent}, {vertex}) closes a cycle ({context})")
        })?;
        parent[root_a] = root_b;
    }
    Ok(())
}

fn validate_roots(outcome: &MstOutcome, components: usize, context: &str) -> TestCaseResult {
    let roots = outcome.parents.iter().filter(|parent| parent.is_none()).count();
    ensure(roots == components, || {
        format!("{roots} roots for {components} components ({context})")
    })?;

    let expected = components - 1;
    ensure(outcome.phantom_selections == expected, || {
        format!(
            "{} phantom selections, expected {expected} ({context})",
            outcome.phantom_selections,
        )
    })
}
