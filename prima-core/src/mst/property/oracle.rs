//! Sequential Kruskal oracle.
//!
//! Independent of the Prim machinery: it sorts the real edges of the upper
//! triangle and joins components with a union-find. Only totals are
//! compared, since equal-weight edges may legitimately yield different
//! trees.

use crate::graph::WeightedGraph;

/// Totals of the minimum spanning forest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct KruskalForest {
    /// Sum of forest edge weights.
    pub total_weight: u64,
    /// Number of forest edges.
    pub edge_count: usize,
    /// Number of connected components.
    pub component_count: usize,
}

/// Computes the minimum spanning forest of `graph` with Kruskal's algorithm.
pub(super) fn kruskal_forest(graph: &WeightedGraph) -> KruskalForest {
    let vertex_count = graph.vertex_count();
    let mut edges: Vec<_> = graph.upper_edges().collect();
    edges.sort_unstable_by_key(|&(a, b, weight)| (weight, a, b));

    let mut parent: Vec<usize> = (0..vertex_count).collect();
    let mut forest = KruskalForest {
        total_weight: 0,
        edge_count: 0,
        component_count: vertex_count,
    };
    for (a, b, weight) in edges {
        let root_a = find_root(&mut parent, a);
        let root_b = find_root(&mut parent, b);
        if root_a != root_b {
            parent[root_a] = root_b;
            forest.total_weight += u64::from(weight);
            forest.edge_count += 1;
            forest.component_count -= 1;
        }
    }
    forest
}

/// Path-halving find.
pub(super) fn find_root(parent: &mut [usize], mut vertex: usize) -> usize {
    while parent[vertex] != vertex {
        parent[vertex] = parent[parent[vertex]];
        vertex = parent[vertex];
    }
    vertex
}
