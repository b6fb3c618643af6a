use crate::graph::{GraphStore, GraphStoreBuilder};
use webgraph::graphs::random::ErdosRenyi;
use webgraph::prelude::VecGraph;
use webgraph::traits::{RandomAccessGraph, SequentialLabeling};

/// Graph on nodes labelled `"0"..num_nodes`, in this order, with the given
/// undirected edges.
pub(crate) fn from_edges(
    num_nodes: usize,
    edges: impl IntoIterator<Item = (usize, usize)>,
) -> GraphStore {
    let mut builder = GraphStoreBuilder::new();
    for i in 0..num_nodes {
        builder.add_node(&i.to_string());
    }
    for (a, b) in edges {
        debug_assert!(a < num_nodes && b < num_nodes);
        builder.add_edge(&a.to_string(), &b.to_string());
    }
    builder.build()
}

pub(crate) fn new_path(num_nodes: usize) -> GraphStore {
    from_edges(num_nodes, (1..num_nodes).map(|i| (i - 1, i)))
}

pub(crate) fn new_cycle(num_nodes: usize) -> GraphStore {
    from_edges(num_nodes, (0..num_nodes).map(|i| (i, (i + 1) % num_nodes)))
}

pub(crate) fn new_clique(num_nodes: usize) -> GraphStore {
    from_edges(
        num_nodes,
        (0..num_nodes).flat_map(|i| (i + 1..num_nodes).map(move |j| (i, j))),
    )
}

/// Center `0` and leaves `1..=leaves`.
pub(crate) fn new_star(leaves: usize) -> GraphStore {
    from_edges(leaves + 1, (1..=leaves).map(|i| (0, i)))
}

/// Two cliques of `k` nodes, `0..k` and `k..2k`, joined by the edge `{k - 1, k}`.
pub(crate) fn new_barbell(k: usize) -> GraphStore {
    let clique = |offset: usize| {
        (0..k).flat_map(move |i| (i + 1..k).map(move |j| (offset + i, offset + j)))
    };
    from_edges(2 * k, clique(0).chain(clique(k)).chain([(k - 1, k)]))
}

/// `rows × cols` grid; node `r * cols + c` is at row `r`, column `c`.
pub(crate) fn new_grid(rows: usize, cols: usize) -> GraphStore {
    let node = move |r: usize, c: usize| r * cols + c;
    let right = (0..rows).flat_map(move |r| (1..cols).map(move |c| (node(r, c - 1), node(r, c))));
    let down = (1..rows).flat_map(move |r| (0..cols).map(move |c| (node(r - 1, c), node(r, c))));
    from_edges(rows * cols, right.chain(down))
}

/// Erdős–Rényi graph with arc probability `p`, symmetrized.
pub(crate) fn new_random(num_nodes: usize, p: f64, seed: u64) -> GraphStore {
    let arcs = VecGraph::from_lender(ErdosRenyi::new(num_nodes, p, seed).iter());
    let edges: Vec<_> = (0..arcs.num_nodes())
        .flat_map(|v| arcs.successors(v).into_iter().map(move |s| (v, s)))
        .collect();
    from_edges(num_nodes, edges)
}
