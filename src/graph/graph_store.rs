use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;
use webgraph::prelude::VecGraph;
use webgraph::traits::{RandomAccessGraph, SequentialLabeling};

/// Immutable undirected graph shared read-only by all workers.
///
/// Node labels are mapped to dense ids `0..num_nodes()` in first-appearance
/// order; this is the canonical node ordering the partitioner works on.
/// Every undirected edge `{u, v}` is stored as the two arcs `u -> v` and
/// `v -> u`.
pub struct GraphStore {
    graph: VecGraph,
    labels: Box<[String]>,
    index: HashMap<String, usize>,
    degrees: Box<[usize]>,
    num_edges: usize,
}

impl GraphStore {
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn nodes(&self) -> Range<usize> {
        0..self.num_nodes()
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.successors(node).into_iter()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.degrees[node]
    }

    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn node_id(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Iterates over the undirected edges as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes().flat_map(move |u| {
            self.neighbors(u)
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("num_nodes", &self.num_nodes())
            .field("num_edges", &self.num_edges)
            .finish()
    }
}

/// Incremental, idempotent construction of a [`GraphStore`].
#[derive(Debug, Default)]
pub struct GraphStoreBuilder {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    edges: BTreeSet<(usize, usize)>,
}

impl GraphStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `label`, registering it if it is new.
    pub fn add_node(&mut self, label: &str) -> usize {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_owned());
        self.index.insert(label.to_owned(), id);
        id
    }

    /// Adds the undirected edge `{a, b}`, registering both endpoints.
    ///
    /// Returns `false` if the edge was already present or is a self-loop;
    /// self-loops never lie on a shortest path and are not stored.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let u = self.add_node(a);
        let v = self.add_node(b);
        if u == v {
            return false;
        }
        self.edges.insert((u.min(v), u.max(v)))
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    pub fn build(self) -> GraphStore {
        let num_nodes = self.labels.len();
        let mut degrees = vec![0usize; num_nodes].into_boxed_slice();
        let mut arcs = Vec::with_capacity(self.edges.len() * 2);
        for &(u, v) in &self.edges {
            arcs.push((u, v));
            arcs.push((v, u));
            degrees[u] += 1;
            degrees[v] += 1;
        }
        arcs.sort_unstable();

        let mut graph = VecGraph::new();
        for node in 0..num_nodes {
            graph.add_node(node);
        }
        graph.add_arcs(arcs);
        debug_assert_eq!(graph.num_nodes(), num_nodes);

        GraphStore {
            graph,
            labels: self.labels.into_boxed_slice(),
            index: self.index,
            degrees,
            num_edges: self.edges.len(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for GraphStore {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(edges: I) -> Self {
        let mut builder = GraphStoreBuilder::new();
        for (a, b) in edges {
            builder.add_edge(a, b);
        }
        builder.build()
    }
}
