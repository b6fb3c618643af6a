use crate::error::SourceError;
use crate::graph::GraphStore;
use std::sync::Arc;

/// The centrality a kernel computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Centrality {
    Betweenness,
    Closeness,
}

impl Centrality {
    pub fn name(&self) -> &'static str {
        match self {
            Centrality::Betweenness => "Betweenness",
            Centrality::Closeness => "Closeness",
        }
    }
}

/// A source whose contribution was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedSource {
    pub node: usize,
    pub error: SourceError,
}

/// The result a worker hands to the gather.
#[derive(Debug)]
pub struct WorkerOutput<P> {
    pub rank: usize,
    pub partial: P,
    pub skipped: Vec<SkippedSource>,
}

/// A per-source shortest-path computation.
///
/// A worker allocates one [`Scratch`](CentralityKernel::Scratch) and one
/// [`Partial`](CentralityKernel::Partial) per thread, calls
/// [`visit`](CentralityKernel::visit) once for every source it owns, and
/// reduces the thread partials with [`merge`](CentralityKernel::merge). The
/// root then turns the partials of all workers into the final scores with
/// [`aggregate`](CentralityKernel::aggregate).
pub trait CentralityKernel: Sync {
    /// Traversal state reused across sources.
    type Scratch: Send;
    /// Accumulated contribution of a set of sources.
    type Partial: Send;

    fn centrality(&self) -> Centrality;

    fn scratch(&self, graph: &GraphStore) -> Self::Scratch;

    fn partial(&self, graph: &GraphStore) -> Self::Partial;

    /// Folds the contribution of `source` into `partial`.
    ///
    /// On error `partial` must be left as if `source` had not been visited.
    fn visit(
        &self,
        graph: &GraphStore,
        source: usize,
        scratch: &mut Self::Scratch,
        partial: &mut Self::Partial,
    ) -> Result<(), SourceError>;

    fn merge(&self, into: &mut Self::Partial, other: Self::Partial);

    /// Merges the partials of all workers into one score per node, `None`
    /// meaning undefined.
    ///
    /// The result must not depend on the order of `outputs`.
    fn aggregate(
        &self,
        graph: &GraphStore,
        outputs: Vec<WorkerOutput<Self::Partial>>,
    ) -> Box<[Option<f64>]>;
}

/// Final centrality of every node of a graph.
#[derive(Debug)]
pub struct CentralityResult {
    centrality: Centrality,
    graph: Arc<GraphStore>,
    scores: Box<[Option<f64>]>,
    skipped: Vec<SkippedSource>,
}

impl CentralityResult {
    pub fn new(
        centrality: Centrality,
        graph: Arc<GraphStore>,
        scores: Box<[Option<f64>]>,
        skipped: Vec<SkippedSource>,
    ) -> Self {
        debug_assert_eq!(scores.len(), graph.num_nodes());
        Self {
            centrality,
            graph,
            scores,
            skipped,
        }
    }

    pub fn centrality(&self) -> Centrality {
        self.centrality
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Score of a node by id; `None` if it is undefined.
    pub fn score(&self, node: usize) -> Option<f64> {
        self.scores.get(node).copied().flatten()
    }

    /// Score of a node by label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.graph.node_id(label).and_then(|node| self.score(node))
    }

    pub fn scores(&self) -> &[Option<f64>] {
        &self.scores
    }

    /// Labels and scores of the nodes with a defined score, in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores
            .iter()
            .enumerate()
            .filter_map(|(node, score)| score.map(|score| (self.graph.label(node), score)))
    }

    /// Sources whose contribution was discarded, by node id.
    pub fn skipped(&self) -> &[SkippedSource] {
        &self.skipped
    }
}
