use crate::aggregate;
use crate::coordinator::Coordinator;
use crate::error::{Error, SourceError};
use crate::graph::GraphStore;
use crate::kernel::{Centrality, CentralityKernel, CentralityResult, WorkerOutput};
use dsi_progress_logger::ProgressLog;
use std::collections::VecDeque;
use std::sync::Arc;

/// Computes the betweenness centrality of every node of `graph` on
/// `num_of_workers` workers (0 means one per core).
pub fn compute(
    graph: Arc<GraphStore>,
    num_of_workers: usize,
    pl: &mut impl ProgressLog,
) -> Result<CentralityResult, Error> {
    Coordinator::new(num_of_workers, 1).run_on(&BrandesKernel::default(), graph, pl)
}

/// Brandes' algorithm for unweighted undirected graphs.
///
/// Every visit adds the dependencies of one source to a dense partial. The
/// aggregated scores are halved once, since each pair of nodes is reached
/// from both of its endpoints.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrandesKernel {
    /// Scale the scores by `2 / ((n - 1)(n - 2))`.
    pub normalized: bool,
}

impl BrandesKernel {
    pub fn normalized() -> Self {
        Self { normalized: true }
    }
}

impl CentralityKernel for BrandesKernel {
    type Scratch = TraversalState;
    type Partial = Box<[f64]>;

    fn centrality(&self) -> Centrality {
        Centrality::Betweenness
    }

    fn scratch(&self, graph: &GraphStore) -> TraversalState {
        TraversalState::new(graph.num_nodes())
    }

    fn partial(&self, graph: &GraphStore) -> Box<[f64]> {
        vec![0f64; graph.num_nodes()].into_boxed_slice()
    }

    fn visit(
        &self,
        graph: &GraphStore,
        source: usize,
        scratch: &mut TraversalState,
        partial: &mut Box<[f64]>,
    ) -> Result<(), SourceError> {
        if graph.degree(source) > 0 {
            scratch.accumulate(graph, source, partial);
        }
        Ok(())
    }

    fn merge(&self, into: &mut Box<[f64]>, other: Box<[f64]>) {
        into.iter_mut().zip(other.iter()).for_each(|(a, b)| *a += b);
    }

    fn aggregate(
        &self,
        graph: &GraphStore,
        outputs: Vec<WorkerOutput<Box<[f64]>>>,
    ) -> Box<[Option<f64>]> {
        let num_nodes = graph.num_nodes();
        let mut betweenness = aggregate::sum(num_nodes, outputs);
        aggregate::halve(&mut betweenness);

        if self.normalized && num_nodes > 2 {
            let scale = 2. / ((num_nodes - 1) * (num_nodes - 2)) as f64;
            betweenness.iter_mut().for_each(|b| *b *= scale);
        }
        betweenness.iter().map(|&b| Some(b)).collect()
    }
}

/// State of a single-source visit, allocated once per thread.
///
/// Only the nodes reached by the previous visit are reset before the next
/// one, so a visit costs time proportional to the part of the graph it
/// reaches.
pub struct TraversalState {
    sigma: Box<[f64]>,
    distance: Box<[i32]>,
    pred: Box<[Vec<usize>]>,
    delta: Box<[f64]>,
    queue: VecDeque<usize>,
    stack: Vec<usize>,
}

impl TraversalState {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            sigma: vec![0.; num_nodes].into_boxed_slice(),
            distance: vec![-1; num_nodes].into_boxed_slice(),
            pred: (0..num_nodes).map(|_| Vec::new()).collect(),
            delta: vec![0.; num_nodes].into_boxed_slice(),
            queue: VecDeque::new(),
            stack: Vec::new(),
        }
    }

    fn reset(&mut self) {
        for &node in &self.stack {
            self.sigma[node] = 0.;
            self.distance[node] = -1;
            self.pred[node].clear();
            self.delta[node] = 0.;
        }
        self.stack.clear();
        self.queue.clear();
    }

    /// Adds to `betweenness` the dependency of every node other than `source`
    /// on `source`.
    ///
    /// Path counts are kept as `f64`; only their ratios are used.
    pub fn accumulate(&mut self, graph: &GraphStore, source: usize, betweenness: &mut [f64]) {
        self.reset();
        let Self {
            sigma,
            distance,
            pred,
            delta,
            queue,
            stack,
        } = self;

        distance[source] = 0;
        sigma[source] = 1.;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            stack.push(node);
            let d = distance[node];
            debug_assert_ne!(d, -1);
            let curr_sigma = sigma[node];
            for s in graph.neighbors(node) {
                if distance[s] == -1 {
                    distance[s] = d + 1;
                    queue.push_back(s);
                }
                if distance[s] == d + 1 {
                    pred[s].push(node);
                    sigma[s] += curr_sigma;
                }
            }
        }

        for &node in stack.iter().rev() {
            let coefficient = (1. + delta[node]) / sigma[node];
            for &p in &pred[node] {
                delta[p] += sigma[p] * coefficient;
            }
            if node != source {
                betweenness[node] += delta[node];
            }
        }
    }
}
