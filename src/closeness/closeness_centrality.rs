use crate::aggregate;
use crate::coordinator::Coordinator;
use crate::error::{Error, SourceError};
use crate::graph::GraphStore;
use crate::kernel::{Centrality, CentralityKernel, CentralityResult, WorkerOutput};
use dsi_progress_logger::ProgressLog;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

const UNREACHED: u64 = u64::MAX;
const ARC_WEIGHT: u64 = 1;

/// Computes the closeness centrality of every node of `graph` on
/// `num_of_workers` workers (0 means one per core).
///
/// Nodes that reach no other node have no closeness and are listed in
/// [`CentralityResult::skipped`].
pub fn compute(
    graph: Arc<GraphStore>,
    num_of_workers: usize,
    pl: &mut impl ProgressLog,
) -> Result<CentralityResult, Error> {
    Coordinator::new(num_of_workers, 1).run_on(&DijkstraClosenessKernel, graph, pl)
}

/// Closeness `(n - 1) / Σ d(s, v)`, where `n` is the number of nodes of the
/// graph and the sum ranges over the nodes reachable from `s`.
///
/// Distances come from a Dijkstra visit with unit arc weights.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraClosenessKernel;

impl CentralityKernel for DijkstraClosenessKernel {
    type Scratch = DijkstraState;
    type Partial = Vec<(usize, f64)>;

    fn centrality(&self) -> Centrality {
        Centrality::Closeness
    }

    fn scratch(&self, graph: &GraphStore) -> DijkstraState {
        DijkstraState::new(graph.num_nodes())
    }

    fn partial(&self, _graph: &GraphStore) -> Vec<(usize, f64)> {
        Vec::new()
    }

    fn visit(
        &self,
        graph: &GraphStore,
        source: usize,
        scratch: &mut DijkstraState,
        partial: &mut Vec<(usize, f64)>,
    ) -> Result<(), SourceError> {
        let distance_sum = scratch.distance_sum(graph, source);
        if distance_sum == 0 {
            return Err(SourceError::ZeroDistanceSum { node: source });
        }
        partial.push((source, (graph.num_nodes() - 1) as f64 / distance_sum as f64));
        Ok(())
    }

    fn merge(&self, into: &mut Vec<(usize, f64)>, other: Vec<(usize, f64)>) {
        into.extend(other);
    }

    fn aggregate(
        &self,
        graph: &GraphStore,
        outputs: Vec<WorkerOutput<Vec<(usize, f64)>>>,
    ) -> Box<[Option<f64>]> {
        aggregate::union(graph.num_nodes(), outputs)
    }
}

pub struct DijkstraState {
    distance: Box<[u64]>,
    frontier: BinaryHeap<Reverse<(u64, usize)>>,
    touched: Vec<usize>,
}

impl DijkstraState {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            distance: vec![UNREACHED; num_nodes].into_boxed_slice(),
            frontier: BinaryHeap::new(),
            touched: Vec::new(),
        }
    }

    fn reset(&mut self) {
        for &node in &self.touched {
            self.distance[node] = UNREACHED;
        }
        self.touched.clear();
        self.frontier.clear();
    }

    /// Sum of the distances from `source` to the nodes it reaches.
    pub fn distance_sum(&mut self, graph: &GraphStore, source: usize) -> u64 {
        self.reset();
        self.distance[source] = 0;
        self.touched.push(source);
        self.frontier.push(Reverse((0, source)));

        let mut sum = 0;
        while let Some(Reverse((d, node))) = self.frontier.pop() {
            if d > self.distance[node] {
                // stale entry
                continue;
            }
            sum += d;
            for s in graph.neighbors(node) {
                let alt = d + ARC_WEIGHT;
                if alt < self.distance[s] {
                    if self.distance[s] == UNREACHED {
                        self.touched.push(s);
                    }
                    self.distance[s] = alt;
                    self.frontier.push(Reverse((alt, s)));
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::{compute, DijkstraClosenessKernel, DijkstraState};
    use crate::coordinator::Coordinator;
    use crate::error::SourceError;
    use crate::graph::GraphStore;
    use crate::kernel::{CentralityResult, SkippedSource};
    use crate::utils::{from_edges, new_clique, new_cycle, new_path, new_random, new_star};
    use assert_approx_eq::assert_approx_eq;
    use dsi_progress_logger::no_logging;
    use std::collections::VecDeque;
    use std::sync::Arc;

    const STRATEGIES: [(usize, usize); 4] = [(1, 1), (4, 1), (3, 2), (16, 1)];

    fn compute_with(graph: &Arc<GraphStore>, workers: usize, threads: usize) -> CentralityResult {
        Coordinator::new(workers, threads)
            .run_on(&DijkstraClosenessKernel, Arc::clone(graph), no_logging!())
            .unwrap()
    }

    fn check(graph: GraphStore, expected: &[Option<f64>]) {
        let graph = Arc::new(graph);
        for (workers, threads) in STRATEGIES {
            let closeness = compute_with(&graph, workers, threads);
            for i in 0..graph.num_nodes() {
                match (closeness.score(i), expected[i]) {
                    (Some(value), Some(expected)) => assert_approx_eq!(value, expected, 1E-12),
                    (value, expected) => assert_eq!(value, expected, "node {i}"),
                }
            }
        }
    }

    fn bfs_distance_sum(graph: &GraphStore, source: usize) -> usize {
        let mut distance = vec![usize::MAX; graph.num_nodes()];
        let mut queue = VecDeque::from([source]);
        distance[source] = 0;
        let mut sum = 0;
        while let Some(v) = queue.pop_front() {
            sum += distance[v];
            for w in graph.neighbors(v) {
                if distance[w] == usize::MAX {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
            }
        }
        sum
    }

    #[test]
    fn test_path() {
        check(new_path(3), &[Some(2. / 3.), Some(1.), Some(2. / 3.)]);
    }

    #[test]
    fn test_star() {
        check(new_star(3), &[Some(1.), Some(0.6), Some(0.6), Some(0.6)]);
    }

    #[test]
    fn test_cycle() {
        for size in [10, 11, 50, 51, 100] {
            let sum: usize = (1..size).map(|i| i.min(size - i)).sum();
            let expected = (size - 1) as f64 / sum as f64;
            check(new_cycle(size), &vec![Some(expected); size]);
        }
    }

    #[test]
    fn test_clique() {
        for size in [2, 10, 50] {
            check(new_clique(size), &vec![Some(1.); size]);
        }
    }

    #[test]
    fn test_random() {
        for p in [0.05, 0.2, 0.5] {
            for size in [10, 50, 100] {
                let graph = new_random(size, p, 31 * size as u64);
                let expected: Vec<_> = (0..size)
                    .map(|s| match bfs_distance_sum(&graph, s) {
                        0 => None,
                        sum => Some((size - 1) as f64 / sum as f64),
                    })
                    .collect();
                check(graph, &expected);
            }
        }
    }

    #[test]
    fn test_isolated_node() {
        // star 0-{1, 2, 3} plus isolated node 4
        let graph = Arc::new(from_edges(5, [(0, 1), (0, 2), (0, 3)]));
        for (workers, threads) in STRATEGIES {
            let closeness = compute_with(&graph, workers, threads);

            assert_approx_eq!(closeness.score(0).unwrap(), 4. / 3., 1E-12);
            (1..4).for_each(|i| assert_approx_eq!(closeness.score(i).unwrap(), 0.8, 1E-12));
            assert_eq!(closeness.score(4), None);
            assert_eq!(closeness.get("4"), None);
            assert_eq!(
                closeness.skipped(),
                [SkippedSource {
                    node: 4,
                    error: SourceError::ZeroDistanceSum { node: 4 }
                }]
            );
            assert_eq!(closeness.iter().count(), 4);
        }
    }

    #[test]
    fn test_disconnected() {
        // reachable distances only, but n - 1 counts every node
        let graph = from_edges(4, [(0, 1), (2, 3)]);
        check(graph, &[Some(3.), Some(3.), Some(3.), Some(3.)]);
    }

    #[test]
    fn test_single_node() {
        let graph = Arc::new(from_edges(1, Vec::new()));
        let closeness = compute(graph, 2, no_logging!()).unwrap();

        assert_eq!(closeness.score(0), None);
        assert_eq!(closeness.skipped().len(), 1);
    }

    #[test]
    fn test_state_reuse() {
        let graph = new_random(80, 0.04, 11);
        let mut state = DijkstraState::new(graph.num_nodes());
        for source in (0..graph.num_nodes()).chain(0..graph.num_nodes()) {
            assert_eq!(
                state.distance_sum(&graph, source) as usize,
                bfs_distance_sum(&graph, source)
            );
        }
    }
}
