use crate::comm::{self, Communicator, ROOT};
use crate::error::Error;
use crate::graph::GraphStore;
use crate::kernel::{CentralityKernel, CentralityResult, WorkerOutput};
use crate::partition::slice_bounds;
use crate::worker;
use dsi_progress_logger::{ConcurrentProgressLog, ProgressLog};
use log::{debug, info, warn};
use std::num::NonZero;
use std::sync::Arc;
use std::thread;
use std::thread::available_parallelism;

/// The steps of a run, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Init,
    GraphReady,
    Broadcasting,
    Partitioned,
    Computing,
    Gathering,
    Aggregated,
    Done,
}

/// Phase of one worker. Only the root goes through `GraphReady`,
/// `Aggregated` and `Done`.
struct PhaseTracker {
    rank: usize,
    phase: Phase,
}

impl PhaseTracker {
    fn new(rank: usize, phase: Phase) -> Self {
        Self { rank, phase }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        debug!("Worker {}: {:?} -> {:?}", self.rank, self.phase, next);
        self.phase = next;
    }
}

/// Runs a [`CentralityKernel`] over a graph split among a fixed number of
/// workers.
///
/// The calling thread acts as the root worker (rank 0): it loads the graph,
/// broadcasts it, computes its own slice, gathers the partials of the other
/// workers and aggregates them. The other workers are scoped threads that
/// live for the duration of one run.
#[derive(Clone, Copy, Debug)]
pub struct Coordinator {
    num_workers: usize,
    threads_per_worker: usize,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Coordinator {
    /// `num_workers == 0` uses one worker per available core;
    /// `threads_per_worker == 0` splits the available cores among workers.
    pub fn new(num_workers: usize, threads_per_worker: usize) -> Self {
        Self {
            num_workers,
            threads_per_worker,
        }
    }

    pub fn num_workers(&self) -> usize {
        if self.num_workers == 0 {
            available_parallelism().map_or(1, NonZero::get)
        } else {
            self.num_workers
        }
    }

    pub fn threads_per_worker(&self) -> usize {
        if self.threads_per_worker == 0 {
            (available_parallelism().map_or(1, NonZero::get) / self.num_workers()).max(1)
        } else {
            self.threads_per_worker
        }
    }

    /// Runs `kernel` on the graph shared by `graph`.
    pub fn run_on<K: CentralityKernel>(
        &self,
        kernel: &K,
        graph: Arc<GraphStore>,
        pl: &mut impl ProgressLog,
    ) -> Result<CentralityResult, Error> {
        self.run(kernel, move || Ok(graph), pl)
    }

    /// Runs `kernel` on the graph returned by `load`, which is called once,
    /// by the root, before any worker starts.
    pub fn run<K: CentralityKernel>(
        &self,
        kernel: &K,
        load: impl FnOnce() -> Result<Arc<GraphStore>, Error>,
        pl: &mut impl ProgressLog,
    ) -> Result<CentralityResult, Error> {
        let num_workers = self.num_workers();
        let num_threads = self.threads_per_worker();

        let mut phase = PhaseTracker::new(ROOT, Phase::Init);
        let graph = load()?;
        phase.enter(Phase::GraphReady);
        let num_nodes = graph.num_nodes();

        let mut cpl = pl.concurrent();
        cpl.item_name("visit").expected_updates(Some(num_nodes));
        cpl.start(format!(
            "Computing {} centrality with {} workers of {} threads...",
            kernel.centrality().name().to_lowercase(),
            num_workers,
            num_threads
        ));

        let mut comms = comm::world(num_workers).into_iter();
        let root = comms.next().ok_or(Error::CommunicationFailure {
            rank: ROOT,
            phase: Phase::Init,
        })?;

        let result = thread::scope(|scope| {
            let cpl = &cpl;
            let mut handles = Vec::with_capacity(num_workers - 1);
            for comm in comms {
                let rank = comm.rank();
                let handle = thread::Builder::new()
                    .name(format!("worker-{rank}"))
                    .spawn_scoped(scope, move || {
                        let phase = PhaseTracker::new(rank, Phase::Init);
                        run_worker(kernel, comm, None, phase, num_threads, cpl)
                    })?;
                handles.push((rank, handle));
            }

            let result = run_worker(kernel, root, Some(graph), phase, num_threads, cpl);

            for (rank, handle) in handles {
                match handle.join() {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => debug!("Worker {rank} failed: {err}"),
                    Err(_) => warn!("Worker {rank} panicked"),
                }
            }
            result
        })?;

        cpl.done_with_count(num_nodes);
        result.ok_or(Error::CommunicationFailure {
            rank: ROOT,
            phase: Phase::Gathering,
        })
    }
}

/// The life of one worker after the graph is loaded.
///
/// The root passes the graph to broadcast and gets back the aggregated
/// result; every other worker returns `None`.
fn run_worker<K: CentralityKernel>(
    kernel: &K,
    comm: Communicator<Arc<GraphStore>, WorkerOutput<K::Partial>>,
    graph: Option<Arc<GraphStore>>,
    mut phase: PhaseTracker,
    num_threads: usize,
    cpl: &impl ConcurrentProgressLog,
) -> Result<Option<CentralityResult>, Error> {
    phase.enter(Phase::Broadcasting);
    let graph = comm.broadcast(graph)?;

    let slice = slice_bounds(graph.num_nodes(), comm.size(), comm.rank());
    phase.enter(Phase::Partitioned);
    debug!("Worker {} owns nodes {:?}", comm.rank(), slice.range());

    phase.enter(Phase::Computing);
    let (partial, skipped) = worker::compute_slice(kernel, &graph, slice, num_threads, cpl)?;

    phase.enter(Phase::Gathering);
    let output = WorkerOutput {
        rank: comm.rank(),
        partial,
        skipped,
    };
    let Some(outputs) = comm.gather(output)? else {
        return Ok(None);
    };

    phase.enter(Phase::Aggregated);
    let mut skipped: Vec<_> = outputs
        .iter()
        .flat_map(|output| output.skipped.iter().copied())
        .collect();
    skipped.sort_by_key(|s| s.node);
    if !skipped.is_empty() {
        info!("{} sources skipped", skipped.len());
    }
    let scores = kernel.aggregate(&graph, outputs);

    phase.enter(Phase::Done);
    Ok(Some(CentralityResult::new(
        kernel.centrality(),
        graph,
        scores,
        skipped,
    )))
}
