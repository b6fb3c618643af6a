use crate::error::Error;
use crate::graph::GraphStore;
use crate::kernel::{CentralityKernel, SkippedSource};
use crate::partition::NodeSlice;
use atomic_counter::AtomicCounter;
use dsi_progress_logger::ConcurrentProgressLog;
use log::{debug, warn};
use std::sync::{Mutex, PoisonError};

/// Visits every source of `slice` with `kernel` on `num_threads` threads
/// and returns the reduced partial of the worker.
///
/// Sources are handed out through a shared counter; each thread owns its
/// scratch state and a local partial, which is folded into the worker
/// partial once the thread runs out of sources.
pub fn compute_slice<K: CentralityKernel>(
    kernel: &K,
    graph: &GraphStore,
    slice: NodeSlice,
    num_threads: usize,
    cpl: &impl ConcurrentProgressLog,
) -> Result<(K::Partial, Vec<SkippedSource>), Error> {
    if slice.is_empty() {
        return Ok((kernel.partial(graph), vec![]));
    }

    let num_threads = num_threads.clamp(1, slice.len);
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    let atomic_counter = atomic_counter::RelaxedCounter::new(0);
    let reduced = Mutex::new(kernel.partial(graph));
    let skipped = Mutex::new(Vec::new());

    thread_pool.in_place_scope(|scope| {
        for _ in 0..thread_pool.current_num_threads() {
            scope.spawn(|_| {
                let mut cpl = cpl.clone();
                let mut scratch = kernel.scratch(graph);
                let mut partial = kernel.partial(graph);
                let mut local_skipped = Vec::new();

                loop {
                    let i = atomic_counter.inc();
                    if i >= slice.len {
                        break;
                    }
                    let source = slice.node(i);
                    if let Err(error) = kernel.visit(graph, source, &mut scratch, &mut partial) {
                        warn!("Skipping source {}: {error}", graph.label(error.node()));
                        local_skipped.push(SkippedSource {
                            node: error.node(),
                            error,
                        });
                    }
                    cpl.update();
                }

                kernel.merge(
                    &mut reduced.lock().unwrap_or_else(PoisonError::into_inner),
                    partial,
                );
                skipped
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(local_skipped);
            });
        }
    });

    let mut skipped = skipped.into_inner().unwrap_or_else(PoisonError::into_inner);
    skipped.sort_by_key(|s| s.node);
    debug!(
        "Visited {} sources from {} on {} threads, {} skipped",
        slice.len,
        slice.start,
        num_threads,
        skipped.len()
    );
    Ok((
        reduced.into_inner().unwrap_or_else(PoisonError::into_inner),
        skipped,
    ))
}
