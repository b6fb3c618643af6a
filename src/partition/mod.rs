use std::ops::Range;

/// The contiguous range of canonical node ids owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeSlice {
    pub start: usize,
    pub len: usize,
}

impl NodeSlice {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The `i`-th node of the slice.
    pub fn node(&self, i: usize) -> usize {
        debug_assert!(i < self.len);
        self.start + i
    }
}

/// Computes the slice of `num_nodes` nodes owned by `worker_index` among
/// `num_workers` workers.
///
/// Every worker gets `num_nodes / num_workers` nodes, and the first
/// `num_nodes % num_workers` workers get one more. Workers evaluate this
/// independently, so it must stay a pure function of its arguments. With no
/// workers, or an index past the last worker, the slice is empty.
pub fn slice_bounds(num_nodes: usize, num_workers: usize, worker_index: usize) -> NodeSlice {
    if num_workers == 0 || worker_index >= num_workers {
        return NodeSlice {
            start: num_nodes,
            len: 0,
        };
    }
    let base = num_nodes / num_workers;
    let remainder = num_nodes % num_workers;

    if worker_index < remainder {
        NodeSlice {
            start: worker_index * (base + 1),
            len: base + 1,
        }
    } else {
        NodeSlice {
            start: remainder * (base + 1) + (worker_index - remainder) * base,
            len: base,
        }
    }
}

/// The sub-sequence of `nodes` owned by `worker_index`.
pub fn partition<T>(nodes: &[T], num_workers: usize, worker_index: usize) -> &[T] {
    &nodes[slice_bounds(nodes.len(), num_workers, worker_index).range()]
}
