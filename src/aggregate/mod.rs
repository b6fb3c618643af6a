use crate::kernel::WorkerOutput;

fn by_rank<P>(mut outputs: Vec<WorkerOutput<P>>) -> Vec<WorkerOutput<P>> {
    outputs.sort_by_key(|output| output.rank);
    outputs
}

/// Element-wise sum of dense partials.
///
/// Partials are added in rank order whatever order they were gathered in,
/// so the floating-point result is reproducible.
pub fn sum(num_nodes: usize, outputs: Vec<WorkerOutput<Box<[f64]>>>) -> Box<[f64]> {
    let mut total = vec![0f64; num_nodes].into_boxed_slice();
    for output in by_rank(outputs) {
        debug_assert_eq!(output.partial.len(), num_nodes);
        total
            .iter_mut()
            .zip(output.partial.iter())
            .for_each(|(t, p)| *t += p);
    }
    total
}

/// Halves every score.
///
/// Brandes' accumulation over all sources of an undirected graph counts
/// every pair `(s, t)` once from `s` and once from `t`; this must be applied
/// exactly once, to the globally summed scores.
pub fn halve(scores: &mut [f64]) {
    scores.iter_mut().for_each(|score| *score /= 2.);
}

/// Disjoint union of sparse partials.
///
/// Every node is computed by exactly one worker, so keys never collide.
pub fn union(
    num_nodes: usize,
    outputs: Vec<WorkerOutput<Vec<(usize, f64)>>>,
) -> Box<[Option<f64>]> {
    let mut merged = vec![None; num_nodes].into_boxed_slice();
    for output in by_rank(outputs) {
        for (node, value) in output.partial {
            debug_assert!(merged[node].is_none(), "node {node} computed twice");
            merged[node] = Some(value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{halve, sum, union};
    use crate::kernel::WorkerOutput;

    fn output<P>(rank: usize, partial: P) -> WorkerOutput<P> {
        WorkerOutput {
            rank,
            partial,
            skipped: vec![],
        }
    }

    fn dense_outputs() -> Vec<WorkerOutput<Box<[f64]>>> {
        vec![
            output(0, vec![0.1, 1e16, 0.3].into_boxed_slice()),
            output(1, vec![0.2, 1., 0.7].into_boxed_slice()),
            output(2, vec![0.3, -1e16, 1. / 3.].into_boxed_slice()),
            output(3, vec![0., 1., 0.].into_boxed_slice()),
        ]
    }

    #[test]
    fn test_sum_order_independent() {
        let expected = sum(3, dense_outputs());

        for rotation in 1..4 {
            let mut outputs = dense_outputs();
            outputs.rotate_left(rotation);
            assert_eq!(sum(3, outputs), expected);
        }
        let mut outputs = dense_outputs();
        outputs.reverse();
        assert_eq!(sum(3, outputs), expected);
    }

    #[test]
    fn test_sum_and_halve() {
        let mut total = sum(
            2,
            vec![
                output(1, vec![1., 2.].into_boxed_slice()),
                output(0, vec![3., 2.].into_boxed_slice()),
            ],
        );
        halve(&mut total);
        assert_eq!(&*total, [2., 2.]);
    }

    #[test]
    fn test_sum_no_outputs() {
        assert_eq!(&*sum(3, vec![]), [0., 0., 0.]);
    }

    #[test]
    fn test_union() {
        let outputs = || {
            vec![
                output(0, vec![(0, 1.), (1, 0.5)]),
                output(1, vec![(3, 0.25)]),
                output(2, vec![]),
            ]
        };
        let expected = union(4, outputs());
        assert_eq!(&*expected, [Some(1.), Some(0.5), None, Some(0.25)]);

        let mut shuffled = outputs();
        shuffled.swap(0, 2);
        assert_eq!(union(4, shuffled), expected);
    }
}
