//! Combiners for [`combine_by_key`](crate::PCollection::combine_by_key).
//!
//! A combiner is the three-function aggregation strategy used by keyed
//! combines:
//!
//! - `create_acc(v)` builds an accumulator from the first value a partition
//!   sees for a key,
//! - `merge_value(acc, v)` folds further same-partition values into it,
//! - `merge_acc(a, b)` merges accumulators for one key coming from different
//!   partitions,
//!
//! followed by `finish(acc)` once all partials for a key are merged.
//!
//! `merge_acc` must be associative and commutative, and `merge_value` must agree
//! with `merge_acc(acc, create_acc(v))`. When they do, the result for a key does
//! not depend on how the input is partitioned or in which order partials
//! arrive. Nothing checks this at runtime; a combiner that breaks it silently
//! yields wrong aggregates. [`check_combiner_laws`] exercises the laws on sample
//! values and belongs in the combiner's tests.
//!
//! Built-ins:
//! - [`Sum<T>`] -- sum of values.
//! - [`Count`] -- number of values.
//! - [`Max<T>`] -- maximum value.
//! - [`AverageF64`] -- mean through a `(sum, count)` accumulator.
//! - [`FnCombiner`] -- any three function values.

mod basic;
mod fns;
mod statistical;

pub use basic::{Count, Max, Sum};
pub use fns::{FnCombiner, ReduceFn};
pub use statistical::AverageF64;

use std::fmt::Debug;

/// Per-key aggregation strategy: `V` values, `A` accumulator, `O` output.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create_acc(&self, v: V) -> A;
    fn merge_value(&self, acc: A, v: V) -> A;
    fn merge_acc(&self, a: A, b: A) -> A;
    fn finish(&self, acc: A) -> O;
}

/// Check the combiner laws over every split of `values`.
///
/// For each split point and both orders, folds each side with
/// `create_acc`/`merge_value`, merges the partials with `merge_acc`, and compares
/// the finished result against a single left-to-right fold. Also checks that
/// `merge_acc` is associative over the first three values when there are
/// at least three.
///
/// # Panics
/// Panics with the offending split when a law does not hold.
pub fn check_combiner_laws<C, V, A, O>(comb: &C, values: &[V])
where
    C: CombineFn<V, A, O>,
    V: Clone + Debug,
    A: Clone,
    O: PartialEq + Debug,
{
    let fold = |vs: &[V]| -> Option<A> {
        let mut it = vs.iter().cloned();
        let first = it.next()?;
        Some(it.fold(comb.create_acc(first), |acc, v| comb.merge_value(acc, v)))
    };

    let Some(whole) = fold(values) else {
        return;
    };
    let expected = comb.finish(whole);

    for cut in 1..values.len() {
        let (l, r) = values.split_at(cut);
        let (Some(la), Some(ra)) = (fold(l), fold(r)) else {
            continue;
        };
        let lr = comb.finish(comb.merge_acc(la.clone(), ra.clone()));
        let rl = comb.finish(comb.merge_acc(ra, la));
        assert_eq!(lr, expected, "merge_acc(left, right) differs at split {cut} of {values:?}");
        assert_eq!(rl, expected, "merge_acc(right, left) differs at split {cut} of {values:?}");
    }

    if let [a, b, c, ..] = values {
        let (a, b, c) = (
            comb.create_acc(a.clone()),
            comb.create_acc(b.clone()),
            comb.create_acc(c.clone()),
        );
        let left = comb.finish(comb.merge_acc(comb.merge_acc(a.clone(), b.clone()), c.clone()));
        let right = comb.finish(comb.merge_acc(a, comb.merge_acc(b, c)));
        assert_eq!(left, right, "merge_acc is not associative over {values:?}");
    }
}
