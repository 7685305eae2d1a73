//! Combiners built from plain function values.

use super::CombineFn;
use std::marker::PhantomData;

/// A combiner assembled from `create_acc`, `merge_value` and `merge_acc` functions.
///
/// The output is the accumulator itself.
///
/// ```
/// use shopflow::combiners::{CombineFn, FnCombiner};
///
/// let sum_len = FnCombiner::new(
///     |s: String| s.len(),
///     |acc: usize, s: String| acc + s.len(),
///     |a: usize, b: usize| a + b,
/// );
/// let acc = sum_len.merge_value(sum_len.create_acc("ab".to_string()), "cde".to_string());
/// assert_eq!(sum_len.finish(acc), 5);
/// ```
pub struct FnCombiner<V, A, CF, MV, MA> {
    create: CF,
    merge_value: MV,
    merge_acc: MA,
    _t: PhantomData<fn(V) -> A>,
}

impl<V, A, CF, MV, MA> FnCombiner<V, A, CF, MV, MA>
where
    CF: Fn(V) -> A,
    MV: Fn(A, V) -> A,
    MA: Fn(A, A) -> A,
{
    pub fn new(create: CF, merge_value: MV, merge_acc: MA) -> Self {
        Self {
            create,
            merge_value,
            merge_acc,
            _t: PhantomData,
        }
    }
}

impl<V, A, CF, MV, MA> CombineFn<V, A, A> for FnCombiner<V, A, CF, MV, MA>
where
    V: 'static,
    A: 'static,
    CF: Fn(V) -> A + Send + Sync + 'static,
    MV: Fn(A, V) -> A + Send + Sync + 'static,
    MA: Fn(A, A) -> A + Send + Sync + 'static,
{
    fn create_acc(&self, v: V) -> A {
        (self.create)(v)
    }

    fn merge_value(&self, acc: A, v: V) -> A {
        (self.merge_value)(acc, v)
    }

    fn merge_acc(&self, a: A, b: A) -> A {
        (self.merge_acc)(a, b)
    }

    fn finish(&self, acc: A) -> A {
        acc
    }
}

/// A combiner from one associative, commutative binary function (reduce-by-key).
pub struct ReduceFn<V, F> {
    f: F,
    _t: PhantomData<fn(V) -> V>,
}

impl<V, F: Fn(V, V) -> V> ReduceFn<V, F> {
    pub fn new(f: F) -> Self {
        Self { f, _t: PhantomData }
    }
}

impl<V, F> CombineFn<V, V, V> for ReduceFn<V, F>
where
    V: 'static,
    F: Fn(V, V) -> V + Send + Sync + 'static,
{
    fn create_acc(&self, v: V) -> V {
        v
    }

    fn merge_value(&self, acc: V, v: V) -> V {
        (self.f)(acc, v)
    }

    fn merge_acc(&self, a: V, b: V) -> V {
        (self.f)(a, b)
    }

    fn finish(&self, acc: V) -> V {
        acc
    }
}
