//! Basic arithmetic combiners: Sum, Count, Max

use super::CombineFn;
use crate::RFBound;
use std::marker::PhantomData;
use std::ops::Add;

/* ===================== Sum<T> ===================== */

/// Sum of values per key.
///
/// - Accumulator: `T`
/// - Output: `T`
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(pub PhantomData<T>);
impl<T> Sum<T> {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: RFBound + Add<Output = T>,
{
    fn create_acc(&self, v: T) -> T {
        v
    }

    fn merge_value(&self, acc: T, v: T) -> T {
        acc + v
    }

    fn merge_acc(&self, a: T, b: T) -> T {
        a + b
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Count ===================== */

/// Number of values per key.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create_acc(&self, _v: V) -> u64 {
        1
    }

    fn merge_value(&self, acc: u64, _v: V) -> u64 {
        acc + 1
    }

    fn merge_acc(&self, a: u64, b: u64) -> u64 {
        a + b
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Max<T> ===================== */

/// Maximum value per key (requires `Ord`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Max<T>(pub PhantomData<T>);
impl<T> Max<T> {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Max<T>
where
    T: RFBound + Ord,
{
    fn create_acc(&self, v: T) -> T {
        v
    }

    fn merge_value(&self, acc: T, v: T) -> T {
        acc.max(v)
    }

    fn merge_acc(&self, a: T, b: T) -> T {
        a.max(b)
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiners::check_combiner_laws;

    #[test]
    fn sum_count_max_obey_laws() {
        let xs = [4i64, -2, 9, 9, 0, 13];
        check_combiner_laws(&Sum::<i64>::new(), &xs);
        check_combiner_laws(&Count, &xs);
        check_combiner_laws(&Max::<i64>::new(), &xs);
    }

    #[test]
    fn count_ignores_values() {
        let acc = Count.merge_value(Count.create_acc("a"), "b");
        assert_eq!(CombineFn::<&str, u64, u64>::finish(&Count, acc), 2);
    }
}
