//! Collect-and-sort helpers for deterministic assertions and final sinks.

use crate::context::ExecutionContext;
use crate::{PCollection, RFBound};
use anyhow::Result;

impl<T: RFBound + Ord> PCollection<T> {
    /// Collect and sort with `T`'s total order.
    ///
    /// # Errors
    /// Propagates any error from [`collect`](PCollection::collect).
    pub fn collect_sorted(&self, ctx: &ExecutionContext) -> Result<Vec<T>> {
        let mut v = self.collect(ctx)?;
        v.sort();
        Ok(v)
    }

    /// Sequential [`collect_sorted`](Self::collect_sorted).
    ///
    /// ```
    /// use shopflow::*;
    ///
    /// let p = Pipeline::default();
    /// let data = from_vec(&p, vec![3, 1, 2]);
    /// assert_eq!(data.collect_seq_sorted().unwrap(), vec![1, 2, 3]);
    /// ```
    ///
    /// # Errors
    /// Propagates any error from [`collect_seq`](PCollection::collect_seq).
    pub fn collect_seq_sorted(&self) -> Result<Vec<T>> {
        let mut v = self.collect_seq()?;
        v.sort();
        Ok(v)
    }

    /// Parallel [`collect_sorted`](Self::collect_sorted).
    ///
    /// # Errors
    /// Propagates any error from [`collect_par`](PCollection::collect_par).
    pub fn collect_par_sorted(&self, threads: Option<usize>, partitions: Option<usize>) -> Result<Vec<T>> {
        let mut v = self.collect_par(threads, partitions)?;
        v.sort();
        Ok(v)
    }
}

impl<K: RFBound + Ord, V: RFBound> PCollection<(K, V)> {
    /// Collect `(K, V)` pairs ordered by key only. Values of equal keys keep their
    /// collected order.
    ///
    /// # Errors
    /// Propagates any error from [`collect`](PCollection::collect).
    pub fn collect_sorted_by_key(&self, ctx: &ExecutionContext) -> Result<Vec<(K, V)>> {
        let mut v = self.collect(ctx)?;
        v.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(v)
    }
}
