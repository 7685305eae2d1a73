//! Top-K selection over a key-sorted, grouped collection.
//!
//! ```no_run
//! use shopflow::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let p = Pipeline::default();
//! let ctx = ExecutionContext::parallel();
//! let trips = from_vec(&p, vec![
//!     ("c1".to_string(), 4u64),
//!     ("c2".to_string(), 9),
//!     ("c3".to_string(), 4),
//!     ("c4".to_string(), 1),
//! ]);
//!
//! // The two rows with the most trips.
//! let top = trips.top_k_by(&ctx, 2, |(_, n)| *n)?;
//! assert_eq!(top[0], ("c2".to_string(), 9));
//! assert_eq!(top[1].1, 4);
//! # Ok(())
//! # }
//! ```

use crate::context::ExecutionContext;
use crate::{PCollection, RFBound};
use anyhow::Result;
use std::hash::Hash;

impl<K: RFBound, V: RFBound> PCollection<(K, Vec<V>)> {
    /// Flatten the groups in their established order and return the first `k` values.
    ///
    /// Yields `min(k, total values)` elements; `k == 0` yields none.
    ///
    /// # Errors
    /// Propagates any failure while evaluating the collection.
    pub fn top_k(&self, ctx: &ExecutionContext, k: usize) -> Result<Vec<V>> {
        self.clone().flatten_groups().take(ctx, k)
    }
}

impl<T: RFBound> PCollection<T> {
    /// Group by `key_fn`, sort the groups by key descending, and return the first `k`
    /// elements. Elements sharing a key come out in no particular order.
    ///
    /// # Errors
    /// Propagates any failure while evaluating the collection.
    pub fn top_k_by<K, F>(&self, ctx: &ExecutionContext, k: usize, key_fn: F) -> Result<Vec<T>>
    where
        K: RFBound + Ord + Hash,
        F: 'static + Send + Sync + Fn(&T) -> K,
    {
        self.clone().group_by(key_fn).sort_by_key(true).top_k(ctx, k)
    }
}
