//! Hash routing shared by every keyed shuffle.
//!
//! All keyed barriers route with the same fixed-key hasher, so equal keys land in
//! the same bucket index no matter which partition, operator, or run they come from.

use crate::type_token::Partition;
use std::hash::{DefaultHasher, Hash, Hasher};

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn bucket_for<K: Hash + ?Sized>(key: &K, buckets: usize) -> usize {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    (h.finish() % buckets.max(1) as u64) as usize
}

/// Split keyed rows into `buckets` vectors by key hash, keeping encounter order.
pub(crate) fn route_by_key<K: Hash, V>(
    rows: impl IntoIterator<Item = (K, V)>,
    buckets: usize,
) -> Vec<Vec<(K, V)>> {
    let mut out: Vec<Vec<(K, V)>> = (0..buckets.max(1)).map(|_| Vec::new()).collect();
    for (k, v) in rows {
        let b = bucket_for(&k, buckets);
        out[b].push((k, v));
    }
    out
}

pub(crate) fn boxed<T: Send + Sync + 'static>(parts: Vec<T>) -> Vec<Partition> {
    parts.into_iter().map(|p| Box::new(p) as Partition).collect()
}
