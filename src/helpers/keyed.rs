//! Keying and grouping.
//!
//! - [`PCollection::key_by`] -- pair each element with a derived key.
//! - [`PCollection::group_by_key`] -- gather all values of each key, across partitions.
//! - [`PCollection::group_by`] -- `key_by` followed by `group_by_key`.
//!
//! Grouping is a shuffle: each partition builds local groups, routes them by key
//! hash, and each bucket merges the groups routed to it. Every element lands in
//! exactly one group. Order of groups, and of values inside a group, is unspecified.

use crate::node::{KeyedShuffle, Node};
use crate::shuffle::{boxed, route_by_key};
use crate::type_token::downcast_partition;
use crate::{PCollection, Partition, RFBound};
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

struct GroupByKeyShuffle<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> KeyedShuffle for GroupByKeyShuffle<K, V>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
{
    fn local(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>> {
        let kv = downcast_partition::<Vec<(K, V)>>(input, "group_by_key local")?;
        let mut m: HashMap<K, Vec<V>> = HashMap::new();
        for (k, v) in kv {
            m.entry(k).or_default().push(v);
        }
        Ok(boxed(route_by_key(m, buckets)))
    }

    fn merge(&self, parts: Vec<Partition>) -> Result<Partition> {
        let mut acc: HashMap<K, Vec<V>> = HashMap::new();
        for p in parts {
            for (k, vs) in downcast_partition::<Vec<(K, Vec<V>)>>(p, "group_by_key merge")? {
                acc.entry(k).or_default().extend(vs);
            }
        }
        Ok(Box::new(acc.into_iter().collect::<Vec<(K, Vec<V>)>>()))
    }
}

impl<T: RFBound> PCollection<T> {
    /// Derive a key and produce `(K, T)`.
    pub fn key_by<K, F>(self, key_fn: F) -> PCollection<(K, T)>
    where
        K: RFBound + Eq + Hash,
        F: 'static + Send + Sync + Fn(&T) -> K,
    {
        self.map(move |t| (key_fn(t), t.clone()))
    }

    /// Group elements by a derived key: `T` → `(K, Vec<T>)`.
    pub fn group_by<K, F>(self, key_fn: F) -> PCollection<(K, Vec<T>)>
    where
        K: RFBound + Eq + Hash,
        F: 'static + Send + Sync + Fn(&T) -> K,
    {
        self.key_by(key_fn).group_by_key()
    }
}

impl<K: RFBound + Eq + Hash, V: RFBound> PCollection<(K, V)> {
    /// Group values by key: `(K, V)` → `(K, Vec<V>)`.
    pub fn group_by_key(self) -> PCollection<(K, Vec<V>)> {
        let shuffle: Arc<dyn KeyedShuffle> = Arc::new(GroupByKeyShuffle::<K, V>(PhantomData));
        self.then(Node::GroupByKey(shuffle))
    }
}
