//! Value-only transforms for keyed collections.
//!
//! - [`map_values`](PCollection::map_values) -- apply `&V -> O`, keeping keys
//! - [`filter_values`](PCollection::filter_values) -- keep pairs whose value matches
//! - [`keys`](PCollection::keys) / [`values`](PCollection::values) -- project one side
//! - [`flatten_groups`](PCollection::flatten_groups) -- `(K, Vec<V>)` back to `V`

use crate::{PCollection, RFBound};

impl<K: RFBound, V: RFBound> PCollection<(K, V)> {
    pub fn map_values<O, F>(self, f: F) -> PCollection<(K, O)>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&V) -> O,
    {
        self.map(move |(k, v)| (k.clone(), f(v)))
    }

    pub fn filter_values<F>(self, pred: F) -> PCollection<(K, V)>
    where
        F: 'static + Send + Sync + Fn(&V) -> bool,
    {
        self.filter(move |(_, v)| pred(v))
    }

    #[must_use]
    pub fn keys(self) -> PCollection<K> {
        self.map(|(k, _)| k.clone())
    }

    #[must_use]
    pub fn values(self) -> PCollection<V> {
        self.map(|(_, v)| v.clone())
    }
}

impl<K: RFBound, V: RFBound> PCollection<(K, Vec<V>)> {
    /// Emit every grouped value, group by group.
    ///
    /// Runs inside each partition, so an order established by `sort_by_key` on the
    /// groups carries over to the flattened values.
    #[must_use]
    pub fn flatten_groups(self) -> PCollection<V> {
        self.flat_map(|(_, vs)| vs.clone())
    }
}
