//! Combine-by-key.
//!
//! Each partition folds its values into one accumulator per key with
//! `create_acc`/`merge_value`, so only one partial per key and partition crosses
//! the shuffle. Buckets then fold the partials with `merge_acc` and `finish` them.

use crate::combiners::{CombineFn, FnCombiner, ReduceFn};
use crate::node::{KeyedShuffle, Node};
use crate::shuffle::{boxed, route_by_key};
use crate::type_token::downcast_partition;
use crate::{PCollection, Partition, RFBound};
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

struct CombineShuffle<K, V, A, O, C> {
    comb: C,
    _t: PhantomData<fn() -> (K, V, A, O)>,
}

impl<K, V, A, O, C> KeyedShuffle for CombineShuffle<K, V, A, O, C>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    A: Send + Sync + 'static,
    O: RFBound,
    C: CombineFn<V, A, O>,
{
    fn local(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>> {
        let kv = downcast_partition::<Vec<(K, V)>>(input, "combine local")?;
        let mut accs: HashMap<K, A> = HashMap::new();
        for (k, v) in kv {
            let acc = match accs.remove(&k) {
                Some(acc) => self.comb.merge_value(acc, v),
                None => self.comb.create_acc(v),
            };
            accs.insert(k, acc);
        }
        Ok(boxed(route_by_key(accs, buckets)))
    }

    fn merge(&self, parts: Vec<Partition>) -> Result<Partition> {
        let mut accs: HashMap<K, A> = HashMap::new();
        for p in parts {
            for (k, a) in downcast_partition::<Vec<(K, A)>>(p, "combine merge")? {
                let merged = match accs.remove(&k) {
                    Some(prev) => self.comb.merge_acc(prev, a),
                    None => a,
                };
                accs.insert(k, merged);
            }
        }
        let out: Vec<(K, O)> = accs
            .into_iter()
            .map(|(k, a)| (k, self.comb.finish(a)))
            .collect();
        Ok(Box::new(out))
    }
}

impl<K: RFBound + Eq + Hash, V: RFBound> PCollection<(K, V)> {
    /// Aggregate values per key with a [`CombineFn`].
    ///
    /// Empty input yields an empty collection.
    pub fn combine_by_key<C, A, O>(self, comb: C) -> PCollection<(K, O)>
    where
        C: CombineFn<V, A, O>,
        A: Send + Sync + 'static,
        O: RFBound,
    {
        let shuffle: Arc<dyn KeyedShuffle> = Arc::new(CombineShuffle::<K, V, A, O, C> {
            comb,
            _t: PhantomData,
        });
        self.then(Node::CombineValues(shuffle))
    }

    /// [`combine_by_key`](Self::combine_by_key) with the three combiner functions
    /// passed directly; the accumulator is the output.
    pub fn combine_by_key_fns<A, CF, MV, MA>(
        self,
        create_acc: CF,
        merge_value: MV,
        merge_acc: MA,
    ) -> PCollection<(K, A)>
    where
        A: RFBound,
        CF: Fn(V) -> A + Send + Sync + 'static,
        MV: Fn(A, V) -> A + Send + Sync + 'static,
        MA: Fn(A, A) -> A + Send + Sync + 'static,
    {
        self.combine_by_key(FnCombiner::new(create_acc, merge_value, merge_acc))
    }

    /// Fold the values of each key with one associative, commutative function.
    pub fn reduce_by_key<F>(self, f: F) -> PCollection<(K, V)>
    where
        F: Fn(V, V) -> V + Send + Sync + 'static,
    {
        self.combine_by_key(ReduceFn::new(f))
    }
}
