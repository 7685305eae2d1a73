//! Inner equijoins.
//!
//! A join is a `Join` node that references both inputs by id. At run time the
//! runner executes both input plans, hash-routes each side by key into the same
//! number of buckets, and joins bucket by bucket: for a key with `m` rows on the
//! left and `n` on the right, the bucket emits all `m × n` pairs. Keys present on
//! only one side emit nothing, and duplicate keys on either side are kept.
//!
//! Output order is unspecified; sort afterwards when order matters.
//!
//! ```no_run
//! use shopflow::*;
//! use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let p = Pipeline::default();
//! let left  = from_vec(&p, vec![("a".to_string(), 1u32), ("a".to_string(), 2), ("b".to_string(), 3)]);
//! let right = from_vec(&p, vec![("a".to_string(), "x".to_string()), ("c".to_string(), "y".to_string())]);
//!
//! let joined = left.join_inner(&right).collect_seq_sorted()?;
//! assert_eq!(joined.len(), 2);
//! # Ok(()) }
//! ```

use crate::node::{JoinExec, Node};
use crate::shuffle::{boxed, route_by_key};
use crate::type_token::downcast_partition;
use crate::{PCollection, Partition, RFBound};
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

struct InnerJoin<K, V, W>(PhantomData<fn() -> (K, V, W)>);

impl<K, V, W> JoinExec for InnerJoin<K, V, W>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    fn route_left(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>> {
        let rows = downcast_partition::<Vec<(K, V)>>(input, "join route left")?;
        Ok(boxed(route_by_key(rows, buckets)))
    }

    fn route_right(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>> {
        let rows = downcast_partition::<Vec<(K, W)>>(input, "join route right")?;
        Ok(boxed(route_by_key(rows, buckets)))
    }

    fn join_bucket(&self, left: Vec<Partition>, right: Vec<Partition>) -> Result<Partition> {
        let mut rm: HashMap<K, Vec<W>> = HashMap::new();
        for p in right {
            for (k, w) in downcast_partition::<Vec<(K, W)>>(p, "join bucket right")? {
                rm.entry(k).or_default().push(w);
            }
        }

        let mut out: Vec<(K, (V, W))> = Vec::new();
        for p in left {
            for (k, v) in downcast_partition::<Vec<(K, V)>>(p, "join bucket left")? {
                if let Some(ws) = rm.get(&k) {
                    for w in ws {
                        out.push((k.clone(), (v.clone(), w.clone())));
                    }
                }
            }
        }
        Ok(Box::new(out))
    }
}

impl<K, V> PCollection<(K, V)>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
{
    /// Inner join on key with another `(K, W)` collection: `(K, (V, W))`.
    ///
    /// # Panics
    ///
    /// Panics if `right` was built on a different [`Pipeline`](crate::Pipeline).
    #[must_use]
    pub fn join_inner<W>(&self, right: &PCollection<(K, W)>) -> PCollection<(K, (V, W))>
    where
        W: RFBound,
    {
        assert!(
            self.pipeline.same_as(&right.pipeline),
            "join inputs must belong to the same pipeline"
        );
        let exec: Arc<dyn JoinExec> = Arc::new(InnerJoin::<K, V, W>(PhantomData));
        let id = self.pipeline.insert_node(Node::Join {
            left: self.id,
            right: right.id,
            exec,
        });
        self.pipeline.connect(self.id, id);
        self.pipeline.connect(right.id, id);
        PCollection::from_parts(self.pipeline.clone(), id)
    }
}

impl<T: RFBound> PCollection<T> {
    /// Inner join two collections on extracted keys: `(K, (T, U))`.
    ///
    /// # Panics
    ///
    /// Panics if `other` was built on a different [`Pipeline`](crate::Pipeline).
    #[must_use]
    pub fn join_on<U, K, FA, FB>(
        &self,
        other: &PCollection<U>,
        key_a: FA,
        key_b: FB,
    ) -> PCollection<(K, (T, U))>
    where
        U: RFBound,
        K: RFBound + Eq + Hash,
        FA: 'static + Send + Sync + Fn(&T) -> K,
        FB: 'static + Send + Sync + Fn(&U) -> K,
    {
        let left = self.clone().key_by(key_a);
        let right = other.clone().key_by(key_b);
        left.join_inner(&right)
    }
}
