//! Global sort by key.
//!
//! [`PCollection::sort_by_key`] orders a keyed collection across all partitions:
//!
//! 1. every partition is sorted locally into a run,
//! 2. up to `samples_per_partition` keys are drawn from each run,
//! 3. splitters are chosen from the pooled samples, one per range boundary,
//! 4. each run is cut into ranges with a binary search against the splitters,
//! 5. each range k-way merges the pieces it received.
//!
//! Range `i` only holds keys ordered at or before range `i + 1`, so reading the
//! output partitions in order yields the global order. Rows with equal keys keep
//! no particular order relative to each other.

use crate::node::{Node, RangeSort};
use crate::type_token::downcast_partition;
use crate::{PCollection, Partition, RFBound};
use anyhow::Result;
use itertools::Itertools;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

struct SortByKeyOp<K, V> {
    descending: bool,
    _t: PhantomData<fn() -> (K, V)>,
}

impl<K: Ord, V> SortByKeyOp<K, V> {
    fn order(&self, a: &K, b: &K) -> Ordering {
        if self.descending { b.cmp(a) } else { a.cmp(b) }
    }
}

impl<K, V> RangeSort for SortByKeyOp<K, V>
where
    K: RFBound + Ord,
    V: RFBound,
{
    fn descending(&self) -> bool {
        self.descending
    }

    fn sort_run(&self, input: Partition) -> Result<Partition> {
        let mut rows = downcast_partition::<Vec<(K, V)>>(input, "sort_by_key run")?;
        rows.sort_by(|a, b| self.order(&a.0, &b.0));
        Ok(Box::new(rows))
    }

    fn sample(&self, run: &Partition, n: usize) -> Result<Partition> {
        let rows = run
            .downcast_ref::<Vec<(K, V)>>()
            .ok_or_else(|| anyhow::anyhow!("sort_by_key sample: unexpected run type"))?;
        let len = rows.len();
        let keys: Vec<K> = if len <= n {
            rows.iter().map(|(k, _)| k.clone()).collect()
        } else {
            (0..n).map(|i| rows[i * len / n].0.clone()).collect()
        };
        Ok(Box::new(keys))
    }

    fn splitters(&self, samples: Vec<Partition>, buckets: usize) -> Result<Partition> {
        let mut all: Vec<K> = Vec::new();
        for s in samples {
            all.extend(downcast_partition::<Vec<K>>(s, "sort_by_key splitters")?);
        }
        all.sort_by(|a, b| self.order(a, b));
        all.dedup();

        let mut splitters: Vec<K> = Vec::new();
        if !all.is_empty() {
            for i in 1..buckets {
                let k = &all[i * all.len() / buckets];
                if splitters.last() != Some(k) {
                    splitters.push(k.clone());
                }
            }
        }
        Ok(Box::new(splitters))
    }

    fn route(&self, run: Partition, splitters: &Partition) -> Result<Vec<Partition>> {
        let rows = downcast_partition::<Vec<(K, V)>>(run, "sort_by_key route")?;
        let splitters = splitters
            .downcast_ref::<Vec<K>>()
            .ok_or_else(|| anyhow::anyhow!("sort_by_key route: unexpected splitter type"))?;

        let mut ranges: Vec<Vec<(K, V)>> = (0..=splitters.len()).map(|_| Vec::new()).collect();
        for row in rows {
            let r = splitters.partition_point(|s| self.order(s, &row.0) == Ordering::Less);
            ranges[r].push(row);
        }
        Ok(ranges.into_iter().map(|r| Box::new(r) as Partition).collect())
    }

    fn merge_runs(&self, runs: Vec<Partition>) -> Result<Partition> {
        let runs = runs
            .into_iter()
            .map(|r| downcast_partition::<Vec<(K, V)>>(r, "sort_by_key merge"))
            .collect::<Result<Vec<_>>>()?;
        let merged: Vec<(K, V)> = runs
            .into_iter()
            .kmerge_by(|a, b| self.order(&a.0, &b.0) == Ordering::Less)
            .collect();
        Ok(Box::new(merged))
    }
}

impl<K: RFBound + Ord, V: RFBound> PCollection<(K, V)> {
    /// Order the collection globally by key, ascending or descending.
    ///
    /// Terminal operations downstream return rows in this order as long as only
    /// element-wise operations follow.
    pub fn sort_by_key(self, descending: bool) -> PCollection<(K, V)> {
        let sorter: Arc<dyn RangeSort> = Arc::new(SortByKeyOp::<K, V> {
            descending,
            _t: PhantomData,
        });
        self.then(Node::SortByKey(sorter))
    }
}
