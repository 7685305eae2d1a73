//! Graph nodes and the type-erased operator traits they carry.
//!
//! Typed builders in [`collection`](crate::collection) and `helpers`
//! capture their element types inside implementations of these traits, so the
//! runner can drive any node through `Partition`s alone.

use crate::node_id::NodeId;
use crate::type_token::{Partition, TypeTag, VecOps};
use anyhow::Result;
use std::any::Any;
use std::sync::Arc;

/// An element-wise operator applied to one partition at a time.
pub trait DynOp: Send + Sync {
    fn apply(&self, input: Partition) -> Result<Partition>;

    fn name(&self) -> &'static str {
        "op"
    }
}

/// A keyed shuffle barrier: partition-local pre-aggregation followed by a
/// per-bucket merge.
///
/// `local` must route every key to the same bucket index regardless of which
/// partition it came from, and must return exactly `buckets` outputs.
pub trait KeyedShuffle: Send + Sync {
    fn local(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>>;

    /// Merge the outputs every source partition routed to one bucket.
    fn merge(&self, parts: Vec<Partition>) -> Result<Partition>;
}

/// A global sort implemented as sorted runs, range redistribution, and a k-way merge.
pub trait RangeSort: Send + Sync {
    /// Whether runs are ordered by key descending.
    fn descending(&self) -> bool;

    /// Sort one partition locally.
    fn sort_run(&self, input: Partition) -> Result<Partition>;

    /// Draw up to `n` keys from a sorted run.
    fn sample(&self, run: &Partition, n: usize) -> Result<Partition>;

    /// Pick splitters from all samples so that there are at most `buckets` ranges.
    fn splitters(&self, samples: Vec<Partition>, buckets: usize) -> Result<Partition>;

    /// Cut a sorted run into `splitters.len() + 1` sorted pieces, one per range.
    fn route(&self, run: Partition, splitters: &Partition) -> Result<Vec<Partition>>;

    /// Merge the sorted pieces that landed in one range.
    fn merge_runs(&self, runs: Vec<Partition>) -> Result<Partition>;
}

/// A keyed equijoin of two upstream plans.
pub trait JoinExec: Send + Sync {
    fn route_left(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>>;

    fn route_right(&self, input: Partition, buckets: usize) -> Result<Vec<Partition>>;

    /// Join everything both sides routed to one bucket.
    fn join_bucket(&self, left: Vec<Partition>, right: Vec<Partition>) -> Result<Partition>;
}

#[derive(Clone)]
pub enum Node {
    Source {
        payload: Arc<dyn Any + Send + Sync>,
        vec_ops: Arc<dyn VecOps>,
        elem_tag: TypeTag,
    },
    Stateless(Vec<Arc<dyn DynOp>>),

    /// `Vec<(K, V)>` → `Vec<(K, Vec<V>)>`, hash-partitioned by key.
    GroupByKey(Arc<dyn KeyedShuffle>),

    /// `Vec<(K, V)>` → `Vec<(K, O)>` through a combiner, hash-partitioned by key.
    CombineValues(Arc<dyn KeyedShuffle>),

    /// `Vec<(K, V)>` → the same rows in global key order across partitions.
    SortByKey(Arc<dyn RangeSort>),

    /// Inner join of two nodes of the same pipeline. Acts as the head of its chain.
    Join {
        left: NodeId,
        right: NodeId,
        exec: Arc<dyn JoinExec>,
    },
}

impl Node {
    /// Short label used in plan descriptions and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Node::Source { .. } => "source",
            Node::Stateless(_) => "stateless",
            Node::GroupByKey(_) => "group_by_key",
            Node::CombineValues(_) => "combine_values",
            Node::SortByKey(sorter) if sorter.descending() => "sort_by_key(desc)",
            Node::SortByKey(_) => "sort_by_key(asc)",
            Node::Join { .. } => "join",
        }
    }
}
