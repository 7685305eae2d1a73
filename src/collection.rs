use crate::context::ExecutionContext;
use crate::node::{DynOp, Node};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::planner::{Plan, build_plan};
use crate::runner::Runner;
use crate::type_token::{Partition, TypeTag, downcast_partition, vec_ops_for};
use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bound shared by every element type that flows through a pipeline.
pub trait RFBound: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}
impl<T> RFBound for T where T: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}

/// A lazily evaluated, partitioned multiset of `T`.
///
/// Transformations append nodes to the pipeline graph and return a new collection;
/// nothing is computed until a terminal operation runs. Collections are never
/// mutated, so the same collection may feed several downstream branches.
#[derive(Clone)]
pub struct PCollection<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    _t: PhantomData<T>,
}

/// Attach an in-memory vector to `p` as a source collection.
pub fn from_vec<T>(p: &Pipeline, data: Vec<T>) -> PCollection<T>
where
    T: RFBound,
{
    let id = p.insert_node(Node::Source {
        payload: Arc::new(data),
        vec_ops: vec_ops_for::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    PCollection::from_parts(p.clone(), id)
}

// ---- Stateless DynOps ----

pub(crate) struct MapOp<I, O, F>(pub(crate) F, pub(crate) PhantomData<(I, O)>);
impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> O + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_partition::<Vec<I>>(input, "map")?;
        let out: Vec<O> = v.iter().map(|i| self.0(i)).collect();
        Ok(Box::new(out))
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

pub(crate) struct FilterOp<T, P>(pub(crate) P, pub(crate) PhantomData<T>);
impl<T, P> DynOp for FilterOp<T, P>
where
    T: RFBound,
    P: Send + Sync + Fn(&T) -> bool + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_partition::<Vec<T>>(input, "filter")?;
        Ok(Box::new(v.into_iter().filter(|t| self.0(t)).collect::<Vec<T>>()))
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

pub(crate) struct FlatMapOp<I, O, F>(pub(crate) F, pub(crate) PhantomData<(I, O)>);
impl<I, O, F> DynOp for FlatMapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> Vec<O> + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_partition::<Vec<I>>(input, "flat_map")?;
        let mut out: Vec<O> = Vec::new();
        for i in &v {
            out.extend(self.0(i));
        }
        Ok(Box::new(out))
    }

    fn name(&self) -> &'static str {
        "flat_map"
    }
}

impl<T> PCollection<T> {
    pub(crate) fn from_parts(pipeline: Pipeline, id: NodeId) -> Self {
        Self {
            pipeline,
            id,
            _t: PhantomData,
        }
    }

    /// Append `node` downstream of this collection.
    pub(crate) fn then<O>(self, node: Node) -> PCollection<O> {
        let id = self.pipeline.insert_node(node);
        self.pipeline.connect(self.id, id);
        PCollection::from_parts(self.pipeline, id)
    }

    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Build (without running) the plan that produces this collection.
    ///
    /// # Errors
    /// Returns an error if the graph is inconsistent.
    pub fn explain(&self) -> Result<Plan> {
        build_plan(&self.pipeline, self.id)
    }
}

impl<T: RFBound> PCollection<T> {
    pub fn map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        let op: Arc<dyn DynOp> = Arc::new(MapOp::<T, O, F>(f, PhantomData));
        self.then(Node::Stateless(vec![op]))
    }

    pub fn filter<F>(self, pred: F) -> PCollection<T>
    where
        F: 'static + Send + Sync + Fn(&T) -> bool,
    {
        let op: Arc<dyn DynOp> = Arc::new(FilterOp::<T, F>(pred, PhantomData));
        self.then(Node::Stateless(vec![op]))
    }

    pub fn flat_map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> Vec<O>,
    {
        let op: Arc<dyn DynOp> = Arc::new(FlatMapOp::<T, O, F>(f, PhantomData));
        self.then(Node::Stateless(vec![op]))
    }

    // ---- terminals ----

    /// Evaluate the collection and return every element.
    ///
    /// Order follows the most recent `sort_by_key`; without one it is unspecified.
    ///
    /// # Errors
    /// Propagates any planning or operator failure; nothing is returned on failure.
    pub fn collect(&self, ctx: &ExecutionContext) -> Result<Vec<T>> {
        Runner::new(ctx.clone()).run_collect::<T>(&self.pipeline, self.id)
    }

    /// Evaluate the collection and return its first `n` elements.
    ///
    /// # Errors
    /// Same as [`collect`](Self::collect).
    pub fn take(&self, ctx: &ExecutionContext, n: usize) -> Result<Vec<T>> {
        let mut v = self.collect(ctx)?;
        v.truncate(n);
        Ok(v)
    }

    /// Evaluate the collection and return its first element, if any.
    ///
    /// # Errors
    /// Same as [`collect`](Self::collect).
    pub fn first(&self, ctx: &ExecutionContext) -> Result<Option<T>> {
        Ok(self.take(ctx, 1)?.into_iter().next())
    }

    /// Evaluate the collection and count its elements.
    ///
    /// # Errors
    /// Same as [`collect`](Self::collect).
    pub fn count(&self, ctx: &ExecutionContext) -> Result<usize> {
        Ok(self.collect(ctx)?.len())
    }

    /// Sequential, single-partition [`collect`](Self::collect).
    ///
    /// # Errors
    /// Same as [`collect`](Self::collect).
    pub fn collect_seq(&self) -> Result<Vec<T>> {
        self.collect(&ExecutionContext::sequential())
    }

    /// Parallel [`collect`](Self::collect) with optional thread and partition overrides.
    ///
    /// # Errors
    /// Same as [`collect`](Self::collect).
    pub fn collect_par(&self, threads: Option<usize>, partitions: Option<usize>) -> Result<Vec<T>> {
        let mut ctx = ExecutionContext::parallel();
        if let Some(t) = threads {
            ctx = ctx.with_threads(t);
        }
        if let Some(n) = partitions {
            ctx = ctx.with_partitions(n);
        }
        self.collect(&ctx)
    }
}
