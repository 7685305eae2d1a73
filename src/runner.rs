//! Plan execution over partitions.
//!
//! The runner splits the head source into `ctx.partitions` partitions and pushes
//! them through the chain:
//!
//! - **Stateless** stages run on each partition independently.
//! - **GroupByKey / CombineValues** pre-aggregate per partition, hash-route the
//!   partial results into buckets, and merge each bucket.
//! - **SortByKey** sorts each partition, samples keys to choose range splitters,
//!   routes every run into ranges, and k-way merges each range. Concatenating
//!   the ranges in order yields the global order.
//! - **Join** executes both input plans, hash-routes each side by key, and joins
//!   bucket by bucket.
//!
//! In [`ExecMode::Parallel`] every per-partition and per-bucket step runs on Rayon.
//! A terminal call returns only after every step finished; the first error aborts
//! the run and no partial output is returned.

use crate::context::{ExecMode, ExecutionContext};
use crate::node::{DynOp, JoinExec, KeyedShuffle, Node, RangeSort};
use crate::planner::{Plan, build_plan};
use crate::type_token::{Partition, downcast_partition};
use crate::{NodeId, Pipeline};
use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use rayon::prelude::*;
use std::sync::Arc;

pub struct Runner {
    pub ctx: ExecutionContext,
}

impl Runner {
    #[must_use]
    pub fn new(ctx: ExecutionContext) -> Self {
        Self { ctx }
    }

    /// Execute the plan ending at `terminal` and concatenate its partitions in order.
    ///
    /// # Errors
    /// Returns an error if planning fails, any operator fails, or the terminal
    /// element type is not `T`.
    pub fn run_collect<T: 'static + Send + Sync>(
        &self,
        p: &Pipeline,
        terminal: NodeId,
    ) -> Result<Vec<T>> {
        let plan = build_plan(p, terminal)?;
        debug!("executing plan:\n{}", plan.describe());

        let parts = match (self.ctx.mode, self.ctx.threads) {
            (ExecMode::Parallel, Some(threads)) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("build rayon thread pool")?
                .install(|| self.exec_plan(plan))?,
            _ => self.exec_plan(plan)?,
        };

        let mut out = Vec::<T>::new();
        for part in parts {
            out.extend(downcast_partition::<Vec<T>>(part, "terminal")?);
        }
        Ok(out)
    }

    fn exec_plan(&self, plan: Plan) -> Result<Vec<Partition>> {
        let Plan { chain, inputs, .. } = plan;
        let mut nodes = chain.into_iter();
        let n = self.ctx.effective_partitions();

        let mut parts = match nodes.next() {
            Some(Node::Source {
                payload,
                vec_ops,
                elem_tag,
            }) => {
                let len = vec_ops.len(payload.as_ref()).unwrap_or(0);
                debug!("splitting source<{}> of {len} elements into {n} partitions", elem_tag.name);
                vec_ops
                    .split(payload.as_ref(), n)
                    .ok_or_else(|| anyhow!("source payload is not a Vec<{}>", elem_tag.name))?
            }
            Some(Node::Join { exec, .. }) => {
                let (left, right) = *inputs.ok_or_else(|| anyhow!("join without input plans"))?;
                self.exec_join(left, right, exec.as_ref())?
            }
            Some(other) => bail!("plan must start with a source or join, found {}", other.label()),
            None => bail!("empty plan"),
        };

        for node in nodes {
            let label = node.label();
            debug!("stage {label} over {} partitions", parts.len());
            parts = match node {
                Node::Stateless(ops) => self.map_each(parts, |p| fuse_stateless(&ops, p))?,
                Node::GroupByKey(shuffle) | Node::CombineValues(shuffle) => {
                    self.exec_shuffle(parts, shuffle.as_ref())?
                }
                Node::SortByKey(sorter) => self.exec_range_sort(parts, sorter.as_ref())?,
                Node::Source { .. } | Node::Join { .. } => {
                    bail!("unexpected {label} in the middle of a plan")
                }
            };
        }
        Ok(parts)
    }

    fn exec_shuffle(&self, parts: Vec<Partition>, shuffle: &dyn KeyedShuffle) -> Result<Vec<Partition>> {
        let buckets = self.ctx.effective_partitions();
        let routed = self.map_each(parts, |p| shuffle.local(p, buckets))?;
        let by_bucket = transpose(routed, buckets)?;
        self.map_each(by_bucket, |parts| shuffle.merge(parts))
    }

    fn exec_range_sort(&self, parts: Vec<Partition>, sorter: &dyn RangeSort) -> Result<Vec<Partition>> {
        let runs = self.map_each(parts, |p| sorter.sort_run(p))?;
        let samples = runs
            .iter()
            .map(|run| sorter.sample(run, self.ctx.samples_per_partition))
            .collect::<Result<Vec<_>>>()?;
        let splitters = sorter.splitters(samples, self.ctx.effective_partitions())?;

        let routed = self.map_each(runs, |run| sorter.route(run, &splitters))?;
        let width = routed.first().map_or(1, Vec::len);
        debug!("range sort into {width} ranges");
        let by_range = transpose(routed, width)?;
        self.map_each(by_range, |runs| sorter.merge_runs(runs))
    }

    fn exec_join(&self, left: Plan, right: Plan, exec: &dyn JoinExec) -> Result<Vec<Partition>> {
        let buckets = self.ctx.effective_partitions();
        let (left_parts, right_parts) = match self.ctx.mode {
            ExecMode::Sequential => (self.exec_plan(left)?, self.exec_plan(right)?),
            ExecMode::Parallel => {
                let (l, r) = rayon::join(|| self.exec_plan(left), || self.exec_plan(right));
                (l?, r?)
            }
        };

        let left_routed = self.map_each(left_parts, |p| exec.route_left(p, buckets))?;
        let right_routed = self.map_each(right_parts, |p| exec.route_right(p, buckets))?;
        let pairs: Vec<(Vec<Partition>, Vec<Partition>)> = transpose(left_routed, buckets)?
            .into_iter()
            .zip(transpose(right_routed, buckets)?)
            .collect();
        self.map_each(pairs, |(l, r)| exec.join_bucket(l, r))
    }

    /// Apply `f` to every item, on Rayon in parallel mode, preserving item order.
    fn map_each<I, O, F>(&self, items: Vec<I>, f: F) -> Result<Vec<O>>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> Result<O> + Send + Sync,
    {
        match self.ctx.mode {
            ExecMode::Sequential => items.into_iter().map(f).collect(),
            ExecMode::Parallel => items.into_par_iter().map(f).collect(),
        }
    }
}

fn fuse_stateless(ops: &[Arc<dyn DynOp>], input: Partition) -> Result<Partition> {
    ops.iter().try_fold(input, |acc, op| op.apply(acc))
}

/// Turn `[source][bucket]` into `[bucket][source]`.
fn transpose(rows: Vec<Vec<Partition>>, width: usize) -> Result<Vec<Vec<Partition>>> {
    let mut cols: Vec<Vec<Partition>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            bail!("partition {i} routed into {} buckets, expected {width}", row.len());
        }
        for (col, part) in cols.iter_mut().zip(row) {
            col.push(part);
        }
    }
    Ok(cols)
}
