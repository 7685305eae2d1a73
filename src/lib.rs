//! # Shopflow
//!
//! A small batch dataflow engine and the shoppers offer-effectiveness analysis
//! built on it.
//!
//! ## Engine
//!
//! A [`Pipeline`] holds an explicit graph of transformations. Sources are attached
//! with [`from_vec`] and every transformation on a [`PCollection<T>`] appends a
//! node and returns a new collection. Nothing runs until a terminal operation
//! ([`collect`](PCollection::collect), [`take`](PCollection::take),
//! [`first`](PCollection::first)) is given an [`ExecutionContext`].
//!
//! - Element-wise: [`map`](PCollection::map), [`filter`](PCollection::filter),
//!   [`flat_map`](PCollection::flat_map), `map_values`, `filter_values`.
//! - Keyed: `key_by`, `group_by`, `group_by_key`, `combine_by_key`,
//!   `combine_by_key_fns`, `reduce_by_key`.
//! - Joins: `join_inner` on keyed collections, `join_on` with two key extractors.
//! - Ordering: `sort_by_key(descending)` imposes a global order across partitions;
//!   `top_k` / `top_k_by` take the first `k` elements of that order.
//!
//! Results never depend on the partition count or on element order inside a
//! partition, provided combiners obey the laws documented in [`combiners`].
//!
//! ```no_run
//! use shopflow::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let p = Pipeline::default();
//! let ctx = ExecutionContext::parallel();
//! let sales = from_vec(&p, vec![
//!     ("ann".to_string(), 3u64),
//!     ("bob".to_string(), 5),
//!     ("ann".to_string(), 4),
//! ]);
//!
//! let totals = sales.combine_by_key(Sum::new()).sort_by_key(false).collect(&ctx)?;
//! assert_eq!(totals, vec![("ann".to_string(), 7), ("bob".to_string(), 5)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Shoppers
//!
//! [`shoppers`] loads customer history, offers and transactions and answers the
//! offer-effectiveness questions; the `shoppers` binary prints the report.

pub mod collection;
pub mod combiners;
pub mod context;
mod helpers;
pub mod node;
pub mod node_id;
pub mod pipeline;
pub mod planner;
pub mod runner;
pub mod shoppers;
mod shuffle;
pub mod testing;
pub mod type_token;

pub use collection::{PCollection, RFBound, from_vec};
pub use combiners::{AverageF64, CombineFn, Count, FnCombiner, Max, ReduceFn, Sum};
pub use context::{ExecMode, ExecutionContext};
pub use node_id::NodeId;
pub use pipeline::Pipeline;
pub use planner::{OptimizationDecision, Plan};
pub use runner::Runner;
pub use type_token::Partition;
