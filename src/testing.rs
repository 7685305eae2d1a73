//! Test support for pipelines and the shoppers analysis.
//!
//! - Assertions that compare pipeline output with or without regard to order.
//! - Partitioning grids and deterministic shuffles for checking that results do
//!   not depend on how the input is split.
//! - Record fixtures for the shoppers datasets.
//!
//! ```
//! use shopflow::*;
//! use shopflow::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = TestPipeline::new();
//! let doubled = from_vec(&p, vec![1, 2, 3]).map(|x: &i32| x * 2);
//! for ctx in partition_grid() {
//!     assert_collections_unordered_equal(&doubled.collect(&ctx)?, &[2, 4, 6]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;

use crate::Pipeline;
use std::ops::Deref;

/// A [`Pipeline`] that exposes the size of its graph.
#[derive(Clone, Default)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes added so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pipeline.snapshot().0.len()
    }

    /// Edges added so far; a join adds two.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.pipeline.snapshot().1.len()
    }
}

impl Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}
