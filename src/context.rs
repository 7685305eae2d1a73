//! Explicit execution settings threaded through every terminal operation.
//!
//! An [`ExecutionContext`] decides how many partitions a source is split into,
//! how many buckets each shuffle produces, and whether partitions are processed
//! on a Rayon pool or one after another. Results never depend on these
//! settings, only throughput does.

use log::warn;
use serde::{Deserialize, Serialize};

/// How partitions are scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Process partitions one after another on the calling thread.
    Sequential,
    /// Process partitions concurrently with Rayon.
    Parallel,
}

/// Execution settings for a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionContext {
    pub mode: ExecMode,
    /// Source split count and shuffle bucket count. Never zero.
    pub partitions: usize,
    /// Dedicated pool size for parallel runs; `None` uses the global Rayon pool.
    pub threads: Option<usize>,
    /// Keys sampled per sorted run when choosing range splitters.
    pub samples_per_partition: usize,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel,
            partitions: 2 * num_cpus::get().max(2),
            threads: None,
            samples_per_partition: 32,
        }
    }
}

impl ExecutionContext {
    /// Parallel execution with default partitioning.
    #[must_use]
    pub fn parallel() -> Self {
        Self::default()
    }

    /// Single-partition, single-threaded execution.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            partitions: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        if partitions == 0 {
            warn!("partition count 0 requested; using 1");
        }
        self.partitions = partitions.max(1);
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    #[must_use]
    pub fn with_samples_per_partition(mut self, samples: usize) -> Self {
        self.samples_per_partition = samples.max(1);
        self
    }

    /// Partition count with deserialized zeroes clamped away.
    pub(crate) fn effective_partitions(&self) -> usize {
        self.partitions.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_partitions_are_clamped() {
        let ctx = ExecutionContext::parallel().with_partitions(0);
        assert_eq!(ctx.partitions, 1);
    }

    #[test]
    fn deserializes_partial_json() {
        let ctx: ExecutionContext =
            serde_json::from_str(r#"{"mode":"sequential","partitions":3}"#).unwrap();
        assert_eq!(ctx.mode, ExecMode::Sequential);
        assert_eq!(ctx.partitions, 3);
        assert_eq!(ctx.threads, None);
        assert_eq!(ctx.samples_per_partition, 32);
    }
}
