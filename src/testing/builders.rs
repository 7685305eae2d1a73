//! Execution settings and input orderings for invariance tests.

use crate::context::ExecutionContext;

/// Partition counts used by [`partition_grid`].
pub const GRID_PARTITIONS: [usize; 5] = [1, 2, 3, 7, 16];

/// A sequential context followed by parallel contexts over [`GRID_PARTITIONS`].
///
/// Running the same pipeline under each context and comparing the outputs checks
/// that a result does not depend on partitioning.
#[must_use]
pub fn partition_grid() -> Vec<ExecutionContext> {
    let mut out = vec![ExecutionContext::sequential()];
    out.extend(
        GRID_PARTITIONS
            .iter()
            .map(|&n| ExecutionContext::parallel().with_partitions(n).with_samples_per_partition(4)),
    );
    out
}

/// A deterministic permutation of `data` driven by `seed`.
///
/// Fisher-Yates over a linear congruential generator, so the same seed always
/// yields the same order.
///
/// ```
/// use shopflow::testing::shuffled;
///
/// let v: Vec<u32> = (0..20).collect();
/// let s = shuffled(v.clone(), 7);
/// assert_ne!(s, v);
/// assert_eq!(s, shuffled(v, 7));
/// ```
#[must_use]
pub fn shuffled<T>(mut data: Vec<T>, seed: u32) -> Vec<T> {
    let mut state = seed.wrapping_add(12_345);
    for i in (1..data.len()).rev() {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let j = (state >> 16) as usize % (i + 1);
        data.swap(i, j);
    }
    data
}
