//! Type-erased partition buffers.
//!
//! The runner moves intermediate data between graph nodes as opaque
//! [`Partition`]s. Typed code on either side of a node boundary recovers the
//! concrete `Vec<T>` with [`downcast_partition`], which turns a mismatch into an
//! error instead of a panic.
//!
//! [`VecOps`] lets the runner split a source payload into partitions without
//! knowing its element type; concrete implementations come from [`vec_ops_for`].

use anyhow::{Result, anyhow};
use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

/// A partition buffer carried between nodes at runtime.
pub type Partition = Box<dyn Any + Send + Sync>;

/// A lightweight runtime type tag, attached to sources for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Recover the concrete value behind a partition.
///
/// `stage` names the operation doing the downcast and ends up in the error message.
///
/// # Errors
/// Returns an error if the partition does not hold a `T`.
pub fn downcast_partition<T: 'static>(part: Partition, stage: &str) -> Result<T> {
    part.downcast::<T>()
        .map(|b| *b)
        .map_err(|_| anyhow!("{stage}: partition is not a {}", type_name::<T>()))
}

/// Type-erased helpers for `Vec<T>` source payloads.
///
/// Implementations return `None` when `data` is not the `Vec<T>` they expect.
pub trait VecOps: Send + Sync {
    /// Number of elements in `data`.
    fn len(&self, data: &dyn Any) -> Option<usize>;

    /// Split `data` into at most `n` contiguous partitions, preserving element order.
    ///
    /// Always yields at least one partition, which may be empty.
    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>>;
}

/// Concrete [`VecOps`] bound to an element type.
pub struct VecOpsImpl<T: Clone + Send + Sync + 'static>(PhantomData<T>);

impl<T: Clone + Send + Sync + 'static> VecOps for VecOpsImpl<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>> {
        let v = data.downcast_ref::<Vec<T>>()?;
        let len = v.len();

        if n <= 1 || len <= 1 {
            return Some(vec![Box::new(v.clone())]);
        }

        let chunk = len.div_ceil(n);
        let parts = v
            .chunks(chunk)
            .map(|c| Box::new(c.to_vec()) as Partition)
            .collect();
        Some(parts)
    }
}

/// Create a type-erased [`VecOps`] for `Vec<T>`.
#[must_use]
pub fn vec_ops_for<T: Clone + Send + Sync + 'static>() -> Arc<dyn VecOps> {
    Arc::new(VecOpsImpl::<T>(PhantomData))
}
