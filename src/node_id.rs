//! Opaque handles for nodes in a [`Pipeline`](crate::pipeline::Pipeline) graph.
//!
//! Every [`Node`](crate::node::Node) inserted into a pipeline receives the next
//! sequential `NodeId`. Collections carry one to name the node that produces them,
//! and join nodes carry two to reference their upstream inputs.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}
