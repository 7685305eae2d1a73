//! The shared computation graph behind every [`PCollection`](crate::PCollection).
//!
//! A `Pipeline` is cheap to clone: clones share one graph. Transformations only
//! append nodes and edges; nothing runs until a terminal operation asks the
//! [`Runner`](crate::runner::Runner) for a result.

use crate::node::Node;
use crate::node_id::NodeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
}

pub struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                edges: Vec::new(),
            })),
        }
    }
}

impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Pipeline {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Pipeline {
    fn graph(&self) -> MutexGuard<'_, PipelineInner> {
        // Every mutation is a single insert or push, so a poisoned graph is still whole.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.graph();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.graph().edges.push((from, to));
    }

    /// Copy of the current nodes and edges.
    #[must_use]
    pub fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.graph();
        (g.nodes.clone(), g.edges.clone())
    }

    /// Whether `self` and `other` share one graph.
    #[must_use]
    pub fn same_as(&self, other: &Pipeline) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
