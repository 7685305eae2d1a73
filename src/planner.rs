//! Plan construction.
//!
//! The planner walks the graph backwards from a terminal node until it reaches
//! the head of the chain: a `Source`, or a `Join` whose two inputs are planned
//! recursively. It then fuses adjacent `Stateless` nodes so the runner applies
//! each run of element-wise operators in a single pass over a partition.

use crate::node::{DynOp, Node};
use crate::{NodeId, Pipeline};
use anyhow::{Result, anyhow};
use log::debug;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// A linear execution chain, plus the input plans when the chain starts with a join.
pub struct Plan {
    /// Nodes to execute, head first.
    pub chain: Vec<Node>,
    /// Left and right input plans of a leading `Join`.
    pub inputs: Option<Box<(Plan, Plan)>>,
    /// Rewrites applied while planning.
    pub optimizations: Vec<OptimizationDecision>,
}

/// A rewrite the planner applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizationDecision {
    /// Adjacent stateless operations were fused together.
    FusedStateless {
        blocks_before: usize,
        blocks_after: usize,
        ops_count: usize,
    },
}

impl Plan {
    /// Labels of the chain's nodes, head first. Stateless stages list their operators.
    #[must_use]
    pub fn stage_labels(&self) -> Vec<String> {
        self.chain
            .iter()
            .map(|n| match n {
                Node::Stateless(ops) => {
                    let names: Vec<&str> = ops.iter().map(|op| op.name()).collect();
                    format!("stateless[{}]", names.join(","))
                }
                Node::Source { elem_tag, .. } => format!("source<{}>", elem_tag.name),
                other => other.label().to_string(),
            })
            .collect()
    }

    /// Indented, human-readable rendering of the plan tree.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        if let Some(inputs) = &self.inputs {
            let _ = writeln!(out, "{pad}left:");
            inputs.0.describe_into(out, depth + 1);
            let _ = writeln!(out, "{pad}right:");
            inputs.1.describe_into(out, depth + 1);
        }
        for label in self.stage_labels() {
            let _ = writeln!(out, "{pad}{label}");
        }
    }
}

/// Build the plan that produces `terminal`.
///
/// # Errors
/// Returns an error if the graph references a node that does not exist or a
/// non-head node has no input edge.
pub fn build_plan(p: &Pipeline, terminal: NodeId) -> Result<Plan> {
    let (nodes, edges) = p.snapshot();
    plan_from(&nodes, &edges, terminal)
}

fn plan_from(
    nodes: &HashMap<NodeId, Node>,
    edges: &[(NodeId, NodeId)],
    terminal: NodeId,
) -> Result<Plan> {
    let mut chain = Vec::<Node>::new();
    let mut cur = terminal;
    loop {
        let n = nodes
            .get(&cur)
            .cloned()
            .ok_or_else(|| anyhow!("missing node {cur:?}"))?;
        let is_head = matches!(n, Node::Source { .. } | Node::Join { .. });
        chain.push(n);
        if is_head {
            break;
        }
        cur = edges
            .iter()
            .find(|(_, to)| *to == cur)
            .map(|(from, _)| *from)
            .ok_or_else(|| anyhow!("node {cur:?} has no input"))?;
    }
    chain.reverse();

    let inputs = match chain.first() {
        Some(Node::Join { left, right, .. }) => Some(Box::new((
            plan_from(nodes, edges, *left)?,
            plan_from(nodes, edges, *right)?,
        ))),
        _ => None,
    };

    let mut optimizations = Vec::new();
    let chain = fuse_stateless(chain, &mut optimizations);
    Ok(Plan {
        chain,
        inputs,
        optimizations,
    })
}

fn fuse_stateless(chain: Vec<Node>, decisions: &mut Vec<OptimizationDecision>) -> Vec<Node> {
    let blocks_before = chain
        .iter()
        .filter(|n| matches!(n, Node::Stateless(_)))
        .count();

    let mut out: Vec<Node> = Vec::with_capacity(chain.len());
    let mut pending: Vec<Arc<dyn DynOp>> = Vec::new();
    for node in chain {
        match node {
            Node::Stateless(ops) => pending.extend(ops),
            other => {
                if !pending.is_empty() {
                    out.push(Node::Stateless(std::mem::take(&mut pending)));
                }
                out.push(other);
            }
        }
    }
    if !pending.is_empty() {
        out.push(Node::Stateless(pending));
    }

    let blocks_after = out
        .iter()
        .filter(|n| matches!(n, Node::Stateless(_)))
        .count();
    if blocks_after < blocks_before {
        let ops_count = out
            .iter()
            .map(|n| match n {
                Node::Stateless(ops) => ops.len(),
                _ => 0,
            })
            .sum::<usize>();
        debug!("fused {blocks_before} stateless blocks into {blocks_after} ({ops_count} ops)");
        decisions.push(OptimizationDecision::FusedStateless {
            blocks_before,
            blocks_after,
            ops_count,
        });
    }
    out
}
