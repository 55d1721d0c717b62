//! Operator graph: nodes wrap operators, edges come from declared inputs.
//!
//! Edge direction is fixed: `predecessors(n)` are the nodes `n` depends on
//! (whose output it consumes). `successors(n)` is the reverse relation.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::id::{NodeId, OperatorId};
use crate::operator::LogicalOperator;

/// One graph node: its identity plus the wrapped operator.
#[derive(Debug)]
pub struct OpNode {
    id: NodeId,
    operator: Box<dyn LogicalOperator>,
}

impl OpNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn operator(&self) -> &dyn LogicalOperator {
        self.operator.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct OperatorGraph {
    nodes: Vec<OpNode>,
    predecessors: Vec<Vec<NodeId>>,
    successors: Vec<Vec<NodeId>>,
    by_operator_id: HashMap<OperatorId, NodeId>,
}

impl OperatorGraph {
    /// Wrap `operators` as nodes (in input order) and resolve their inputs.
    ///
    /// Cycles are accepted here; they surface when the graph is sorted.
    pub fn build(operators: Vec<Box<dyn LogicalOperator>>) -> Result<Self> {
        let mut by_operator_id = HashMap::new();
        for (index, op) in operators.iter().enumerate() {
            if let Some(op_id) = op.id() {
                if by_operator_id
                    .insert(op_id, NodeId::from_index(index))
                    .is_some()
                {
                    return Err(Error::DuplicateOperatorId(op_id));
                }
            }
        }

        let mut predecessors = Vec::with_capacity(operators.len());
        let mut successors = vec![Vec::new(); operators.len()];
        // linked_from[p] == index once p is already a predecessor of `index`
        let mut linked_from = vec![usize::MAX; operators.len()];
        for (index, op) in operators.iter().enumerate() {
            let node = NodeId::from_index(index);
            let mut preds: Vec<NodeId> = Vec::new();
            for target in op.inputs() {
                let pred = *by_operator_id
                    .get(&target)
                    .ok_or(Error::DanglingReference { node, target })?;
                // An operator reading the same input twice (self-join) is one edge.
                if linked_from[pred.index()] != index {
                    linked_from[pred.index()] = index;
                    preds.push(pred);
                    successors[pred.index()].push(node);
                }
            }
            predecessors.push(preds);
        }

        let nodes = operators
            .into_iter()
            .enumerate()
            .map(|(index, operator)| OpNode {
                id: NodeId::from_index(index),
                operator,
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = nodes.len(),
            edges = predecessors.iter().map(Vec::len).sum::<usize>(),
            "built operator graph"
        );

        Ok(Self {
            nodes,
            predecessors,
            successors,
            by_operator_id,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&OpNode> {
        self.nodes.get(id.index())
    }

    /// Nodes in input order.
    pub fn nodes(&self) -> &[OpNode] {
        &self.nodes
    }

    /// Node that declared `op_id` as its `"@id"`.
    pub fn node_for(&self, op_id: OperatorId) -> Option<NodeId> {
        self.by_operator_id.get(&op_id).copied()
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.predecessors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.successors
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Node → direct predecessors, indexed by `NodeId`. Input to `topo::sort`.
    pub fn adjacency(&self) -> &[Vec<NodeId>] {
        &self.predecessors
    }

    pub fn edge_count(&self) -> usize {
        self.predecessors.iter().map(Vec::len).sum()
    }

    /// Nodes with no inputs (where data enters the pipeline).
    pub fn leaves(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(OpNode::id)
            .filter(|n| self.predecessors(*n).is_empty())
            .collect()
    }

    /// Nodes nothing depends on (where data leaves the pipeline).
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(OpNode::id)
            .filter(|n| self.successors(*n).is_empty())
            .collect()
    }
}
