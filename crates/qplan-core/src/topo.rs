//! Deterministic topological ordering over a predecessor adjacency list.
//!
//! `adjacency[i]` lists the direct predecessors of node `i` (the nodes it
//! depends on). The order is a depth-first post-order: roots are tried in
//! node-index order and each node's predecessors in declared order, so the
//! result is a pure function of the adjacency. A list that is already
//! topologically ordered comes back unchanged.
//!
//! Iterative: pipeline depth is bounded by memory, not by the call stack.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Placed,
}

/// Linearize `adjacency` so every node follows all of its predecessors.
///
/// Fails with `CycleDetected` (carrying one concrete cycle, in dependency
/// order) if no such order exists. Never returns a partial order.
pub fn sort(adjacency: &[Vec<NodeId>]) -> Result<Vec<NodeId>> {
    let n = adjacency.len();
    let mut marks = vec![Mark::Unvisited; n];
    let mut order = Vec::with_capacity(n);
    // (node, index of the next predecessor to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnStack;
        stack.push((start, 0));

        while let Some(&(node, cursor)) = stack.last() {
            let Some(&pred) = adjacency[node].get(cursor) else {
                marks[node] = Mark::Placed;
                order.push(NodeId::from_index(node));
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let p = pred.index();
            if p >= n {
                return Err(Error::Invariant(format!(
                    "{} lists predecessor {pred} outside a graph of {n} nodes",
                    NodeId::from_index(node)
                )));
            }
            match marks[p] {
                Mark::Placed => {}
                Mark::Unvisited => {
                    marks[p] = Mark::OnStack;
                    stack.push((p, 0));
                }
                Mark::OnStack => {
                    // The stack from `p` upward is a chain of "depends on"
                    // edges closing back on `p`; reverse it so each node is
                    // listed before the node that depends on it.
                    let from = stack.iter().position(|&(s, _)| s == p).unwrap_or(0);
                    let mut nodes: Vec<NodeId> = stack[from..]
                        .iter()
                        .map(|&(s, _)| NodeId::from_index(s))
                        .collect();
                    nodes.reverse();
                    return Err(Error::CycleDetected { nodes });
                }
            }
        }
    }

    Ok(order)
}

/// True if `order` is a permutation of the graph's nodes in which every node
/// appears after all of its predecessors.
pub fn is_topological(order: &[NodeId], adjacency: &[Vec<NodeId>]) -> bool {
    if order.len() != adjacency.len() {
        return false;
    }
    let mut seen = HashSet::with_capacity(order.len());
    for node in order {
        let Some(preds) = adjacency.get(node.index()) else {
            return false;
        };
        if !preds.iter().all(|p| seen.contains(p)) {
            return false;
        }
        if !seen.insert(*node) {
            return false;
        }
    }
    true
}
