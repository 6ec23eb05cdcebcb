use std::{
    cmp::Ordering,
    collections::{BinaryHeap, TryReserveError},
};

use super::node::SearchNode;

/// Heap entry; `seq` is the insertion counter used to break ties between equal costs.
#[derive(Debug)]
struct Pending {
    seq: u64,
    node: SearchNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    // BinaryHeap is a max-heap: the cheapest (and among equals the oldest) entry has to compare greatest
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .cost()
            .total_cmp(&self.node.cost())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// # PriorityFrontier
///
/// Min-priority queue of search nodes keyed by their cost. Nodes of equal cost are returned
/// in the order they were pushed, which makes every search run reproducible.
///
/// The frontier also keeps track of the heap memory owned by the matrices of its nodes.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<Pending>,
    next_seq: u64,
    matrix_bytes: usize,
    max_len: usize,
}

impl PriorityFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a node. Fails only if the heap itself cannot grow.
    pub fn push(&mut self, node: SearchNode) -> Result<(), TryReserveError> {
        self.heap.try_reserve(1)?;

        self.matrix_bytes += node.size_in_bytes();
        self.heap.push(Pending {
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
        self.max_len = self.max_len.max(self.heap.len());
        Ok(())
    }

    /// Removes and returns the node of minimum cost
    pub fn pop(&mut self) -> Option<SearchNode> {
        let Pending { node, .. } = self.heap.pop()?;
        self.matrix_bytes -= node.size_in_bytes();
        Some(node)
    }

    /// Cost of the node [`PriorityFrontier::pop`] would return next
    pub fn peek_cost(&self) -> Option<f64> {
        self.heap.peek().map(|p| p.node.cost())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Heap bytes owned by the matrices of all pending nodes
    pub fn matrix_bytes(&self) -> usize {
        self.matrix_bytes
    }

    /// Largest number of nodes pending at the same time
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
