//! Observation hooks for the branch-and-bound search.
//!
//! A [`SearchMonitor`] is called synchronously from within
//! [`BranchAndBound::execute_step`](crate::algorithm::IterativeAlgorithm::execute_step);
//! callbacks should therefore stay cheap. All methods default to doing nothing, and `()` is
//! the monitor used when none is attached.

use super::node::SearchNode;

pub trait SearchMonitor {
    /// Called for every node taken from the frontier, before it is classified
    fn on_pop(&mut self, _node: &SearchNode) {}

    /// Called when a complete tour improves the best known cost (`previous` is infinite
    /// for the first tour)
    fn on_incumbent(&mut self, _node: &SearchNode, _previous: f64) {}

    /// Called when `node` is discarded because its bound exceeds `best_cost`
    fn on_prune(&mut self, _node: &SearchNode, _best_cost: f64) {}

    /// Called for every child generated from `parent`, before the child enters the frontier
    fn on_child(&mut self, _parent: &SearchNode, _child: &SearchNode) {}
}

impl SearchMonitor for () {}

impl<M: SearchMonitor + ?Sized> SearchMonitor for &mut M {
    fn on_pop(&mut self, node: &SearchNode) {
        (**self).on_pop(node)
    }

    fn on_incumbent(&mut self, node: &SearchNode, previous: f64) {
        (**self).on_incumbent(node, previous)
    }

    fn on_prune(&mut self, node: &SearchNode, best_cost: f64) {
        (**self).on_prune(node, best_cost)
    }

    fn on_child(&mut self, parent: &SearchNode, child: &SearchNode) {
        (**self).on_child(parent, child)
    }
}
