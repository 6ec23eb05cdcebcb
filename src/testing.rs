use crate::{
    exact::branch_and_bound::{SearchMonitor, SearchNode},
    matrix::*,
};

/// Symmetric four-city instance; the optimal tour `0 -> 1 -> 3 -> 2 -> 0` costs 80
pub fn four_city_example() -> CostMatrix {
    CostMatrix::try_from_rows(vec![
        vec![NO_EDGE, 10.0, 15.0, 20.0],
        vec![10.0, NO_EDGE, 35.0, 25.0],
        vec![15.0, 35.0, NO_EDGE, 30.0],
        vec![20.0, 25.0, 30.0, NO_EDGE],
    ])
    .unwrap()
}

/// Records the search and asserts the per-node invariants while doing so:
/// pruned nodes are never expanded, children never undercut their parent,
/// and every incumbent improves on the previous one.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
    pub popped: Vec<f64>,
    pub incumbents: Vec<f64>,
    pub pruned: usize,
    pub children: usize,
    current_pruned: bool,
}

impl SearchMonitor for RecordingMonitor {
    fn on_pop(&mut self, node: &SearchNode) {
        self.popped.push(node.cost());
        self.current_pruned = false;
    }

    fn on_incumbent(&mut self, node: &SearchNode, previous: f64) {
        assert!(node.is_complete_tour());
        assert!(node.cost() < previous);
        self.incumbents.push(node.cost());
    }

    fn on_prune(&mut self, node: &SearchNode, best_cost: f64) {
        assert!(node.cost() > best_cost);
        self.current_pruned = true;
        self.pruned += 1;
    }

    fn on_child(&mut self, parent: &SearchNode, child: &SearchNode) {
        assert!(!self.current_pruned, "expanded a pruned node");
        assert!(child.cost() >= parent.cost());
        assert_eq!(child.level(), parent.level() + 1);
        self.children += 1;
    }
}
