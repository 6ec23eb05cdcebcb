//! Best-first branch and bound for the travelling salesman problem.
//!
//! Every search node owns a reduced copy of the cost matrix. Fixing the edge `(u, v)` removes
//! row `u`, column `v` and the edge `(v, start)` from the copy; reducing the remaining matrix
//! yields a lower bound on the cost of completing the tour. Nodes are processed in order of
//! their bound, and a node whose bound exceeds the best complete tour is discarded.

mod frontier;
pub mod monitor;
pub mod node;
mod solution;

pub use frontier::PriorityFrontier;
pub use monitor::SearchMonitor;
pub use node::{START_CITY, SearchNode, create_node};
pub use solution::*;

use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    errors::{InvariantCheck, SolverError},
    matrix::*,
};

/// The search stops after 15 minutes unless configured otherwise
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(15 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Wall-clock limit; checked after every node that was not pruned
    pub time_limit: Duration,
    /// Upper bound on the bytes held by the matrices of pending nodes. Exceeding it is handled
    /// exactly like a failed allocation.
    pub memory_limit: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            memory_limit: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }
}

/// Solves `matrix` with the default configuration
///
/// # Example
/// ```
/// use tsp_bnb::{exact::branch_and_bound::*, matrix::*};
/// let matrix = CostMatrix::try_from_rows(vec![
///     vec![NO_EDGE, 1.0, 2.0],
///     vec![3.0, NO_EDGE, 4.0],
///     vec![5.0, 6.0, NO_EDGE],
/// ]).unwrap();
/// let solution = solve(matrix).unwrap();
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(solution.cost, 10.0);
/// ```
pub fn solve(matrix: CostMatrix) -> Result<Solution, SolverError> {
    solve_with_config(matrix, SolverConfig::default())
}

pub fn solve_with_config(matrix: CostMatrix, config: SolverConfig) -> Result<Solution, SolverError> {
    Ok(BranchAndBound::with_config(matrix, config)?.solve())
}

pub struct BranchAndBound<M: SearchMonitor = ()> {
    number_of_cities: NumCities,
    frontier: PriorityFrontier,
    best_cost: f64,
    config: SolverConfig,
    monitor: M,
    stats: SearchStats,
    start: Instant,
    solution: Option<Solution>,
}

impl BranchAndBound {
    pub fn new(matrix: CostMatrix) -> Result<Self, SolverError> {
        Self::with_config(matrix, SolverConfig::default())
    }

    pub fn with_config(matrix: CostMatrix, config: SolverConfig) -> Result<Self, SolverError> {
        Self::with_monitor(matrix, config, ())
    }
}

impl<M: SearchMonitor> BranchAndBound<M> {
    /// Validates the matrix, computes the root bound and starts the clock.
    /// Fails with [`SolverError::MalformedInput`] for an empty matrix or invalid costs.
    pub fn with_monitor(
        matrix: CostMatrix,
        config: SolverConfig,
        monitor: M,
    ) -> Result<Self, SolverError> {
        matrix.is_correct()?;

        let number_of_cities = matrix.number_of_cities();
        let root = SearchNode::root(matrix);
        debug!(
            "Start branch and bound: n={number_of_cities:>4} root bound={} time limit={:?}",
            root.cost(),
            config.time_limit
        );

        let stats = SearchStats {
            nodes_generated: 1,
            root_bound: root.cost(),
            ..Default::default()
        };

        let mut frontier = PriorityFrontier::new();
        frontier.push(root)?;

        Ok(Self {
            number_of_cities,
            frontier,
            best_cost: f64::INFINITY,
            config,
            monitor,
            stats,
            start: Instant::now(),
            solution: None,
        })
    }

    /// Runs the search until it terminates and returns its result
    pub fn solve(&mut self) -> Solution {
        loop {
            if let Some(solution) = &self.solution {
                return solution.clone();
            }
            self.execute_step();
        }
    }

    pub fn number_of_cities(&self) -> NumCities {
        self.number_of_cities
    }

    /// Cost of the best complete tour seen so far (infinite if there is none)
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn monitor(&self) -> &M {
        &self.monitor
    }

    fn check_memory_limit(&self, additional_bytes: usize) -> Result<(), SolverError> {
        match self.config.memory_limit {
            Some(limit) if self.frontier.matrix_bytes() + additional_bytes > limit => {
                Err(SolverError::MemoryLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }

    /// Pushes one child per edge leaving the node's city
    fn expand(&mut self, node: &SearchNode) -> Result<(), SolverError> {
        self.stats.nodes_expanded += 1;

        for (destination, _) in node.matrix().edges_from(node.vertex()) {
            if !node.can_branch_to(destination) {
                continue;
            }

            self.check_memory_limit(node.size_in_bytes())?;

            let child = node.branch(destination)?;
            self.monitor.on_child(node, &child);
            self.frontier.push(child)?;
            self.stats.nodes_generated += 1;
        }

        Ok(())
    }

    fn finish(&mut self, status: SolveStatus, cost: f64) {
        self.stats.elapsed = self.start.elapsed();
        self.stats.max_frontier_len = self.frontier.max_len();
        debug!("Branch and bound {status}: cost={cost} | {}", self.stats);

        self.solution = Some(Solution {
            cost,
            status,
            stats: self.stats.clone(),
        });
    }
}

impl<M: SearchMonitor> IterativeAlgorithm<Solution> for BranchAndBound<M> {
    /// Processes a single node of the frontier
    fn execute_step(&mut self) {
        if self.solution.is_some() {
            return;
        }

        let Some(node) = self.frontier.pop() else {
            if self.best_cost.is_finite() {
                self.finish(SolveStatus::Optimal, self.best_cost);
            } else {
                self.finish(SolveStatus::Infeasible, f64::INFINITY);
            }
            return;
        };

        self.monitor.on_pop(&node);

        if node.is_complete_tour() && node.cost() < self.best_cost {
            trace!("New best tour: {} (was {})", node.cost(), self.best_cost);
            self.monitor.on_incumbent(&node, self.best_cost);
            self.best_cost = node.cost();
            self.stats.incumbent_updates += 1;
        } else if node.cost() > self.best_cost {
            self.monitor.on_prune(&node, self.best_cost);
            self.stats.nodes_pruned += 1;
            // a pruned node never ends the search, not even past the time limit
            return;
        } else if let Err(err) = self.expand(&node) {
            warn!(
                "Abort search at level {} with cost {}: {err}",
                node.level(),
                node.cost()
            );
            self.best_cost = node.cost();
            self.finish(SolveStatus::MemoryExhausted, node.cost());
            return;
        }

        // reports the cost of the node just processed, not the best complete tour
        if self.start.elapsed() > self.config.time_limit {
            info!(
                "Time limit of {:?} exceeded: last node cost {} best tour {} pending {}",
                self.config.time_limit,
                node.cost(),
                self.best_cost,
                self.frontier.len()
            );
            self.finish(SolveStatus::TimeLimited, node.cost());
        }
    }

    fn is_completed(&self) -> bool {
        self.solution.is_some()
    }

    /// The solution is only known once the search terminated; see [`BranchAndBound::best_cost`]
    /// for the interim value.
    fn best_known_solution(&mut self) -> Option<Solution> {
        self.solution.clone()
    }
}

impl<M: SearchMonitor> TerminatingIterativeAlgorithm<Solution> for BranchAndBound<M> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        errors::MatrixError,
        exact::naive::naive_solver,
        testing::{RecordingMonitor, four_city_example},
    };
    use rand::{Rng, SeedableRng};

    #[test]
    fn four_cities() {
        let solution = solve(four_city_example()).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.cost, 80.0);
        assert_eq!(solution.stats.root_bound, 70.0);
        assert!(solution.stats.incumbent_updates >= 1);
    }

    #[test]
    fn single_city() {
        let solution = solve(CostMatrix::new(1)).unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.cost, 0.0);
        assert!(solution.cost.is_sign_positive());
        assert!(solution.stats.root_bound.is_sign_positive());
        assert_eq!(solution.stats.nodes_generated, 1);
    }

    #[test]
    fn two_cities() {
        let matrix = CostMatrix::try_from_rows(vec![vec![NO_EDGE, 3.0], vec![5.0, NO_EDGE]]).unwrap();
        let solution = solve(matrix).unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.cost, 8.0);
    }

    #[test]
    fn zero_cost_edges_are_edges() {
        let matrix = CostMatrix::try_from_rows(vec![
            vec![NO_EDGE, 0.0, 7.0],
            vec![7.0, NO_EDGE, 0.0],
            vec![0.0, 7.0, NO_EDGE],
        ])
        .unwrap();
        let solution = solve(matrix).unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.cost, 0.0);
    }

    #[test]
    fn unique_optimum() {
        // the cycle 0 -> 2 -> 4 -> 1 -> 3 -> 0 is the only one using cheap edges
        let mut matrix = CostMatrix::new(5);
        for u in matrix.cities() {
            for v in matrix.cities().filter(|&v| v != u) {
                matrix.set(u, v, 100.0);
            }
        }
        for (u, v) in [(0, 2), (2, 4), (4, 1), (1, 3), (3, 0)] {
            matrix.set(u, v, 1.0 + u as f64);
        }
        assert_eq!(matrix.tour_cost(&[0, 2, 4, 1, 3]), Some(15.0));

        let solution = solve(matrix).unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.cost, 15.0);
    }

    #[test]
    fn matches_naive_solver() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(0x7a5);
        for _ in 0..200 {
            let n = rng.gen_range(2..=8);
            let matrix = if rng.gen_bool(0.5) {
                CostMatrix::random_uniform(&mut rng, n, 1..=100)
            } else {
                CostMatrix::random_symmetric(&mut rng, n, 1..=100)
            };

            let expected = naive_solver(&matrix).unwrap();
            let solution = solve(matrix.clone()).unwrap();
            assert!(solution.is_optimal());
            assert_eq!(solution.cost, expected, "matrix: {matrix:?}");
        }
    }

    #[test]
    fn missing_return_edge() {
        // 2 -> 0 is missing, so the only tour is 0 -> 2 -> 1 -> 0
        let matrix = CostMatrix::try_from_rows(vec![
            vec![NO_EDGE, 1.0, 5.0],
            vec![5.0, NO_EDGE, 1.0],
            vec![NO_EDGE, 5.0, NO_EDGE],
        ])
        .unwrap();
        let solution = solve(matrix).unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.cost, 15.0);

        // a path through all cities that cannot be closed
        let matrix = CostMatrix::try_from_rows(vec![
            vec![NO_EDGE, 1.0, NO_EDGE],
            vec![NO_EDGE, NO_EDGE, 1.0],
            vec![NO_EDGE, NO_EDGE, NO_EDGE],
        ])
        .unwrap();
        let solution = solve(matrix).unwrap();
        assert_eq!(solution.status, SolveStatus::Infeasible);
    }

    #[test]
    fn sparse_matches_naive_solver() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(0x5ba);
        let mut infeasible = 0;
        for _ in 0..300 {
            let n = rng.gen_range(1..=7);
            let prob_edge = [0.3, 0.5, 0.7, 0.9][rng.gen_range(0..4)];
            let matrix = CostMatrix::random_sparse(&mut rng, n, 1..=30, prob_edge);

            let solution = solve(matrix.clone()).unwrap();
            match naive_solver(&matrix) {
                Some(expected) => {
                    assert!(solution.is_optimal(), "matrix: {matrix:?}");
                    assert_eq!(solution.cost, expected, "matrix: {matrix:?}");
                }
                None => {
                    assert_eq!(solution.status, SolveStatus::Infeasible, "matrix: {matrix:?}");
                    infeasible += 1;
                }
            }
        }

        assert!(infeasible > 0);
    }

    #[test]
    fn euclidean_instances() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(31);
        for n in 3..=8 {
            let matrix = CostMatrix::random_euclidean(&mut rng, n, 1000.0);
            let expected = naive_solver(&matrix).unwrap();
            let solution = solve(matrix).unwrap();
            assert!(solution.is_optimal());
            assert!(
                (solution.cost - expected).abs() < 1e-6 * expected,
                "{} vs {expected}",
                solution.cost
            );
        }
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            solve(CostMatrix::new(0)),
            Err(SolverError::MalformedInput(MatrixError::Empty))
        ));

        let mut matrix = four_city_example();
        matrix.set(1, 2, f64::NAN);
        assert!(matches!(
            BranchAndBound::new(matrix),
            Err(SolverError::MalformedInput(MatrixError::InvalidCost { row: 1, column: 2, .. }))
        ));

        let err: SolverError = CostMatrix::try_from_rows(vec![vec![NO_EDGE, 1.0], vec![1.0]])
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            SolverError::MalformedInput(MatrixError::NotSquare { .. })
        ));
    }

    #[test]
    fn without_edges_there_is_no_tour() {
        let solution = solve(CostMatrix::new(3)).unwrap();
        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(solution.status.is_final());
        assert_eq!(solution.cost, f64::INFINITY);
    }

    #[test]
    fn time_limit_reports_last_popped_node() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(99);
        let matrix = CostMatrix::random_uniform(&mut rng, 14, 1..=1000);

        let config = SolverConfig::default().with_time_limit(Duration::ZERO);
        let solution = solve_with_config(matrix, config).unwrap();

        assert_eq!(solution.status, SolveStatus::TimeLimited);
        assert!(!solution.status.is_final());
        // only the root was processed
        assert_eq!(solution.cost, solution.stats.root_bound);
        assert_eq!(solution.stats.nodes_expanded, 1);
        assert_eq!(solution.stats.nodes_generated, 14);
    }

    #[test]
    fn time_limit_skips_pruned_nodes() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(100);
        let mut pruned_past_limit = 0;

        for _ in 0..30 {
            let matrix = CostMatrix::random_uniform(&mut rng, 9, 1..=1000);
            let optimum = solve(matrix.clone()).unwrap().cost;

            // process nodes until the first complete tour has been found, then let the time run out
            let config = SolverConfig::default().with_time_limit(Duration::from_secs(3600));
            let mut solver = BranchAndBound::with_config(matrix, config).unwrap();
            solver.run_while(|s| s.best_cost().is_infinite());
            assert!(!solver.is_completed());
            assert_eq!(solver.best_cost(), optimum);

            solver.config.time_limit = Duration::ZERO;
            if solver.frontier.peek_cost().is_some_and(|c| c > optimum) {
                let pruned = solver.stats().nodes_pruned;
                solver.execute_step();
                assert!(!solver.is_completed());
                assert_eq!(solver.stats().nodes_pruned, pruned + 1);
                pruned_past_limit += 1;
            }

            // every node popped from now on costs at least the optimum; only those with exactly
            // that cost are processed, so a timed out search still reports the optimum
            let solution = solver.run_to_completion().unwrap();
            assert!(matches!(
                solution.status,
                SolveStatus::TimeLimited | SolveStatus::Optimal
            ));
            assert_eq!(solution.cost, optimum);
        }

        assert!(pruned_past_limit > 0);
    }

    #[test]
    fn memory_limit_stops_search() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(5);
        let matrix = CostMatrix::random_uniform(&mut rng, 10, 1..=100);

        let config = SolverConfig::default().with_memory_limit(0);
        let mut solver = BranchAndBound::with_config(matrix.clone(), config).unwrap();
        let solution = solver.solve();
        assert_eq!(solution.status, SolveStatus::MemoryExhausted);
        assert_eq!(solution.cost, solution.stats.root_bound);
        assert_eq!(solver.best_cost(), solution.cost);
        assert_eq!(solution.stats.nodes_generated, 1);

        let config = SolverConfig::default().with_memory_limit(5 * CostMatrix::bytes_for(10));
        let solution = solve_with_config(matrix, config).unwrap();
        assert_eq!(solution.status, SolveStatus::MemoryExhausted);
        assert!(solution.cost >= solution.stats.root_bound);
        assert_eq!(solution.stats.nodes_generated, 1 + 5);
    }

    #[test]
    fn search_invariants() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(17);
        let mut total_pruned = 0;

        for _ in 0..50 {
            let n = rng.gen_range(3..=8);
            let matrix = CostMatrix::random_uniform(&mut rng, n, 1..=30);

            let mut monitor = RecordingMonitor::default();
            let solution =
                BranchAndBound::with_monitor(matrix, SolverConfig::default(), &mut monitor)
                    .unwrap()
                    .solve();

            assert!(solution.is_optimal());
            assert_eq!(monitor.pruned as u64, solution.stats.nodes_pruned);
            assert_eq!(monitor.children as u64 + 1, solution.stats.nodes_generated);
            assert_eq!(monitor.incumbents.last().copied(), Some(solution.cost));
            assert!(monitor.incumbents.windows(2).all(|w| w[1] < w[0]));
            assert!(monitor.popped.windows(2).all(|w| w[0] <= w[1]));
            total_pruned += monitor.pruned;
        }

        assert!(total_pruned > 0);
    }

    #[test]
    fn best_cost_never_increases() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(18);
        let matrix = CostMatrix::random_symmetric(&mut rng, 9, 1..=50);

        let mut solver = BranchAndBound::new(matrix).unwrap();
        let mut previous = solver.best_cost();
        let mut steps = 0;
        solver.run_while(|s| {
            assert!(s.best_cost() <= previous);
            previous = s.best_cost();
            steps += 1;
            true
        });

        let solution = solver.run_to_completion().unwrap();
        assert_eq!(solution.cost, previous);
        assert!(steps as u64 >= solution.stats.nodes_expanded);
    }

    #[test]
    fn deterministic() {
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(19);
        let matrix = CostMatrix::random_uniform(&mut rng, 9, 1..=5);

        let run = || {
            let mut monitor = RecordingMonitor::default();
            let cost = BranchAndBound::with_monitor(matrix.clone(), SolverConfig::default(), &mut monitor)
                .unwrap()
                .solve()
                .cost;
            (cost, monitor.popped)
        };

        assert_eq!(run(), run());
    }
}
