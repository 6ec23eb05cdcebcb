use itertools::Itertools;

use crate::matrix::*;

/// Exhaustively enumerates all tours starting in city 0 and returns the cost of the cheapest
/// one, or `None` if no tour uses existing edges only. Runs in `O(n!)`; only useful as a
/// reference for small instances.
pub fn naive_solver(matrix: &CostMatrix) -> Option<f64> {
    let n = matrix.number_of_cities();
    if n == 0 {
        return None;
    }

    (1..n)
        .permutations(n as usize - 1)
        .filter_map(|rest| {
            let tour = std::iter::once(0).chain(rest).collect_vec();
            matrix.tour_cost(&tour)
        })
        .min_by(f64::total_cmp)
}
