//! Row/column reduction of a [`CostMatrix`].
//!
//! Every tour leaves each city exactly once and enters each city exactly once. Subtracting
//! the cheapest outgoing edge from a row (and then the cheapest incoming edge from a column)
//! therefore lowers the cost of every tour by the same amount, and that amount is a lower
//! bound on the cost of any tour that is still possible in the matrix.

use super::*;

/// Subtracts from every row its smallest real cost and returns these minima (one per row).
/// A row without any edge yields [`NO_EDGE`] and stays untouched.
pub fn row_reduce(matrix: &mut CostMatrix) -> Vec<f64> {
    matrix
        .cities()
        .map(|u| {
            let row = matrix.row_mut(u);
            let min = row.iter().copied().fold(NO_EDGE, f64::min);
            if is_edge(min) {
                row.iter_mut().filter(|c| is_edge(**c)).for_each(|c| *c -= min);
            }
            min
        })
        .collect()
}

/// Subtracts from every column its smallest real cost and returns these minima (one per column).
/// Intended to be called after [`row_reduce`].
pub fn column_reduce(matrix: &mut CostMatrix) -> Vec<f64> {
    let mut minima = vec![NO_EDGE; matrix.len()];
    for row in matrix.rows() {
        for (min, &c) in minima.iter_mut().zip(row) {
            *min = min.min(c);
        }
    }

    for u in matrix.cities() {
        for (c, &min) in matrix.row_mut(u).iter_mut().zip(&minima) {
            if is_edge(*c) && is_edge(min) {
                *c -= min;
            }
        }
    }

    minima
}

/// Reduces `matrix` in place (rows first, then columns) and returns the sum of all real
/// minima. The value never exceeds the cost of completing any tour consistent with the matrix.
///
/// # Example
/// ```
/// use tsp_bnb::matrix::*;
/// let mut matrix = CostMatrix::try_from_rows(vec![
///     vec![NO_EDGE, 3.0, 5.0],
///     vec![4.0, NO_EDGE, 9.0],
///     vec![7.0, 2.0, NO_EDGE],
/// ]).unwrap();
/// assert_eq!(estimate_cost(&mut matrix), 11.0);
/// assert_eq!(matrix.get(0, 1), 0.0);
/// ```
pub fn estimate_cost(matrix: &mut CostMatrix) -> f64 {
    let rows = row_reduce(matrix);
    let columns = column_reduce(matrix);

    rows.iter()
        .chain(columns.iter())
        .copied()
        .filter(|&m| is_edge(m))
        .fold(0.0, |acc, m| acc + m)
}
