pub mod random;
pub mod reduction;

pub use reduction::*;

use std::{collections::TryReserveError, ops::Range};

use itertools::Itertools;

use crate::errors::{InvariantCheck, MatrixError};

pub type City = u32;
pub type NumCities = City;

/// Marks a missing edge. It is never used in arithmetic: reductions skip every cell holding it.
pub const NO_EDGE: f64 = f64::INFINITY;

/// Returns true if `cost` is a real edge cost (i.e. not [`NO_EDGE`])
#[inline]
pub fn is_edge(cost: f64) -> bool {
    cost.is_finite()
}

/// Dense, row-major `n x n` matrix of travel costs, where `get(u, v)` is the cost of
/// moving from city `u` to city `v`.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    number_of_cities: NumCities,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Creates a matrix of `n` cities without any edge.
    ///
    /// # Example
    /// ```
    /// use tsp_bnb::matrix::*;
    /// let matrix = CostMatrix::new(3);
    /// assert_eq!(matrix.number_of_cities(), 3);
    /// assert!(!matrix.has_edge(0, 1));
    /// ```
    pub fn new(number_of_cities: NumCities) -> Self {
        let n = number_of_cities as usize;
        Self {
            number_of_cities,
            cells: vec![NO_EDGE; n * n],
        }
    }

    /// Builds a matrix from its rows. The rows are taken as they are; in particular a zero
    /// entry stays a zero-cost edge.
    ///
    /// # Example
    /// ```
    /// use tsp_bnb::matrix::*;
    /// let matrix = CostMatrix::try_from_rows(vec![vec![NO_EDGE, 2.0], vec![3.0, NO_EDGE]]).unwrap();
    /// assert_eq!(matrix.get(1, 0), 3.0);
    /// assert!(CostMatrix::try_from_rows(vec![vec![1.0, 2.0]]).is_err());
    /// ```
    pub fn try_from_rows<R: AsRef<[f64]>>(
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self, MatrixError> {
        let mut cells = Vec::new();
        let mut lengths = Vec::new();
        for row in rows {
            let row = row.as_ref();
            lengths.push(row.len());
            cells.extend_from_slice(row);
        }

        if lengths.is_empty() {
            return Err(MatrixError::Empty);
        }

        let expected = lengths.len();
        if let Some((row, &len)) = lengths.iter().enumerate().find(|(_, l)| **l != expected) {
            return Err(MatrixError::NotSquare { row, len, expected });
        }

        Ok(Self {
            number_of_cities: expected as NumCities,
            cells,
        })
    }

    /// Takes over row-major `cells`, which have to hold exactly `n * n` entries
    pub(crate) fn from_cells(number_of_cities: NumCities, cells: Vec<f64>) -> Self {
        let n = number_of_cities as usize;
        debug_assert_eq!(cells.len(), n * n);
        Self {
            number_of_cities,
            cells,
        }
    }

    /// Returns a deep copy of the matrix. In contrast to `clone` an allocation failure is
    /// reported rather than aborting the process.
    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(self.cells.len())?;
        cells.extend_from_slice(&self.cells);
        Ok(Self {
            number_of_cities: self.number_of_cities,
            cells,
        })
    }

    /// Number of heap bytes occupied by the cells of a matrix with `n` cities
    pub fn bytes_for(number_of_cities: NumCities) -> usize {
        let n = number_of_cities as usize;
        n * n * std::mem::size_of::<f64>()
    }

    /// Number of heap bytes occupied by the cells of this matrix
    pub fn size_in_bytes(&self) -> usize {
        Self::bytes_for(self.number_of_cities)
    }

    pub fn number_of_cities(&self) -> NumCities {
        self.number_of_cities
    }

    pub fn len(&self) -> usize {
        self.number_of_cities as usize
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_cities == 0
    }

    /// Returns a range over all cities; it does not borrow `self`
    pub fn cities(&self) -> Range<City> {
        0..self.number_of_cities
    }

    #[inline]
    fn index_of(&self, u: City, v: City) -> usize {
        debug_assert!(u < self.number_of_cities && v < self.number_of_cities);
        u as usize * self.len() + v as usize
    }

    #[inline]
    pub fn get(&self, u: City, v: City) -> f64 {
        self.cells[self.index_of(u, v)]
    }

    #[inline]
    pub fn set(&mut self, u: City, v: City, cost: f64) {
        let idx = self.index_of(u, v);
        self.cells[idx] = cost;
    }

    pub fn has_edge(&self, u: City, v: City) -> bool {
        is_edge(self.get(u, v))
    }

    pub fn remove_edge(&mut self, u: City, v: City) {
        self.set(u, v, NO_EDGE);
    }

    /// Removes all edges leaving `u`
    pub fn remove_row(&mut self, u: City) {
        self.row_mut(u).fill(NO_EDGE);
    }

    /// Removes all edges entering `v`
    pub fn remove_column(&mut self, v: City) {
        let n = self.len();
        self.cells
            .iter_mut()
            .skip(v as usize)
            .step_by(n)
            .for_each(|c| *c = NO_EDGE);
    }

    pub fn row(&self, u: City) -> &[f64] {
        let begin = u as usize * self.len();
        &self.cells[begin..begin + self.len()]
    }

    pub fn row_mut(&mut self, u: City) -> &mut [f64] {
        let n = self.len();
        let begin = u as usize * n;
        &mut self.cells[begin..begin + n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.cells.chunks_exact(self.len().max(1))
    }

    /// Returns the finite out-neighbours of `u` together with the cost of the edge
    pub fn edges_from(&self, u: City) -> impl Iterator<Item = (City, f64)> + '_ {
        self.row(u)
            .iter()
            .enumerate()
            .filter(|(_, c)| is_edge(**c))
            .map(|(v, &c)| (v as City, c))
    }

    /// Number of real edges in the matrix
    pub fn number_of_edges(&self) -> usize {
        self.cells.iter().filter(|c| is_edge(**c)).count()
    }

    /// Cost of the closed tour visiting the cities in the order given (and returning to the first),
    /// or `None` if the tour uses a missing edge.
    ///
    /// # Example
    /// ```
    /// use tsp_bnb::matrix::*;
    /// let matrix = CostMatrix::try_from_rows(vec![
    ///     vec![NO_EDGE, 1.0, 2.0],
    ///     vec![3.0, NO_EDGE, 4.0],
    ///     vec![5.0, 6.0, NO_EDGE],
    /// ]).unwrap();
    /// assert_eq!(matrix.tour_cost(&[0, 1, 2]), Some(10.0));
    /// ```
    pub fn tour_cost(&self, tour: &[City]) -> Option<f64> {
        let (&first, _) = tour.split_first()?;
        let last = *tour.last()?;
        if tour.len() == 1 {
            return Some(0.0);
        }

        let mut total = 0.0;
        let closing = std::iter::once((&last, &first));
        for (&u, &v) in tour.iter().tuple_windows().chain(closing) {
            let cost = self.get(u, v);
            if !is_edge(cost) {
                return None;
            }
            total += cost;
        }
        Some(total)
    }
}

impl InvariantCheck<MatrixError> for CostMatrix {
    /// A matrix accepted by the solver has at least one city and only non-negative costs
    /// (or [`NO_EDGE`]).
    fn is_correct(&self) -> Result<(), MatrixError> {
        if self.is_empty() {
            return Err(MatrixError::Empty);
        }

        if self.cells.len() != self.len() * self.len() {
            return Err(MatrixError::NotSquare {
                row: 0,
                len: self.cells.len(),
                expected: self.len() * self.len(),
            });
        }

        for (idx, &cost) in self.cells.iter().enumerate() {
            if cost.is_nan() || cost < 0.0 {
                return Err(MatrixError::InvalidCost {
                    row: idx / self.len(),
                    column: idx % self.len(),
                    cost,
                });
            }
        }

        Ok(())
    }
}
