use std::collections::TryReserveError;

use crate::matrix::*;

/// Every tour starts (and ends) in this city
pub const START_CITY: City = 0;

/// One state of the search tree: a partial tour ending in `vertex` after fixing `level`
/// cities, together with the reduced matrix of the edges still available.
#[derive(Debug)]
pub struct SearchNode {
    cost: f64,
    vertex: City,
    level: NumCities,
    matrix: CostMatrix,
}

impl SearchNode {
    /// Builds the root from the input matrix. The matrix is taken over (not copied), the return
    /// edge into the start city is removed, and the remaining matrix is reduced to obtain
    /// the initial bound.
    pub fn root(mut matrix: CostMatrix) -> Self {
        matrix.remove_edge(START_CITY, START_CITY);
        let cost = estimate_cost(&mut matrix);
        Self {
            cost,
            vertex: START_CITY,
            level: 0,
            matrix,
        }
    }

    /// Branches on the edge `(self.vertex, destination)`, which has to exist in the matrix.
    /// The child's cost is this node's cost, plus the reduced cost of the edge, plus the
    /// reduction of the child's matrix.
    pub fn branch(&self, destination: City) -> Result<SearchNode, TryReserveError> {
        let edge = self.matrix.get(self.vertex, destination);
        debug_assert!(is_edge(edge));

        let level = self.level + 1;
        let mut matrix = create_node(&self.matrix, level, self.vertex, destination)?;
        let bound = estimate_cost(&mut matrix);

        Ok(SearchNode {
            cost: self.cost + edge + bound,
            vertex: destination,
            level,
            matrix,
        })
    }

    /// The city fixed last has to be able to return to the start city; otherwise the child
    /// would complete a tour that does not exist. The return edge is still present in this
    /// node's matrix, since `(v, START_CITY)` is only removed once `v` has been entered.
    pub fn can_branch_to(&self, destination: City) -> bool {
        self.level + 2 != self.matrix.number_of_cities()
            || self.matrix.has_edge(destination, START_CITY)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn vertex(&self) -> City {
        self.vertex
    }

    pub fn level(&self) -> NumCities {
        self.level
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// A node is a complete tour once all but the start city have been fixed
    pub fn is_complete_tour(&self) -> bool {
        self.level + 1 == self.matrix.number_of_cities()
    }

    /// Heap bytes owned by this node
    pub fn size_in_bytes(&self) -> usize {
        self.matrix.size_in_bytes()
    }
}

/// Returns an independent copy of `parent` in which moving from `from` to `to` has been fixed:
/// nothing else may leave `from`, nothing else may enter `to`, and the tour may not close from
/// `to` back to the start city. On level 0 (the root) only the return edge is removed.
pub fn create_node(
    parent: &CostMatrix,
    level: NumCities,
    from: City,
    to: City,
) -> Result<CostMatrix, TryReserveError> {
    let mut matrix = parent.try_clone()?;

    if level != 0 {
        matrix.remove_row(from);
        matrix.remove_column(to);
    }

    matrix.remove_edge(to, START_CITY);
    Ok(matrix)
}
