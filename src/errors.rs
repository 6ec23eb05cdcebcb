use std::{collections::TryReserveError, error::Error};

use thiserror::Error;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

/// Shape and value violations of a cost matrix
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("matrix has no cities")]
    Empty,

    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("invalid cost {cost} at ({row}, {column}); costs must be non-negative")]
    InvalidCost { row: usize, column: usize, cost: f64 },
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MatrixError),

    #[error("cannot allocate search node: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("frontier would exceed the memory limit of {limit} bytes")]
    MemoryLimitExceeded { limit: usize },
}
