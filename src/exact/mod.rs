pub mod branch_and_bound;
pub mod naive;

pub use branch_and_bound::{BranchAndBound, Solution, SolveStatus, SolverConfig};
