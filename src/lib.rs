pub mod algorithm;
pub mod errors;
pub mod exact;
pub mod io;
pub mod log;
pub mod matrix;

pub mod prelude {
    pub use super::algorithm::*;
    pub use super::errors::*;
    pub use super::exact::branch_and_bound::{
        BranchAndBound, SearchStats, Solution, SolveStatus, SolverConfig, solve, solve_with_config,
    };
    pub use super::io::*;
    pub use super::matrix::*;
}

#[cfg(test)]
mod testing;
