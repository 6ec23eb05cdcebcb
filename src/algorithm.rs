//! Search algorithms in this crate can be driven step by step via the [`IterativeAlgorithm`] trait.
//!
//! A step is a small, bounded unit of work (for the branch-and-bound solver: processing one
//! node of the frontier). Driving the algorithm step-wise allows a caller to observe it between
//! steps or to stop it early; running it to the end is offered by
//! [`TerminatingIterativeAlgorithm::run_to_completion`].

use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute our algorithms. Observe
/// that it does not prescribe any constructor which is left to the algorithm designer as each
/// algorithm has specific parameters et cetera. The construction phase should, in general, be
/// quite fast and only involve little computation.
///
/// As an adopter of [`IterativeAlgorithm`], you have to implement the methods
///   [`IterativeAlgorithm::execute_step`],
///   [`IterativeAlgorithm::is_completed`] and [`IterativeAlgorithm::best_known_solution`].
///
/// # Example
/// ```
/// use tsp_bnb::algorithm::IterativeAlgorithm;
///
/// struct CountDown {
///     remaining: u32,
/// }
///
/// impl IterativeAlgorithm<u32> for CountDown {
///     fn execute_step(&mut self) {
///         self.remaining -= 1;
///     }
///
///     fn is_completed(&self) -> bool {
///         self.remaining == 0
///     }
///
///     fn best_known_solution(&mut self) -> Option<u32> {
///         self.is_completed().then_some(0)
///     }
/// }
///
/// let mut algo = CountDown { remaining: 10 };
/// algo.run_while(|a| a.remaining > 4);
/// assert_eq!(algo.remaining, 4);
/// ```
pub trait IterativeAlgorithm<Result> {
    /// Advances the computation of this algorithm by one step.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] has
    /// no further effect.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&mut self) -> Option<Result>;

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until the
    /// `predicate` becomes false or [`IterativeAlgorithm::is_completed`] becomes true. The function
    /// `predicate` is evaluated after each iteration, i.e. a step is carried out even if the
    /// predicate always returns false.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until either a
    /// timeout occurred or [`IterativeAlgorithm::is_completed`] is true. Observe that the timeout
    /// is guaranteed only in the sense that [`IterativeAlgorithm::execute_step`] is not called
    /// again after the timeout.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// [`TerminatingIterativeAlgorithm`] is a marker trait, i.e. to adopt it, you give an empty `impl`
/// block. Add this trait to algorithms that will eventually terminate (i.e. in contrast to an
/// algorithm does not know when to stop).
pub trait TerminatingIterativeAlgorithm<Result>: IterativeAlgorithm<Result> {
    /// Execute the algorithm until it completed and return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<Result> {
        while !self.is_completed() {
            self.execute_step();
        }
        self.best_known_solution()
    }
}
