use std::{fmt, time::Duration};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Terminal condition a [`Solution`] was produced by
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SolveStatus {
    /// The frontier was exhausted; the cost is the optimum.
    Optimal,
    /// The frontier was exhausted without reaching a complete tour; the cost is infinite.
    Infeasible,
    /// The time limit was hit; the cost is the one of the node processed last.
    TimeLimited,
    /// A search node could not be allocated; the cost is the one of the node being expanded.
    MemoryExhausted,
}

impl SolveStatus {
    /// True if the search ran to the end, i.e. the cost is not an interim value
    pub fn is_final(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Infeasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::TimeLimited => "time-limited",
            SolveStatus::MemoryExhausted => "memory-exhausted",
        };
        f.write_str(name)
    }
}

/// Counters collected during one search
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes created, including the root
    pub nodes_generated: u64,
    /// Nodes whose children were generated
    pub nodes_expanded: u64,
    /// Nodes discarded because their bound exceeded the best known cost
    pub nodes_pruned: u64,
    /// Number of times the best known cost improved
    pub incumbent_updates: u64,
    /// Largest number of nodes pending at the same time
    pub max_frontier_len: usize,
    /// Lower bound of the root node
    pub root_bound: f64,
    pub elapsed: Duration,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generated: {} expanded: {} pruned: {} incumbents: {} max frontier: {} root bound: {} time: {:.2?}",
            self.nodes_generated,
            self.nodes_expanded,
            self.nodes_pruned,
            self.incumbent_updates,
            self.max_frontier_len,
            self.root_bound,
            self.elapsed
        )
    }
}

/// Result of a search: a tour cost tagged with the condition that produced it.
/// Only the cost of the tour is reported, not the tour itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    /// Infinite if there is no tour; serialized as `null` in that case
    #[serde(with = "cost_or_null")]
    pub cost: f64,
    pub status: SolveStatus,
    pub stats: SearchStats,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

mod cost_or_null {
    use super::*;

    pub fn serialize<S>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        cost.is_finite().then_some(*cost).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
