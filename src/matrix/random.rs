use std::ops::RangeInclusive;

use rand::Rng;

use super::*;

impl CostMatrix {
    /// Complete asymmetric instance; every off-diagonal cost is drawn uniformly from `costs`.
    /// Costs are integral so that tour costs can be compared exactly.
    pub fn random_uniform<R: Rng>(rng: &mut R, n: NumCities, costs: RangeInclusive<u32>) -> Self {
        Self::random_sparse(rng, n, costs, 1.0)
    }

    /// Like [`CostMatrix::random_uniform`], but each off-diagonal edge exists independently
    /// with probability `prob_edge`.
    pub fn random_sparse<R: Rng>(
        rng: &mut R,
        n: NumCities,
        costs: RangeInclusive<u32>,
        prob_edge: f64,
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&prob_edge));
        debug_assert!(!costs.is_empty());

        let mut matrix = Self::new(n);
        for u in 0..n {
            for v in (0..n).filter(|&v| v != u) {
                if rng.gen_bool(prob_edge) {
                    matrix.set(u, v, rng.gen_range(costs.clone()) as f64);
                }
            }
        }
        matrix
    }

    /// Complete symmetric instance with integral costs drawn uniformly from `costs`
    pub fn random_symmetric<R: Rng>(rng: &mut R, n: NumCities, costs: RangeInclusive<u32>) -> Self {
        let mut matrix = Self::new(n);
        for u in 0..n {
            for v in 0..u {
                let cost = rng.gen_range(costs.clone()) as f64;
                matrix.set(u, v, cost);
                matrix.set(v, u, cost);
            }
        }
        matrix
    }

    /// Places `n` cities uniformly at random in the square `[0, side)^2` and uses the
    /// Euclidean distances as costs. Coinciding cities have no edge between them.
    pub fn random_euclidean<R: Rng>(rng: &mut R, n: NumCities, side: f64) -> Self {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..side), rng.gen_range(0.0..side)))
            .collect();

        let mut matrix = Self::new(n);
        for (u, &(ux, uy)) in points.iter().enumerate() {
            for (v, &(vx, vy)) in points.iter().enumerate() {
                let dist = (ux - vx).hypot(uy - vy);
                if u != v && dist > 0.0 {
                    matrix.set(u as City, v as City, dist);
                }
            }
        }
        matrix
    }
}
