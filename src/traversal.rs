//! Read-only context threaded through every node call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cards::Hand;
use crate::error::{SolverError, SolverResult};
use crate::node::Player;
use crate::ranges::Range;
use crate::river_cache::RiverEvaluationCache;

/// Discount exponents: positive regrets scale by t^α/(t^α+1), negative
/// regrets by t^β/(t^β+1), strategy contributions by (t/(t+1))^γ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for Discount {
    fn default() -> Self {
        Discount {
            alpha: 1.5,
            beta: 0.0,
            gamma: 2.0,
        }
    }
}

/// Multipliers for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountWeights {
    pub positive: f64,
    pub negative: f64,
    pub strategy: f64,
}

impl Discount {
    pub fn validate(&self) -> SolverResult<()> {
        for (name, v) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !v.is_finite() {
                return Err(SolverError::InvalidValue(format!(
                    "discount {} must be finite, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }

    /// Weights for iteration `t` (counted from 1).
    pub fn weights(&self, t: usize) -> DiscountWeights {
        let t = t as f64;
        let a = t.powf(self.alpha);
        let b = t.powf(self.beta);
        DiscountWeights {
            positive: a / (a + 1.0),
            negative: b / (b + 1.0),
            strategy: (t / (t + 1.0)).powf(self.gamma),
        }
    }
}

/// Who is updating regrets this pass, plus the shared read-only data every
/// node needs.
pub struct Traversal<'a> {
    pub traverser: Player,
    pub iteration: usize,
    pub discount: Discount,
    weights: DiscountWeights,
    ranges: [&'a Range; 2],
    index_caches: [HashMap<Hand, usize>; 2],
    cache: &'a RiverEvaluationCache,
}

impl<'a> Traversal<'a> {
    pub fn new(
        ranges: [&'a Range; 2],
        cache: &'a RiverEvaluationCache,
        discount: Discount,
    ) -> Traversal<'a> {
        Traversal {
            traverser: Player::OOP,
            iteration: 1,
            discount,
            weights: discount.weights(1),
            index_caches: [ranges[0].index_map(), ranges[1].index_map()],
            ranges,
            cache,
        }
    }

    pub fn set_iteration(&mut self, iteration: usize) {
        self.iteration = iteration;
        self.weights = self.discount.weights(iteration);
    }

    #[inline]
    pub fn weights(&self) -> &DiscountWeights {
        &self.weights
    }

    #[inline]
    pub fn range(&self, player: Player) -> &'a Range {
        self.ranges[player.index()]
    }

    #[inline]
    pub fn traverser_range(&self) -> &'a Range {
        self.range(self.traverser)
    }

    #[inline]
    pub fn opponent_range(&self) -> &'a Range {
        self.range(self.traverser.opponent())
    }

    /// Hand index of `hand` in `player`'s range.
    #[inline]
    pub fn index_of(&self, player: Player, hand: &Hand) -> Option<usize> {
        self.index_caches[player.index()].get(hand).copied()
    }

    /// Opponent reach on the exact hand `hand`, zero if the opponent cannot hold it.
    #[inline]
    pub fn opponent_same_hand(&self, hand: &Hand, opponent_reach: &[f64]) -> f64 {
        self.index_of(self.traverser.opponent(), hand)
            .map_or(0.0, |j| opponent_reach[j])
    }

    #[inline]
    pub fn cache(&self) -> &'a RiverEvaluationCache {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_weights_at_first_iteration() {
        let w = Discount::default().weights(1);
        assert_relative_eq!(w.positive, 0.5);
        assert_relative_eq!(w.negative, 0.5);
        assert_relative_eq!(w.strategy, 0.25);
    }

    #[test]
    fn positive_weight_approaches_one() {
        let w = Discount::default().weights(10_000);
        assert!(w.positive > 0.999);
        assert_relative_eq!(w.negative, 0.5);
    }
}
