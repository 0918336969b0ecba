//! Flat per-node regret storage for discounted CFR+.
//!
//! One table per decision node, covering every hand of the acting player's
//! range. For hand `h` and action `a`:
//!
//!   index = h * num_actions + a
//!
//! so a hand's row is contiguous and regret matching walks it in one pass.

use crate::traversal::DiscountWeights;

#[derive(Clone, Debug, Default)]
pub struct FlatCfr {
    num_actions: usize,
    num_hands: usize,
    regrets: Vec<f64>,
    strategy: Vec<f64>,
    strategy_sum: Vec<f64>,
}

impl FlatCfr {
    pub fn new(num_actions: usize, num_hands: usize) -> Self {
        let total = num_actions * num_hands;
        FlatCfr {
            num_actions,
            num_hands,
            regrets: vec![0.0; total],
            strategy: vec![0.0; total],
            strategy_sum: vec![0.0; total],
        }
    }

    #[inline]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    #[inline]
    pub fn num_hands(&self) -> usize {
        self.num_hands
    }

    #[inline]
    fn row(&self, hand: usize) -> std::ops::Range<usize> {
        hand * self.num_actions..(hand + 1) * self.num_actions
    }

    // -----------------------------------------------------------------------
    // Strategy computation
    // -----------------------------------------------------------------------

    /// Recompute the current strategy of every hand from its positive regrets.
    /// Rows with no positive regret become uniform.
    pub fn regret_match(&mut self) {
        let na = self.num_actions;
        if na == 0 {
            return;
        }
        let uniform = 1.0 / na as f64;
        for (regrets, strategy) in self
            .regrets
            .chunks_exact(na)
            .zip(self.strategy.chunks_exact_mut(na))
        {
            let mut positive_sum = 0.0;
            for (s, &r) in strategy.iter_mut().zip(regrets) {
                *s = r.max(0.0);
                positive_sum += *s;
            }
            if positive_sum > 0.0 {
                for s in strategy.iter_mut() {
                    *s /= positive_sum;
                }
            } else {
                strategy.fill(uniform);
            }
        }
    }

    /// Current strategy row from the last [`regret_match`](Self::regret_match).
    #[inline]
    pub fn strategy(&self, hand: usize) -> &[f64] {
        &self.strategy[self.row(hand)]
    }

    #[inline]
    pub fn regrets(&self, hand: usize) -> &[f64] {
        &self.regrets[self.row(hand)]
    }

    /// Normalized strategy sum for one hand, uniform when nothing accumulated.
    pub fn average_strategy(&self, hand: usize) -> Vec<f64> {
        let sums = &self.strategy_sum[self.row(hand)];
        let total: f64 = sums.iter().sum();
        if total > 0.0 {
            sums.iter().map(|s| s / total).collect()
        } else {
            vec![1.0 / self.num_actions as f64; self.num_actions]
        }
    }

    /// Average strategy of every hand, `[hand][action]`.
    pub fn average_strategies(&self) -> Vec<Vec<f64>> {
        (0..self.num_hands).map(|h| self.average_strategy(h)).collect()
    }

    // -----------------------------------------------------------------------
    // Discounted update
    // -----------------------------------------------------------------------

    /// Fold one traversal's results into the accumulators.
    ///
    /// - `reach`: acting player's reach per hand
    /// - `node_utility`: strategy-weighted utility per hand
    /// - `action_utility`: `[action][hand]` utility of each child
    pub fn update(
        &mut self,
        weights: &DiscountWeights,
        reach: &[f64],
        node_utility: &[f64],
        action_utility: &[Vec<f64>],
    ) {
        let na = self.num_actions;
        debug_assert_eq!(reach.len(), self.num_hands);
        debug_assert_eq!(action_utility.len(), na);

        for hand in 0..self.num_hands {
            let base = hand * na;
            for (a, utility) in action_utility.iter().enumerate() {
                let i = base + a;
                self.strategy_sum[i] += reach[hand] * self.strategy[i] * weights.strategy;

                let regret = self.regrets[i] + utility[hand] - node_utility[hand];
                self.regrets[i] = if regret > 0.0 {
                    regret * weights.positive
                } else {
                    regret * weights.negative
                };
            }
        }
    }
}
