use std::fmt;

use itertools::Itertools;
use rayon::prelude::*;

use crate::cards::{Card, FULL_DECK};
use crate::error::SolverResult;
use crate::node::{indent, GameNode, NodeState, Street};
use crate::river_cache::{CacheId, RiverEvaluationCache};
use crate::showdown_node::accumulate_showdown;
use crate::traversal::Traversal;

/// Every completion of `board` to five cards: unordered pairs after the
/// flop, single cards after the turn, the board itself on the river.
pub fn possible_runouts(board: &[Card]) -> Vec<Vec<Card>> {
    let remaining: Vec<Card> = FULL_DECK
        .iter()
        .copied()
        .filter(|c| !board.contains(c))
        .collect();
    let missing = 5usize.saturating_sub(board.len());
    remaining
        .into_iter()
        .combinations(missing)
        .map(|extra| board.iter().copied().chain(extra).collect())
        .collect()
}

/// Both players are all in before the river: the pot goes to a showdown
/// averaged over every runout.
pub struct AllInShowdownNode {
    pub state: NodeState,
    pub street: Street,
    pub board: Vec<Card>,
    runouts: Vec<CacheId>,
}

impl AllInShowdownNode {
    /// Rank every runout of `board` into `cache`.
    pub fn new(
        state: NodeState,
        street: Street,
        board: Vec<Card>,
        cache: &mut RiverEvaluationCache,
    ) -> SolverResult<AllInShowdownNode> {
        let mut runouts = possible_runouts(&board)
            .iter()
            .map(|full| cache.insert(full))
            .collect::<SolverResult<Vec<CacheId>>>()?;
        runouts.sort_unstable();
        runouts.dedup();
        Ok(AllInShowdownNode {
            state,
            street,
            board,
            runouts,
        })
    }

    pub fn runouts(&self) -> &[CacheId] {
        &self.runouts
    }

    pub fn win_utility(&self) -> f64 {
        self.state.pot / 2.0
    }

    pub fn showdown_utility(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        let num_hands = traversal.traverser_range().len();
        let win = self.win_utility();
        let mut utility = self
            .runouts
            .par_iter()
            .fold(
                || vec![0.0; num_hands],
                |mut acc, &id| {
                    accumulate_showdown(traversal, traversal.cache().get(id), opponent_reach, win, &mut acc);
                    acc
                },
            )
            .reduce(
                || vec![0.0; num_hands],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );
        let divisor = self.street.runout_divisor();
        for u in utility.iter_mut() {
            *u /= divisor;
        }
        utility
    }
}

impl GameNode for AllInShowdownNode {
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        _traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        self.showdown_utility(traversal, opponent_reach)
    }

    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        self.showdown_utility(traversal, opponent_reach)
    }

    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
        indent(level, out)?;
        writeln!(
            out,
            "All-in showdown on the {} | pot {:.1} | {} runouts",
            self.street,
            self.state.pot,
            self.runouts.len()
        )
    }
}
