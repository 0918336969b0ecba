use std::fmt;

use crate::blockers::CardRemoval;
use crate::cards::Card;
use crate::node::{indent, GameNode, NodeState, Player};
use crate::traversal::Traversal;

/// Someone folded; `winner` takes the pot.
pub struct TerminalNode {
    pub state: NodeState,
    pub winner: Player,
    pub board: Vec<Card>,
}

impl TerminalNode {
    pub fn new(state: NodeState, winner: Player, board: Vec<Card>) -> TerminalNode {
        TerminalNode {
            state,
            winner,
            board,
        }
    }

    /// Both players put in the same amount, so the winner nets half the pot.
    pub fn win_utility(&self) -> f64 {
        self.state.pot / 2.0
    }

    /// Utility for the current traverser: +win if they are owed the pot.
    fn signed_utility(&self, traversal: &Traversal<'_>) -> f64 {
        if traversal.traverser == self.winner {
            self.win_utility()
        } else {
            -self.win_utility()
        }
    }

    /// Linear fold equity: unblocked opponent mass times the signed payoff.
    pub fn fold_utility(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        let utility = self.signed_utility(traversal);
        let removal = CardRemoval::new(traversal.opponent_range(), opponent_reach);

        traversal
            .traverser_range()
            .iter()
            .map(|combo| {
                if combo.hand.overlaps_board(&self.board) {
                    return 0.0;
                }
                let same_hand = traversal.opponent_same_hand(&combo.hand, opponent_reach);
                (removal.unblocked_raw(combo.hand) + same_hand) * utility
            })
            .collect()
    }

    /// All-pairs fold equity, for checking [`fold_utility`](Self::fold_utility).
    pub fn fold_utility_naive(
        &self,
        traversal: &Traversal<'_>,
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        let utility = self.signed_utility(traversal);
        let opponent = traversal.opponent_range();

        traversal
            .traverser_range()
            .iter()
            .map(|combo| {
                if combo.hand.overlaps_board(&self.board) {
                    return 0.0;
                }
                let mass: f64 = opponent
                    .iter()
                    .zip(opponent_reach)
                    .filter(|(o, _)| !o.hand.overlaps(&combo.hand))
                    .map(|(_, &p)| p)
                    .sum();
                mass * utility
            })
            .collect()
    }
}

impl GameNode for TerminalNode {
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        _traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        self.fold_utility(traversal, opponent_reach)
    }

    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        self.fold_utility(traversal, opponent_reach)
    }

    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
        indent(level, out)?;
        writeln!(
            out,
            "Fold | {} wins {:.1} | pot {:.1}",
            self.winner,
            self.win_utility(),
            self.state.pot
        )
    }
}
