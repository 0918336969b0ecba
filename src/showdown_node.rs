//! River showdown with the two-pointer equity pass.
//!
//! Both ranked lists run weakest to strongest. Walking them together, every
//! opponent hand strictly weaker than the current traverser hand has already
//! been folded into a running sum, so each traverser hand's winning mass is
//! that sum minus the combos sharing one of its cards. A second walk from the
//! strong end does the same for losing mass. Ties land in neither sum.

use std::fmt;

use crate::blockers::CardRemoval;
use crate::cards::Card;
use crate::node::{indent, GameNode, NodeState, Player};
use crate::river_cache::{CacheEntry, CacheId};
use crate::traversal::Traversal;

/// Add the traverser's showdown utility on one cached board into `utility`.
pub(crate) fn accumulate_showdown(
    traversal: &Traversal<'_>,
    entry: &CacheEntry,
    opponent_reach: &[f64],
    win_utility: f64,
    utility: &mut [f64],
) {
    let ours = entry.ranked(traversal.traverser);
    let theirs = entry.ranked(traversal.traverser.opponent());

    let mut removal = CardRemoval::empty();
    let mut j = 0;
    for hand in ours {
        while j < theirs.len() && theirs[j].rank > hand.rank {
            removal.add(theirs[j].hand, opponent_reach[theirs[j].index]);
            j += 1;
        }
        utility[hand.index] += removal.unblocked_raw(hand.hand) * win_utility;
    }

    let mut removal = CardRemoval::empty();
    let mut j = theirs.len();
    for hand in ours.iter().rev() {
        while j > 0 && theirs[j - 1].rank < hand.rank {
            j -= 1;
            removal.add(theirs[j].hand, opponent_reach[theirs[j].index]);
        }
        utility[hand.index] -= removal.unblocked_raw(hand.hand) * win_utility;
    }
}

/// All-pairs showdown on one cached board, for checking the linear pass.
pub fn showdown_utility_naive(
    traversal: &Traversal<'_>,
    entry: &CacheEntry,
    opponent_reach: &[f64],
    win_utility: f64,
) -> Vec<f64> {
    let mut utility = vec![0.0; traversal.traverser_range().len()];
    let theirs = entry.ranked(traversal.traverser.opponent());
    for hand in entry.ranked(traversal.traverser) {
        for other in theirs {
            if other.hand.overlaps(&hand.hand) {
                continue;
            }
            let p = opponent_reach[other.index];
            if other.rank > hand.rank {
                utility[hand.index] += p * win_utility;
            } else if other.rank < hand.rank {
                utility[hand.index] -= p * win_utility;
            }
        }
    }
    utility
}

/// Betting closed on the river; best hand wins half the pot from the other.
pub struct ShowdownNode {
    pub state: NodeState,
    pub last_to_act: Player,
    pub board: Vec<Card>,
    pub cache_id: CacheId,
}

impl ShowdownNode {
    pub fn new(state: NodeState, last_to_act: Player, board: Vec<Card>, cache_id: CacheId) -> Self {
        ShowdownNode {
            state,
            last_to_act,
            board,
            cache_id,
        }
    }

    pub fn win_utility(&self) -> f64 {
        self.state.pot / 2.0
    }

    pub fn showdown_utility(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        let mut utility = vec![0.0; traversal.traverser_range().len()];
        let entry = traversal.cache().get(self.cache_id);
        accumulate_showdown(traversal, entry, opponent_reach, self.win_utility(), &mut utility);
        utility
    }
}

impl GameNode for ShowdownNode {
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
            "Showdown | pot {:.1} | last to act {} | board {}",
            self.state.pot,
            self.last_to_act,
            crate::cards::format_board(&self.board)
        )
    }
}
