use std::fmt;

use rayon::prelude::*;

use crate::blockers::CardRemoval;
use crate::cards::{Card, FULL_DECK};
use crate::error::{SolverError, SolverResult};
use crate::node::{indent, GameNode, Node, NodeState, Street};
use crate::traversal::Traversal;

/// The first `n` cards, in deck order, that are not on `board`.
pub fn possible_next_cards(board: &[Card], n: usize) -> SolverResult<Vec<Card>> {
    let remaining: Vec<Card> = FULL_DECK
        .iter()
        .copied()
        .filter(|c| !board.contains(c))
        .take(n)
        .collect();
    if remaining.len() < n {
        return Err(SolverError::NotEnoughDeck {
            requested: n,
            available: remaining.len(),
        });
    }
    Ok(remaining)
}

/// `w(hand, card)` table, laid out card-major.
#[derive(Debug, Clone)]
pub struct CardWeights {
    num_hands: usize,
    data: Vec<f64>,
}

impl CardWeights {
    #[inline]
    pub fn get(&self, card: usize, hand: usize) -> f64 {
        self.data[card * self.num_hands + hand]
    }

    /// Weights of one hand across every next card.
    pub fn hand_row(&self, hand: usize) -> Vec<f64> {
        self.data
            .chunks_exact(self.num_hands)
            .map(|card_row| card_row[hand])
            .collect()
    }
}

/// A public card is dealt; one decision subtree per possible card.
pub struct ChanceNode {
    pub state: NodeState,
    /// Street whose betting just closed.
    pub street: Street,
    next_cards: Vec<Card>,
    children: Vec<Node>,
}

impl ChanceNode {
    pub fn new(state: NodeState, street: Street) -> ChanceNode {
        ChanceNode {
            state,
            street,
            next_cards: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_child(&mut self, card: Card, child: Node) {
        self.next_cards.push(card);
        self.children.push(child);
    }

    pub fn next_cards(&self) -> &[Card] {
        &self.next_cards
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Per traverser hand, how likely each next card is given the opponent's
    /// reach.
    ///
    /// The opponent mass left once the card and both hole cards are removed
    /// is normalized over all cards. Opponent combos pairing the card with one
    /// of the hole cards are subtracted twice and not added back.
    pub fn card_weights(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> CardWeights {
        let traverser_range = traversal.traverser_range();
        let removal = CardRemoval::new(traversal.opponent_range(), opponent_reach);
        let num_hands = traverser_range.len();
        let mut data = vec![0.0; self.next_cards.len() * num_hands];

        for (h, combo) in traverser_range.iter().enumerate() {
            let hand = combo.hand;
            let same_hand = traversal.opponent_same_hand(&hand, opponent_reach);
            let base = removal.unblocked_raw(hand) + same_hand;

            let mut weight_sum = 0.0;
            for (c, &card) in self.next_cards.iter().enumerate() {
                if hand.contains(card) {
                    continue;
                }
                let w = base - removal.blocked(card);
                data[c * num_hands + h] = w;
                weight_sum += w;
            }

            if weight_sum > 0.0 {
                for c in 0..self.next_cards.len() {
                    data[c * num_hands + h] /= weight_sum;
                }
            }
        }

        CardWeights { num_hands, data }
    }

    /// Opponent reach with every combo holding `card` zeroed.
    fn opponent_reach_after(
        traversal: &Traversal<'_>,
        card: Card,
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        traversal
            .opponent_range()
            .iter()
            .zip(opponent_reach)
            .map(|(combo, &p)| if combo.hand.contains(card) { 0.0 } else { p })
            .collect()
    }

    fn combine(&self, results: Vec<Vec<f64>>, num_hands: usize) -> Vec<f64> {
        let mut utility = vec![0.0; num_hands];
        for child_utility in results {
            for (u, x) in utility.iter_mut().zip(child_utility) {
                *u += x;
            }
        }
        let divisor = self.street.chance_divisor();
        for u in utility.iter_mut() {
            *u /= divisor;
        }
        utility
    }
}

impl GameNode for ChanceNode {
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        let weights = self.card_weights(traversal, opponent_reach);
        let traverser_range = traversal.traverser_range();
        let num_hands = traverser_reach.len();

        let results: Vec<Vec<f64>> = self
            .children
            .par_iter_mut()
            .zip(self.next_cards.par_iter())
            .enumerate()
            .map(|(c, (child, &card))| {
                let next_traverser: Vec<f64> = traverser_range
                    .iter()
                    .zip(traverser_reach)
                    .enumerate()
                    .map(|(h, (combo, &p))| {
                        if combo.hand.contains(card) {
                            0.0
                        } else {
                            p * weights.get(c, h)
                        }
                    })
                    .collect();
                let next_opponent = Self::opponent_reach_after(traversal, card, opponent_reach);
                child.cfr_traversal(traversal, &next_traverser, &next_opponent)
            })
            .collect();

        self.combine(results, num_hands)
    }

    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        let results: Vec<Vec<f64>> = self
            .children
            .par_iter()
            .zip(self.next_cards.par_iter())
            .map(|(child, &card)| {
                let next_opponent = Self::opponent_reach_after(traversal, card, opponent_reach);
                child.best_response(traversal, &next_opponent)
            })
            .collect();

        self.combine(results, traversal.traverser_range().len())
    }

    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
        indent(level, out)?;
        writeln!(
            out,
            "Chance after {} | pot {:.1} | stacks {:.1}/{:.1} | {} cards",
            self.street,
            self.state.pot,
            self.state.stacks[0],
            self.state.stacks[1],
            self.next_cards.len()
        )?;
        if let (Some(card), Some(child)) = (self.next_cards.first(), self.children.first()) {
            indent(level + 1, out)?;
            writeln!(out, "[{}] (first of {})", card, self.next_cards.len())?;
            child.describe(level + 2, out)?;
        }
        Ok(())
    }
}
