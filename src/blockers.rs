//! Card-removal bookkeeping shared by the fold, chance and exploitability
//! computations.

use crate::cards::{Card, Hand, NUM_CARDS};
use crate::ranges::Range;

/// Opponent reach mass, in total and split by the cards it contains.
///
/// `blocked(a)` is the mass of opponent combos holding card `a`; subtracting
/// the two cards of a hand double-counts the combo identical to that hand,
/// which callers add back with the same-hand term.
#[derive(Debug, Clone)]
pub struct CardRemoval {
    total: f64,
    per_card: [f64; NUM_CARDS],
}

impl CardRemoval {
    /// Accumulate `reach` (hand-index aligned with `range`).
    pub fn new(range: &Range, reach: &[f64]) -> CardRemoval {
        debug_assert_eq!(range.len(), reach.len());
        let mut removal = CardRemoval {
            total: 0.0,
            per_card: [0.0; NUM_CARDS],
        };
        for (combo, &p) in range.iter().zip(reach) {
            removal.add(combo.hand, p);
        }
        removal
    }

    pub fn empty() -> CardRemoval {
        CardRemoval {
            total: 0.0,
            per_card: [0.0; NUM_CARDS],
        }
    }

    #[inline]
    pub fn add(&mut self, hand: Hand, reach: f64) {
        self.total += reach;
        self.per_card[hand.high().index()] += reach;
        self.per_card[hand.low().index()] += reach;
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn blocked(&self, card: Card) -> f64 {
        self.per_card[card.index()]
    }

    /// Mass not sharing a card with `hand`, before the same-hand correction.
    #[inline]
    pub fn unblocked_raw(&self, hand: Hand) -> f64 {
        self.total - self.blocked(hand.high()) - self.blocked(hand.low())
    }
}

/// Per hand in `range`, the prior weight of `opponent` combos that share no card with it.
pub fn unblocked_combos(range: &Range, opponent: &Range) -> Vec<f64> {
    let removal = CardRemoval::new(opponent, &opponent.weights());
    let opponent_index = opponent.index_map();
    range
        .iter()
        .map(|combo| {
            let same = opponent_index
                .get(&combo.hand)
                .map_or(0.0, |&j| opponent.combos()[j].weight);
            removal.unblocked_raw(combo.hand) + same
        })
        .collect()
}

/// Each hand's prior weight times its unblocked opponent mass, normalized to
/// sum to one across `range`.
pub fn relative_probabilities(range: &Range, opponent: &Range) -> Vec<f64> {
    let unblocked = unblocked_combos(range, opponent);
    let raw: Vec<f64> = range
        .iter()
        .zip(&unblocked)
        .map(|(combo, &u)| combo.weight * u)
        .collect();
    let total: f64 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|r| r / total).collect()
    } else {
        vec![0.0; raw.len()]
    }
}
