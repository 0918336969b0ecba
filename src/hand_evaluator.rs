//! Hand-strength oracle.
//!
//! The solver core only needs a total order over hole+board card sets, so it
//! talks to the [`HandEvaluator`] trait. Ranks follow the "lower is stronger"
//! convention: the best possible hand maps to the smallest number.

use std::cmp::Ordering;
use std::fmt;

use crate::cards::{Card, ALL_SUITS};
use crate::error::{SolverError, SolverResult};

/// Numeric hand rank. Lower is stronger.
pub type HandRank = u32;

/// Anything that can put a 5-7 card set on a total order.
pub trait HandEvaluator: Send + Sync {
    fn rank(&self, cards: &[Card]) -> HandRank;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        };
        write!(f, "{}", name)
    }
}

/// Best five-card hand found in a card set: its category plus the rank
/// values that break ties inside that category, most significant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandResult {
    pub category: HandCategory,
    pub kickers: Vec<u8>,
}

/// Strength of the best possible packed hand; ranks are measured down from it.
const MAX_STRENGTH: u32 = (HandCategory::RoyalFlush as u32) << 20 | 0xF_FFFF;

impl HandResult {
    /// Category in the top bits, then up to five 4-bit kicker values.
    pub fn strength(&self) -> u32 {
        let mut packed = (self.category as u32) << 20;
        for (i, &k) in self.kickers.iter().take(5).enumerate() {
            packed |= (k as u32) << (16 - 4 * i);
        }
        packed
    }

    pub fn rank(&self) -> HandRank {
        MAX_STRENGTH - self.strength()
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

// ---------------------------------------------------------------------------
// Bitmask evaluation
// ---------------------------------------------------------------------------

/// Bit `v` set for every rank value `v` present (2..=14).
fn rank_mask(cards: impl Iterator<Item = Card>) -> u16 {
    cards.fold(0u16, |mask, c| mask | 1 << c.value())
}

/// Highest straight in a rank mask, counting the ace low for the wheel.
fn straight_high(mask: u16) -> Option<u8> {
    let mask = if mask & (1 << 14) != 0 { mask | 1 << 1 } else { mask };
    (5..=14u8).rev().find(|&high| {
        let run = 0b1_1111u16 << (high - 4);
        mask & run == run
    })
}

/// The `n` highest rank values in `mask`, skipping `exclude`.
fn top_ranks(mask: u16, n: usize, exclude: &[u8]) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|v| mask & (1 << v) != 0 && !exclude.contains(v))
        .take(n)
        .collect()
}

fn evaluate_cards(cards: &[Card]) -> HandResult {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.value() as usize] += 1;
    }
    let all = rank_mask(cards.iter().copied());

    let flush_mask = ALL_SUITS.iter().find_map(|&suit| {
        let suited = cards.iter().filter(|c| c.suit == suit);
        if suited.clone().count() >= 5 {
            Some(rank_mask(suited.copied()))
        } else {
            None
        }
    });

    if let Some(fm) = flush_mask {
        if let Some(high) = straight_high(fm) {
            let category = if high == 14 {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return HandResult { category, kickers: vec![high] };
        }
    }

    let with_count = |n: u8| -> Vec<u8> {
        (2..=14u8).rev().filter(|&v| counts[v as usize] == n).collect()
    };
    let quads = with_count(4);
    let trips = with_count(3);
    let pairs = with_count(2);

    if let Some(&q) = quads.first() {
        let mut kickers = vec![q];
        kickers.extend(top_ranks(all, 1, &[q]));
        return HandResult { category: HandCategory::FourOfAKind, kickers };
    }

    if let Some(&t) = trips.first() {
        // Second trips or best pair fills the house.
        let fill = trips.get(1).into_iter().chain(pairs.first()).max().copied();
        if let Some(p) = fill {
            return HandResult { category: HandCategory::FullHouse, kickers: vec![t, p] };
        }
    }

    if let Some(fm) = flush_mask {
        return HandResult { category: HandCategory::Flush, kickers: top_ranks(fm, 5, &[]) };
    }

    if let Some(high) = straight_high(all) {
        return HandResult { category: HandCategory::Straight, kickers: vec![high] };
    }

    if let Some(&t) = trips.first() {
        let mut kickers = vec![t];
        kickers.extend(top_ranks(all, 2, &[t]));
        return HandResult { category: HandCategory::ThreeOfAKind, kickers };
    }

    if pairs.len() >= 2 {
        let (hi, lo) = (pairs[0], pairs[1]);
        let mut kickers = vec![hi, lo];
        kickers.extend(top_ranks(all, 1, &[hi, lo]));
        return HandResult { category: HandCategory::TwoPair, kickers };
    }

    if let Some(&p) = pairs.first() {
        let mut kickers = vec![p];
        kickers.extend(top_ranks(all, 3, &[p]));
        return HandResult { category: HandCategory::OnePair, kickers };
    }

    HandResult { category: HandCategory::HighCard, kickers: top_ranks(all, 5, &[]) }
}

/// Best five-card hand from hole cards plus board (5 to 7 cards total).
pub fn evaluate_hand(hole: &[Card], board: &[Card]) -> SolverResult<HandResult> {
    let total = hole.len() + board.len();
    if !(5..=7).contains(&total) {
        return Err(SolverError::InvalidValue(format!(
            "need 5 to 7 cards to evaluate, got {}",
            total
        )));
    }
    let cards: Vec<Card> = hole.iter().chain(board).copied().collect();
    Ok(evaluate_cards(&cards))
}

/// `Greater` when `hero` makes the stronger hand on `board`.
pub fn compare_hands(hero: &[Card], villain: &[Card], board: &[Card]) -> SolverResult<Ordering> {
    Ok(evaluate_hand(hero, board)?.cmp(&evaluate_hand(villain, board)?))
}

/// Default oracle: exact best-five-of-seven evaluation by rank bitmasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SevenCardEvaluator;

impl HandEvaluator for SevenCardEvaluator {
    fn rank(&self, cards: &[Card]) -> HandRank {
        evaluate_cards(cards).rank()
    }
}
