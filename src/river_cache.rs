//! Pre-ranked hand lists per completed board.
//!
//! Every showdown on a given five-card board ranks the same hands, so the
//! ranking is done once when the tree is built. Entries are addressed by a
//! dense id that showdown nodes keep.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cards::Card;
use crate::error::{SolverError, SolverResult};
use crate::hand_evaluator::{HandEvaluator, HandRank, SevenCardEvaluator};
use crate::node::Player;
use crate::ranges::Range;

pub type CacheId = usize;

/// A range hand ranked on one board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandRankPair {
    pub hand: crate::cards::Hand,
    /// Position in the owning player's range.
    pub index: usize,
    pub rank: HandRank,
}

/// Both players' ranked hands for one board. Hands sharing a card with the
/// board are left out.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub board: [Card; 5],
    ranked: [Vec<HandRankPair>; 2],
}

impl CacheEntry {
    /// Sorted by descending rank: weakest hand first, strongest last.
    pub fn ranked(&self, player: Player) -> &[HandRankPair] {
        &self.ranked[player.index()]
    }
}

pub struct RiverEvaluationCache {
    ranges: [Range; 2],
    evaluator: Box<dyn HandEvaluator>,
    ids: HashMap<[Card; 5], CacheId>,
    entries: Vec<CacheEntry>,
}

impl RiverEvaluationCache {
    pub fn new(oop: Range, ip: Range) -> RiverEvaluationCache {
        RiverEvaluationCache::with_evaluator(oop, ip, Box::new(SevenCardEvaluator))
    }

    pub fn with_evaluator(
        oop: Range,
        ip: Range,
        evaluator: Box<dyn HandEvaluator>,
    ) -> RiverEvaluationCache {
        RiverEvaluationCache {
            ranges: [oop, ip],
            evaluator,
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Sorted copy of a five-card board; equal sets give equal keys.
    pub fn canonical_board(board: &[Card]) -> SolverResult<[Card; 5]> {
        let mut key: [Card; 5] = board
            .try_into()
            .map_err(|_| SolverError::InvalidBoardSize(board.len()))?;
        key.sort_unstable();
        if let Some(w) = key.windows(2).find(|w| w[0] == w[1]) {
            return Err(SolverError::DuplicateCard(w[0].to_string()));
        }
        Ok(key)
    }

    /// Id for `board`, ranking both ranges on it the first time it is seen.
    pub fn insert(&mut self, board: &[Card]) -> SolverResult<CacheId> {
        let key = Self::canonical_board(board)?;
        if let Some(&id) = self.ids.get(&key) {
            return Ok(id);
        }

        let ranked = [
            self.rank_range(Player::OOP, &key),
            self.rank_range(Player::IP, &key),
        ];
        let id = self.entries.len();
        self.entries.push(CacheEntry { board: key, ranked });
        self.ids.insert(key, id);
        log::debug!("river cache: entry {} for board {:?}", id, key);
        Ok(id)
    }

    fn rank_range(&self, player: Player, board: &[Card; 5]) -> Vec<HandRankPair> {
        let evaluator = self.evaluator.as_ref();
        let mut ranked: Vec<HandRankPair> = self.ranges[player.index()]
            .combos()
            .par_iter()
            .enumerate()
            .filter(|(_, combo)| !combo.hand.overlaps_board(board))
            .map(|(index, combo)| {
                let mut cards = [board[0]; 7];
                cards[..5].copy_from_slice(board);
                cards[5] = combo.hand.high();
                cards[6] = combo.hand.low();
                HandRankPair {
                    hand: combo.hand,
                    index,
                    rank: evaluator.rank(&cards),
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.rank.cmp(&a.rank));
        ranked
    }

    pub fn get(&self, id: CacheId) -> &CacheEntry {
        &self.entries[id]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
