use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Serialize, Serializer};

use crate::error::{SolverError, SolverResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "shdc";
pub const NUM_CARDS: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> SolverResult<Rank> {
        match c.to_ascii_uppercase() {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(SolverError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        RANKS_STR.as_bytes()[self.offset()] as char
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position: Two = 0, Ace = 12.
    pub fn offset(self) -> usize {
        self as usize - 2
    }

    pub fn from_value(value: u8) -> Option<Rank> {
        ALL_RANKS.get(value.checked_sub(2)? as usize).copied()
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> SolverResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(SolverError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        SUITS_STR.as_bytes()[self as usize] as char
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// A single playing card. Ordered by rank, then suit, so any set of cards
/// has one canonical sorted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// All 52 cards in dense index order.
pub static FULL_DECK: Lazy<Vec<Card>> = Lazy::new(|| {
    ALL_RANKS
        .iter()
        .flat_map(|&r| ALL_SUITS.iter().map(move |&s| Card::new(r, s)))
        .collect()
});

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Dense index in `0..52`, used for per-card accumulators.
    #[inline]
    pub fn index(&self) -> usize {
        self.rank.offset() * 4 + self.suit as usize
    }

    pub fn from_index(index: usize) -> Option<Card> {
        FULL_DECK.get(index).copied()
    }

    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank.to_char(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Hand
// ---------------------------------------------------------------------------

/// Two distinct hole cards, stored highest card first so that equal hands
/// compare and hash equal regardless of how they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hand {
    high: Card,
    low: Card,
}

impl Hand {
    /// Callers must pass two different cards; use [`Hand::try_new`] for
    /// unchecked input.
    pub fn new(a: Card, b: Card) -> Hand {
        debug_assert_ne!(a, b, "a hand needs two distinct cards");
        if a > b {
            Hand { high: a, low: b }
        } else {
            Hand { high: b, low: a }
        }
    }

    pub fn try_new(a: Card, b: Card) -> SolverResult<Hand> {
        if a == b {
            return Err(SolverError::InvalidHandNotation(format!("{}{}", a, b)));
        }
        Ok(Hand::new(a, b))
    }

    #[inline]
    pub fn cards(&self) -> [Card; 2] {
        [self.high, self.low]
    }

    #[inline]
    pub fn high(&self) -> Card {
        self.high
    }

    #[inline]
    pub fn low(&self) -> Card {
        self.low
    }

    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.high == card || self.low == card
    }

    #[inline]
    pub fn overlaps(&self, other: &Hand) -> bool {
        self.contains(other.high) || self.contains(other.low)
    }

    pub fn overlaps_board(&self, board: &[Card]) -> bool {
        board.iter().any(|&c| self.contains(c))
    }

    /// "AKs", "AKo" or "AA".
    pub fn class_label(&self) -> String {
        let (r1, r2) = (self.high.rank.to_char(), self.low.rank.to_char());
        if self.high.rank == self.low.rank {
            format!("{}{}", r1, r2)
        } else if self.high.suit == self.low.suit {
            format!("{}{}s", r1, r2)
        } else {
            format!("{}{}o", r1, r2)
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high, self.low)
    }
}

impl Serialize for Hand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(exclude: Option<&[Card]>) -> Deck {
        let excluded: HashSet<Card> = exclude
            .map(|e| e.iter().copied().collect())
            .unwrap_or_default();
        let cards = FULL_DECK
            .iter()
            .copied()
            .filter(|c| !excluded.contains(c))
            .collect();
        Deck { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.cards.shuffle(rng);
        self
    }

    pub fn deal(&mut self, n: usize) -> SolverResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(SolverError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

pub fn parse_card(notation: &str) -> SolverResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(SolverError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0])?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

/// Parse a board such as "Ac7s5s", "Ac 7s 5s 3d" or "Ac,7s,5s".
///
/// The board must have 3 to 5 cards with no repeats.
pub fn parse_board(notation: &str) -> SolverResult<Vec<Card>> {
    let compact: String = notation
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let chars: Vec<char> = compact.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(SolverError::InvalidBoardNotation(notation.trim().to_string()));
    }
    let cards = chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()))
        .collect::<SolverResult<Vec<Card>>>()?;
    validate_board(&cards)?;
    Ok(cards)
}

pub fn validate_board(board: &[Card]) -> SolverResult<()> {
    if !(3..=5).contains(&board.len()) {
        return Err(SolverError::InvalidBoardSize(board.len()));
    }
    let mut seen = HashSet::with_capacity(board.len());
    for card in board {
        if !seen.insert(*card) {
            return Err(SolverError::DuplicateCard(card.to_string()));
        }
    }
    Ok(())
}

/// Parse an explicit two-card hand such as "AsKh".
pub fn parse_hand(notation: &str) -> SolverResult<Hand> {
    let notation = notation.trim();
    if notation.len() != 4 || !notation.is_ascii() {
        return Err(SolverError::InvalidHandNotation(notation.to_string()));
    }
    let a = parse_card(&notation[..2])?;
    let b = parse_card(&notation[2..])?;
    Hand::try_new(a, b)
}

pub fn format_board(board: &[Card]) -> String {
    board.iter().map(|c| c.to_string()).collect()
}
