//! Weighted hand ranges.
//!
//! A [`Range`] is an ordered list of [`Combo`]s. The position of a combo in
//! that list is its hand index: every per-hand vector in the solver (reach
//! probabilities, utilities, strategy rows) is laid out in this order.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::cards::{parse_hand, Card, Hand, Rank, ALL_SUITS, RANKS_STR};
use crate::error::{SolverError, SolverResult};

/// A concrete hand with its prior weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Combo {
    pub hand: Hand,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    combos: Vec<Combo>,
}

impl Range {
    /// Build from combos, keeping first-seen order and the last weight given
    /// to a repeated hand.
    pub fn from_combos(combos: impl IntoIterator<Item = Combo>) -> Range {
        let mut out: Vec<Combo> = Vec::new();
        let mut seen: HashMap<Hand, usize> = HashMap::new();
        for combo in combos {
            match seen.get(&combo.hand) {
                Some(&i) => out[i].weight = combo.weight,
                None => {
                    seen.insert(combo.hand, out.len());
                    out.push(combo);
                }
            }
        }
        Range { combos: out }
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combo> {
        self.combos.iter()
    }

    pub fn hand(&self, index: usize) -> Hand {
        self.combos[index].hand
    }

    /// Prior weights in hand-index order; the initial reach vector.
    pub fn weights(&self) -> Vec<f64> {
        self.combos.iter().map(|c| c.weight).collect()
    }

    /// Hand to hand-index lookup.
    pub fn index_map(&self) -> HashMap<Hand, usize> {
        self.combos
            .iter()
            .enumerate()
            .map(|(i, c)| (c.hand, i))
            .collect()
    }

    /// Drop every combo that shares a card with `board`.
    pub fn remove_conflicts(&self, board: &[Card]) -> Range {
        Range {
            combos: self
                .combos
                .iter()
                .filter(|c| !c.hand.overlaps_board(board))
                .copied()
                .collect(),
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.combos.iter().map(|c| c.weight).sum()
    }
}

impl FromStr for Range {
    type Err = SolverError;

    fn from_str(s: &str) -> SolverResult<Range> {
        parse_range(s)
    }
}

impl<'a> IntoIterator for &'a Range {
    type Item = &'a Combo;
    type IntoIter = std::slice::Iter<'a, Combo>;

    fn into_iter(self) -> Self::IntoIter {
        self.combos.iter()
    }
}

// ---------------------------------------------------------------------------
// Notation parsing
// ---------------------------------------------------------------------------

/// Parse range notation such as `"KQs, /50.0/QJs, KK+, /25.0/55, 87s"`.
///
/// A `/pct/` marker sets the weight for every following token until the next
/// marker; tokens before the first marker get weight 1.0.
pub fn parse_range(notation: &str) -> SolverResult<Range> {
    let mut weight = 1.0;
    let mut combos = Vec::new();

    for raw in notation.split(',') {
        let mut token = raw.trim();
        if let Some(rest) = token.strip_prefix('/') {
            let end = rest
                .find('/')
                .ok_or_else(|| SolverError::InvalidPercentage(token.to_string()))?;
            weight = parse_percentage(&rest[..end])?;
            token = rest[end + 1..].trim();
        }
        if token.is_empty() {
            continue;
        }
        for hand in expand_token(token)? {
            combos.push(Combo { hand, weight });
        }
    }

    Ok(Range::from_combos(combos))
}

fn parse_percentage(text: &str) -> SolverResult<f64> {
    let pct: f64 = text
        .trim()
        .parse()
        .map_err(|_| SolverError::InvalidPercentage(text.to_string()))?;
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(SolverError::InvalidPercentage(text.to_string()));
    }
    Ok(pct / 100.0)
}

/// Expand one token into concrete hands.
fn expand_token(token: &str) -> SolverResult<Vec<Hand>> {
    let invalid = || SolverError::InvalidHandNotation(token.to_string());
    if !token.is_ascii() {
        return Err(invalid());
    }

    // Explicit combo: "AsKh"
    if token.len() == 4 && token.chars().nth(1).is_some_and(|c| c.is_ascii_lowercase()) {
        return Ok(vec![parse_hand(token)?]);
    }

    let classes = if let Some(base) = token.strip_suffix('+') {
        expand_plus(base).ok_or_else(invalid)?
    } else if token.contains('-') {
        expand_dash(token).ok_or_else(invalid)?
    } else {
        vec![HandClass::parse(token).ok_or_else(invalid)?]
    };

    Ok(classes.iter().flat_map(HandClass::hands).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suitedness {
    Suited,
    Offsuit,
    Any,
}

/// A hand class such as "AA", "AKs", "AKo" or "AK".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HandClass {
    high: Rank,
    low: Rank,
    kind: Suitedness,
}

impl HandClass {
    fn parse(text: &str) -> Option<HandClass> {
        let chars: Vec<char> = text.chars().collect();
        if !(2..=3).contains(&chars.len()) {
            return None;
        }
        let a = Rank::from_char(chars[0]).ok()?;
        let b = Rank::from_char(chars[1]).ok()?;
        let kind = match chars.get(2).map(|c| c.to_ascii_lowercase()) {
            None => Suitedness::Any,
            Some('s') => Suitedness::Suited,
            Some('o') => Suitedness::Offsuit,
            Some(_) => return None,
        };
        if a == b && kind != Suitedness::Any {
            return None;
        }
        Some(HandClass { high: a.max(b), low: a.min(b), kind })
    }

    fn is_pair(&self) -> bool {
        self.high == self.low
    }

    fn with_low(&self, low: Rank) -> HandClass {
        HandClass { low, ..*self }
    }

    fn hands(&self) -> Vec<Hand> {
        let mut hands = Vec::new();
        for (i, &s1) in ALL_SUITS.iter().enumerate() {
            for (j, &s2) in ALL_SUITS.iter().enumerate() {
                let keep = if self.is_pair() {
                    i < j
                } else {
                    match self.kind {
                        Suitedness::Suited => s1 == s2,
                        Suitedness::Offsuit => s1 != s2,
                        Suitedness::Any => true,
                    }
                };
                if keep {
                    hands.push(Hand::new(Card::new(self.high, s1), Card::new(self.low, s2)));
                }
            }
        }
        hands
    }
}

fn ranks_between(lo: Rank, hi: Rank) -> impl Iterator<Item = Rank> {
    (lo.value()..=hi.value()).filter_map(Rank::from_value)
}

/// "77+" is 77 through AA; "A8s+" raises the kicker up to one below the top card.
fn expand_plus(base: &str) -> Option<Vec<HandClass>> {
    let class = HandClass::parse(base)?;
    if class.is_pair() {
        return Some(
            ranks_between(class.high, Rank::Ace)
                .map(|r| HandClass { high: r, low: r, kind: Suitedness::Any })
                .collect(),
        );
    }
    let top = Rank::from_value(class.high.value() - 1)?;
    Some(ranks_between(class.low, top).map(|r| class.with_low(r)).collect())
}

/// "77-TT" for pairs, "KTs-KQs" for a fixed top card.
fn expand_dash(token: &str) -> Option<Vec<HandClass>> {
    let (start, end) = token.split_once('-')?;
    let start = HandClass::parse(start.trim())?;
    let end = HandClass::parse(end.trim())?;

    if start.is_pair() && end.is_pair() {
        let (lo, hi) = (start.high.min(end.high), start.high.max(end.high));
        return Some(
            ranks_between(lo, hi)
                .map(|r| HandClass { high: r, low: r, kind: Suitedness::Any })
                .collect(),
        );
    }

    if start.high == end.high && start.kind == end.kind && !start.is_pair() && !end.is_pair() {
        let (lo, hi) = (start.low.min(end.low), start.low.max(end.low));
        return Some(ranks_between(lo, hi).map(|r| start.with_low(r)).collect());
    }

    None
}

/// Distinct hand-class labels ("AKs", "QQ", ...) in a range, highest cards first.
pub fn class_labels(range: &Range) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for combo in range {
        let label = combo.hand.class_label();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels.sort_by_key(|l| {
        let key: Vec<usize> = l.chars().take(2).filter_map(|c| RANKS_STR.find(c)).collect();
        std::cmp::Reverse(key)
    });
    labels
}
