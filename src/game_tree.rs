//! Game tree construction from a betting abstraction.
//!
//! The root is an OOP decision on the starting board. Each decision expands
//! into check/call (closing the street into a showdown, an all-in runout or a
//! chance node), fold when facing a bet, and one child per configured bet size.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::allin_node::AllInShowdownNode;
use crate::cards::{validate_board, Card};
use crate::chance_node::{possible_next_cards, ChanceNode};
use crate::decision_node::DecisionNode;
use crate::error::{SolverError, SolverResult};
use crate::hand_evaluator::{HandEvaluator, SevenCardEvaluator};
use crate::node::{Action, GameNode, Node, NodeState, Player, Street};
use crate::ranges::Range;
use crate::river_cache::RiverEvaluationCache;
use crate::showdown_node::ShowdownNode;
use crate::terminal_node::TerminalNode;

// ---------------------------------------------------------------------------
// Betting abstraction
// ---------------------------------------------------------------------------

/// Bet sizes per player, indexed by the number of bets already made on the
/// street. Sizes are fractions of the pot after calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetSizes {
    pub oop: Vec<Vec<f64>>,
    pub ip: Vec<Vec<f64>>,
}

impl Default for BetSizes {
    fn default() -> Self {
        BetSizes {
            oop: vec![vec![0.75]],
            ip: vec![vec![0.75]],
        }
    }
}

impl BetSizes {
    pub fn uniform(sizes: Vec<f64>) -> BetSizes {
        BetSizes {
            oop: vec![sizes.clone()],
            ip: vec![sizes],
        }
    }

    fn for_player(&self, player: Player) -> &[Vec<f64>] {
        match player {
            Player::OOP => &self.oop,
            Player::IP => &self.ip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BettingConfig {
    /// When the pot times this is at least the larger stack, the only bet is all in.
    pub all_in_cutoff: f64,
    /// Fraction used when no menu is configured for a bet number.
    pub default_bet: f64,
    pub flop: BetSizes,
    pub turn: BetSizes,
    pub river: BetSizes,
}

impl Default for BettingConfig {
    fn default() -> Self {
        BettingConfig {
            all_in_cutoff: 1.0,
            default_bet: 1.0,
            flop: BetSizes::default(),
            turn: BetSizes::default(),
            river: BetSizes::default(),
        }
    }
}

impl BettingConfig {
    /// The same bet menu on every street for both players.
    pub fn uniform(sizes: Vec<f64>) -> BettingConfig {
        BettingConfig {
            flop: BetSizes::uniform(sizes.clone()),
            turn: BetSizes::uniform(sizes.clone()),
            river: BetSizes::uniform(sizes),
            ..BettingConfig::default()
        }
    }

    fn street(&self, street: Street) -> &BetSizes {
        match street {
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }

    /// Bet menu for `player` after `bet_number` bets on `street`.
    pub fn bets_for(&self, street: Street, player: Player, bet_number: usize) -> SolverResult<&[f64]> {
        match self.street(street).for_player(player).get(bet_number) {
            Some(sizes) if sizes.is_empty() => Err(SolverError::EmptyBetMenu {
                street,
                player,
                bet_number,
            }),
            Some(sizes) => Ok(sizes),
            None => Ok(std::slice::from_ref(&self.default_bet)),
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        let positive = |size: f64, context: String| {
            if size.is_finite() && size > 0.0 {
                Ok(())
            } else {
                Err(SolverError::InvalidBetSize { size, context })
            }
        };
        positive(self.all_in_cutoff, "all-in cutoff".to_string())?;
        positive(self.default_bet, "default bet".to_string())?;
        for street in [Street::Flop, Street::Turn, Street::River] {
            for player in [Player::OOP, Player::IP] {
                for (n, sizes) in self.street(street).for_player(player).iter().enumerate() {
                    for &size in sizes {
                        positive(size, format!("{} {} menu {}", street, player, n))?;
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

pub struct TreeParams<'a> {
    pub starting_pot: f64,
    pub starting_stack: f64,
    pub board: &'a [Card],
    pub betting: &'a BettingConfig,
    pub oop_range: &'a Range,
    pub ip_range: &'a Range,
}

/// Node counts by variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub decision: usize,
    pub chance: usize,
    pub terminal: usize,
    pub showdown: usize,
    pub all_in: usize,
    pub cache_entries: usize,
}

impl TreeStats {
    fn visit(&mut self, node: &Node) {
        match node {
            Node::Decision(n) => {
                self.decision += 1;
                n.children().iter().for_each(|c| self.visit(c));
            }
            Node::Chance(n) => {
                self.chance += 1;
                n.children().iter().for_each(|c| self.visit(c));
            }
            Node::Terminal(_) => self.terminal += 1,
            Node::Showdown(_) => self.showdown += 1,
            Node::AllInShowdown(_) => self.all_in += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.decision + self.chance + self.terminal + self.showdown + self.all_in
    }
}

pub struct GameTree {
    pub root: Node,
    pub cache: RiverEvaluationCache,
    /// OOP then IP, with board conflicts removed.
    pub ranges: [Range; 2],
    pub board: Vec<Card>,
    pub starting_pot: f64,
    pub starting_stack: f64,
}

impl GameTree {
    pub fn build(params: &TreeParams<'_>) -> SolverResult<GameTree> {
        GameTree::build_with_evaluator(params, Box::new(SevenCardEvaluator))
    }

    pub fn build_with_evaluator(
        params: &TreeParams<'_>,
        evaluator: Box<dyn HandEvaluator>,
    ) -> SolverResult<GameTree> {
        for (name, value) in [("pot", params.starting_pot), ("stack", params.starting_stack)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SolverError::NonPositiveAmount { name, value });
            }
        }
        validate_board(params.board)?;
        params.betting.validate()?;

        let oop = params.oop_range.remove_conflicts(params.board);
        let ip = params.ip_range.remove_conflicts(params.board);
        if oop.is_empty() {
            return Err(SolverError::EmptyRange(Player::OOP));
        }
        if ip.is_empty() {
            return Err(SolverError::EmptyRange(Player::IP));
        }

        let mut cache = RiverEvaluationCache::with_evaluator(oop.clone(), ip.clone(), evaluator);
        let mut root = DecisionNode::new(
            Player::OOP,
            NodeState::new(params.starting_pot, [params.starting_stack; 2]),
        );
        TreeBuilder {
            betting: params.betting,
            cache: &mut cache,
        }
        .add_successors(&mut root, 0, params.board)?;

        let ranges = [oop, ip];
        let mut root = Node::Decision(root);
        allocate(&mut root, &ranges);

        let tree = GameTree {
            root,
            cache,
            ranges,
            board: params.board.to_vec(),
            starting_pot: params.starting_pot,
            starting_stack: params.starting_stack,
        };
        let stats = tree.stats();
        log::info!(
            "built tree: {} nodes ({} decision, {} chance, {} fold, {} showdown, {} all-in), {} river boards",
            stats.total(),
            stats.decision,
            stats.chance,
            stats.terminal,
            stats.showdown,
            stats.all_in,
            stats.cache_entries
        );
        Ok(tree)
    }

    pub fn street(&self) -> Street {
        // The board was validated on construction.
        Street::from_board_len(self.board.len()).unwrap_or(Street::River)
    }

    pub fn range(&self, player: Player) -> &Range {
        &self.ranges[player.index()]
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            cache_entries: self.cache.len(),
            ..TreeStats::default()
        };
        stats.visit(&self.root);
        stats
    }

    /// Indented outline of the whole tree.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.root.describe(0, &mut out);
        out
    }

    pub fn root_decision(&self) -> Option<&DecisionNode> {
        self.root.as_decision()
    }

    /// Follow action indices from the root through decision nodes.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let mut node = &self.root;
        for &a in path {
            node = node.as_decision()?.child(a)?;
        }
        Some(node)
    }
}

/// Size every decision node's table to its acting player's range.
fn allocate(node: &mut Node, ranges: &[Range; 2]) {
    match node {
        Node::Decision(n) => {
            n.allocate(ranges[n.player.index()].len());
            n.children_mut().iter_mut().for_each(|c| allocate(c, ranges));
        }
        Node::Chance(n) => n.children_mut().iter_mut().for_each(|c| allocate(c, ranges)),
        _ => {}
    }
}

struct TreeBuilder<'a> {
    betting: &'a BettingConfig,
    cache: &'a mut RiverEvaluationCache,
}

impl TreeBuilder<'_> {
    fn add_successors(
        &mut self,
        node: &mut DecisionNode,
        bet_number: usize,
        board: &[Card],
    ) -> SolverResult<()> {
        let street = Street::from_board_len(board.len())?;

        if node.player == Player::IP || bet_number > 0 {
            self.add_call_and_fold(node, bet_number, street, board)?;
        } else {
            let mut check = DecisionNode::new(Player::IP, node.state);
            self.add_successors(&mut check, 0, board)?;
            node.push_child(Action::Check, Node::Decision(check));
        }

        if node.state.stacks.iter().all(|&s| s > 0.0) {
            self.add_bets(node, bet_number, street, board)?;
        }
        Ok(())
    }

    fn add_call_and_fold(
        &mut self,
        node: &mut DecisionNode,
        bet_number: usize,
        street: Street,
        board: &[Card],
    ) -> SolverResult<()> {
        let state = node.state;
        let last_bet = state.outstanding();
        let call_stacks = state.stacks[0].min(state.stacks[1]);
        let called = NodeState::new(state.pot + last_bet, [call_stacks; 2]);

        let next = if street == Street::River {
            let id = self.cache.insert(board)?;
            Node::Showdown(ShowdownNode::new(called, node.player, board.to_vec(), id))
        } else if call_stacks <= 0.0 {
            Node::AllInShowdown(AllInShowdownNode::new(called, street, board.to_vec(), self.cache)?)
        } else {
            Node::Chance(self.build_chance(called, street, board)?)
        };
        let action = if bet_number > 0 { Action::Call } else { Action::Check };
        node.push_child(action, next);

        if bet_number > 0 {
            let folded = NodeState::new(state.pot - last_bet, state.stacks);
            let fold = TerminalNode::new(folded, node.player.opponent(), board.to_vec());
            node.push_child(Action::Fold, Node::Terminal(fold));
        }
        Ok(())
    }

    fn build_chance(&mut self, state: NodeState, street: Street, board: &[Card]) -> SolverResult<ChanceNode> {
        let mut chance = ChanceNode::new(state, street);
        for card in possible_next_cards(board, street.undealt_cards())? {
            let mut next_board = board.to_vec();
            next_board.push(card);
            let mut child = DecisionNode::new(Player::OOP, state);
            self.add_successors(&mut child, 0, &next_board)?;
            chance.push_child(card, Node::Decision(child));
        }
        Ok(chance)
    }

    fn add_bets(
        &mut self,
        node: &mut DecisionNode,
        bet_number: usize,
        street: Street,
        board: &[Card],
    ) -> SolverResult<()> {
        let state = node.state;
        let bettor = node.player;
        let caller = bettor.opponent();
        let last_bet = state.outstanding();
        let max_stack = state.stacks[0].max(state.stacks[1]);

        let all_in_only = [self.betting.all_in_cutoff];
        let menu: &[f64] = if state.pot * self.betting.all_in_cutoff >= max_stack {
            &all_in_only
        } else {
            self.betting.bets_for(street, bettor, bet_number)?
        };

        for &fraction in menu {
            let sizing = fraction * (state.pot + last_bet) + last_bet;
            let bet = state
                .stack(bettor)
                .min(sizing)
                .min(state.stack(caller) + last_bet);

            let mut stacks = state.stacks;
            stacks[bettor.index()] -= bet;
            let mut child = DecisionNode::new(caller, NodeState::new(state.pot + bet, stacks));
            self.add_successors(&mut child, bet_number + 1, board)?;

            let action = if bet >= state.stack(bettor) {
                Action::AllIn(bet)
            } else if bet_number == 0 {
                Action::Bet(bet)
            } else {
                Action::Raise(bet)
            };
            node.push_child(action, Node::Decision(child));

            if bet < sizing {
                break;
            }
        }
        Ok(())
    }
}

/// Path labels ("check/bet 10.0") for a list of action indices.
pub fn path_label(tree: &GameTree, path: &[usize]) -> String {
    let mut label = String::new();
    let mut node = &tree.root;
    for (i, &a) in path.iter().enumerate() {
        let Some(decision) = node.as_decision() else {
            break;
        };
        let Some(action) = decision.actions().get(a) else {
            break;
        };
        if i > 0 {
            label.push('/');
        }
        let _ = write!(label, "{}", action);
        match decision.child(a) {
            Some(next) => node = next,
            None => break,
        }
    }
    if label.is_empty() {
        label.push_str("root");
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;
    use crate::ranges::parse_range;

    fn river_tree(pot: f64, stack: f64, betting: &BettingConfig) -> GameTree {
        let board = parse_board("2c5d7hJsKs").unwrap();
        let range = parse_range("QQ, 99").unwrap();
        GameTree::build(&TreeParams {
            starting_pot: pot,
            starting_stack: stack,
            board: &board,
            betting,
            oop_range: &range,
            ip_range: &range,
        })
        .unwrap()
    }

    #[test]
    fn shove_only_river_tree_shape() {
        let tree = river_tree(10.0, 10.0, &BettingConfig::uniform(vec![1.0]));
        let root = tree.root_decision().unwrap();
        assert_eq!(root.actions(), &[Action::Check, Action::AllIn(10.0)]);
        let stats = tree.stats();
        // OOP root, IP after check, IP facing shove, OOP facing shove.
        assert_eq!(stats.decision, 4);
        assert_eq!(stats.terminal, 2);
        assert_eq!(stats.showdown, 3);
        assert_eq!(stats.cache_entries, 1);
    }

    #[test]
    fn clamped_size_stops_menu() {
        let mut betting = BettingConfig::uniform(vec![0.5, 2.0, 5.0]);
        betting.all_in_cutoff = 0.1;
        let tree = river_tree(10.0, 15.0, &betting);
        let root = tree.root_decision().unwrap();
        // 0.5 pot = 5, 2 pot clamps to the 15 stack, 5 pot is never built.
        assert_eq!(
            root.actions(),
            &[Action::Check, Action::Bet(5.0), Action::AllIn(15.0)]
        );
    }

    #[test]
    fn facing_bet_has_call_fold_raise() {
        let tree = river_tree(10.0, 100.0, &BettingConfig::uniform(vec![1.0]));
        let facing = tree.node_at(&[1]).and_then(Node::as_decision).unwrap();
        assert_eq!(facing.player, Player::IP);
        assert_eq!(facing.actions()[0], Action::Call);
        assert_eq!(facing.actions()[1], Action::Fold);
        // Raise: pot 20 after the bet, 10 to call, raise to 10 + 30 = 40.
        assert_eq!(facing.actions()[2], Action::Raise(40.0));
    }

    #[test]
    fn empty_menu_fails_fast() {
        let mut betting = BettingConfig::default();
        betting.river.ip = vec![vec![0.5], vec![]];
        let board = parse_board("2c5d7hJsKs").unwrap();
        let range = parse_range("QQ").unwrap();
        let err = GameTree::build(&TreeParams {
            starting_pot: 10.0,
            starting_stack: 100.0,
            board: &board,
            betting: &betting,
            oop_range: &range,
            ip_range: &range,
        });
        assert!(matches!(err, Err(SolverError::EmptyBetMenu { bet_number: 1, .. })));
    }
}
