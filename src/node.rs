//! Shared node vocabulary and the closed set of tree node variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allin_node::AllInShowdownNode;
use crate::chance_node::ChanceNode;
use crate::decision_node::DecisionNode;
use crate::error::{SolverError, SolverResult};
use crate::showdown_node::ShowdownNode;
use crate::terminal_node::TerminalNode;
use crate::traversal::Traversal;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    OOP,
    IP,
}

impl Player {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::OOP => 0,
            Player::IP => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::OOP => Player::IP,
            Player::IP => Player::OOP,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::OOP => write!(f, "OOP"),
            Player::IP => write!(f, "IP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn from_board_len(len: usize) -> SolverResult<Street> {
        match len {
            3 => Ok(Street::Flop),
            4 => Ok(Street::Turn),
            5 => Ok(Street::River),
            n => Err(SolverError::InvalidBoardSize(n)),
        }
    }

    /// Cards left in the deck once this street's board is out.
    pub fn undealt_cards(self) -> usize {
        match self {
            Street::Flop => 49,
            Street::Turn => 48,
            Street::River => 47,
        }
    }

    /// Cards that can complete the board from here given both hole cards
    /// are known: 45 after the flop, 44 after the turn.
    pub fn chance_divisor(self) -> f64 {
        match self {
            Street::Flop => 45.0,
            Street::Turn => 44.0,
            Street::River => 1.0,
        }
    }

    /// Equally likely runouts to the river: C(45, 2) from the flop, 44 from the turn.
    pub fn runout_divisor(self) -> f64 {
        match self {
            Street::Flop => 990.0,
            Street::Turn => 44.0,
            Street::River => 1.0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
        }
    }
}

/// Pot and both remaining stacks, indexed by [`Player::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub pot: f64,
    pub stacks: [f64; 2],
}

impl NodeState {
    pub fn new(pot: f64, stacks: [f64; 2]) -> NodeState {
        NodeState { pot, stacks }
    }

    #[inline]
    pub fn stack(&self, player: Player) -> f64 {
        self.stacks[player.index()]
    }

    /// Amount the player behind in chips must put in to match.
    #[inline]
    pub fn outstanding(&self) -> f64 {
        (self.stacks[0] - self.stacks[1]).abs()
    }
}

/// Edge label on a decision node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum Action {
    Check,
    Call,
    Fold,
    Bet(f64),
    Raise(f64),
    AllIn(f64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Fold => write!(f, "fold"),
            Action::Bet(x) => write!(f, "bet {:.1}", x),
            Action::Raise(x) => write!(f, "raise {:.1}", x),
            Action::AllIn(x) => write!(f, "all-in {:.1}", x),
        }
    }
}

// ---------------------------------------------------------------------------
// Node capability
// ---------------------------------------------------------------------------

/// What every node in the tree can do.
///
/// Both entry points return one utility per traverser hand index, in the
/// traverser range's order.
pub trait GameNode {
    /// One CFR pass: counterfactual utilities under the current strategies,
    /// updating regrets where the traverser acts.
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64>;

    /// Traverser best-responds while the opponent plays its average strategy.
    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64>;

    /// Indented outline of this subtree.
    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result;
}

pub enum Node {
    Decision(DecisionNode),
    Chance(ChanceNode),
    Terminal(TerminalNode),
    Showdown(ShowdownNode),
    AllInShowdown(AllInShowdownNode),
}

impl Node {
    fn as_game_node(&self) -> &dyn GameNode {
        match self {
            Node::Decision(n) => n,
            Node::Chance(n) => n,
            Node::Terminal(n) => n,
            Node::Showdown(n) => n,
            Node::AllInShowdown(n) => n,
        }
    }

    fn as_game_node_mut(&mut self) -> &mut dyn GameNode {
        match self {
            Node::Decision(n) => n,
            Node::Chance(n) => n,
            Node::Terminal(n) => n,
            Node::Showdown(n) => n,
            Node::AllInShowdown(n) => n,
        }
    }

    pub fn state(&self) -> &NodeState {
        match self {
            Node::Decision(n) => &n.state,
            Node::Chance(n) => &n.state,
            Node::Terminal(n) => &n.state,
            Node::Showdown(n) => &n.state,
            Node::AllInShowdown(n) => &n.state,
        }
    }

    pub fn as_decision(&self) -> Option<&DecisionNode> {
        match self {
            Node::Decision(n) => Some(n),
            _ => None,
        }
    }
}

impl GameNode for Node {
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        self.as_game_node_mut()
            .cfr_traversal(traversal, traverser_reach, opponent_reach)
    }

    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        self.as_game_node().best_response(traversal, opponent_reach)
    }

    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
        self.as_game_node().describe(level, out)
    }
}

/// Write `level` tabs.
pub(crate) fn indent(level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
    for _ in 0..level {
        out.write_char('\t')?;
    }
    Ok(())
}
