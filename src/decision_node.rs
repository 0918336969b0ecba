use std::fmt;

use crate::flat_cfr::FlatCfr;
use crate::node::{indent, Action, GameNode, Node, NodeState, Player};
use crate::traversal::Traversal;

/// A point where `player` picks one of `actions`; holds that player's
/// learning state for every hand in their range.
pub struct DecisionNode {
    pub player: Player,
    pub state: NodeState,
    actions: Vec<Action>,
    children: Vec<Node>,
    cfr: FlatCfr,
}

impl DecisionNode {
    pub fn new(player: Player, state: NodeState) -> DecisionNode {
        DecisionNode {
            player,
            state,
            actions: Vec::new(),
            children: Vec::new(),
            cfr: FlatCfr::default(),
        }
    }

    pub fn push_child(&mut self, action: Action, child: Node) {
        self.actions.push(action);
        self.children.push(child);
    }

    /// Size the regret table once the tree is complete.
    pub fn allocate(&mut self, num_hands: usize) {
        self.cfr = FlatCfr::new(self.children.len(), num_hands);
    }

    pub fn num_actions(&self) -> usize {
        self.children.len()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn child(&self, action: usize) -> Option<&Node> {
        self.children.get(action)
    }

    pub fn average_strategy(&self, hand: usize) -> Vec<f64> {
        self.cfr.average_strategy(hand)
    }

    /// `[hand][action]` average strategy for the acting player's range.
    pub fn average_strategies(&self) -> Vec<Vec<f64>> {
        self.cfr.average_strategies()
    }

    fn traverser_pass(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        let num_hands = traverser_reach.len();
        let mut node_utility = vec![0.0; num_hands];
        let mut action_utility = Vec::with_capacity(self.children.len());

        for (a, child) in self.children.iter_mut().enumerate() {
            let next_reach: Vec<f64> = (0..num_hands)
                .map(|h| self.cfr.strategy(h)[a] * traverser_reach[h])
                .collect();
            let utility = child.cfr_traversal(traversal, &next_reach, opponent_reach);
            for (h, u) in node_utility.iter_mut().enumerate() {
                *u += self.cfr.strategy(h)[a] * utility[h];
            }
            action_utility.push(utility);
        }

        self.cfr.update(
            traversal.weights(),
            traverser_reach,
            &node_utility,
            &action_utility,
        );
        node_utility
    }

    fn opponent_pass(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        let mut node_utility = vec![0.0; traverser_reach.len()];
        for (a, child) in self.children.iter_mut().enumerate() {
            let next_reach: Vec<f64> = opponent_reach
                .iter()
                .enumerate()
                .map(|(h, &p)| self.cfr.strategy(h)[a] * p)
                .collect();
            let utility = child.cfr_traversal(traversal, traverser_reach, &next_reach);
            for (n, u) in node_utility.iter_mut().zip(utility) {
                *n += u;
            }
        }
        node_utility
    }
}

impl GameNode for DecisionNode {
    fn cfr_traversal(
        &mut self,
        traversal: &Traversal<'_>,
        traverser_reach: &[f64],
        opponent_reach: &[f64],
    ) -> Vec<f64> {
        self.cfr.regret_match();
        if self.player == traversal.traverser {
            self.traverser_pass(traversal, traverser_reach, opponent_reach)
        } else {
            self.opponent_pass(traversal, traverser_reach, opponent_reach)
        }
    }

    fn best_response(&self, traversal: &Traversal<'_>, opponent_reach: &[f64]) -> Vec<f64> {
        if self.player == traversal.traverser {
            let mut best: Option<Vec<f64>> = None;
            for child in &self.children {
                let utility = child.best_response(traversal, opponent_reach);
                best = Some(match best {
                    None => utility,
                    Some(mut b) => {
                        for (x, u) in b.iter_mut().zip(utility) {
                            *x = x.max(u);
                        }
                        b
                    }
                });
            }
            return best.unwrap_or_else(|| vec![0.0; traversal.traverser_range().len()]);
        }

        let average = self.cfr.average_strategies();
        let mut node_utility = vec![0.0; traversal.traverser_range().len()];
        for (a, child) in self.children.iter().enumerate() {
            let next_reach: Vec<f64> = opponent_reach
                .iter()
                .zip(&average)
                .map(|(&p, row)| p * row[a])
                .collect();
            let utility = child.best_response(traversal, &next_reach);
            for (n, u) in node_utility.iter_mut().zip(utility) {
                *n += u;
            }
        }
        node_utility
    }

    fn describe(&self, level: usize, out: &mut dyn fmt::Write) -> fmt::Result {
        indent(level, out)?;
        writeln!(
            out,
            "Decision {} | pot {:.1} | stacks {:.1}/{:.1}",
            self.player, self.state.pot, self.state.stacks[0], self.state.stacks[1]
        )?;
        for (action, child) in self.actions.iter().zip(&self.children) {
            indent(level + 1, out)?;
            writeln!(out, "[{}]", action)?;
            child.describe(level + 2, out)?;
        }
        Ok(())
    }
}
