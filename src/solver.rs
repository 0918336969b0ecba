//! Training loop, exploitability and solution export.

use serde::Serialize;

use crate::blockers::{relative_probabilities, unblocked_combos};
use crate::cards::{format_board, Hand};
use crate::decision_node::DecisionNode;
use crate::error::SolverResult;
use crate::game_tree::{path_label, GameTree};
use crate::node::{GameNode, Node, Player};
use crate::traversal::{Discount, Traversal};

/// Best-response values at one point in training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExploitabilityReport {
    pub iteration: usize,
    pub oop_best_response: f64,
    pub ip_best_response: f64,
    /// Mean of both best responses, in percent of the starting pot.
    pub percent_of_pot: f64,
}

pub struct Solver {
    tree: GameTree,
    discount: Discount,
    iterations_done: usize,
}

impl Solver {
    pub fn new(tree: GameTree, discount: Discount) -> SolverResult<Solver> {
        discount.validate()?;
        Ok(Solver {
            tree,
            discount,
            iterations_done: 0,
        })
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn iterations_done(&self) -> usize {
        self.iterations_done
    }

    /// Run `iterations` CFR iterations, each one pass per player, reporting
    /// exploitability before the first and then every `report_every`.
    /// Returns every report taken, the last one after the final iteration.
    pub fn train(&mut self, iterations: usize, report_every: usize) -> Vec<ExploitabilityReport> {
        let mut reports = vec![self.exploitability()];
        log_report(&reports[0]);

        let pot = self.tree.starting_pot;
        let GameTree {
            root,
            cache,
            ranges,
            ..
        } = &mut self.tree;
        let mut traversal = Traversal::new([&ranges[0], &ranges[1]], cache, self.discount);
        let oop_reach = ranges[0].weights();
        let ip_reach = ranges[1].weights();

        let start = self.iterations_done;
        for i in 1..=iterations {
            let t = start + i;
            traversal.set_iteration(t);

            traversal.traverser = Player::OOP;
            root.cfr_traversal(&traversal, &oop_reach, &ip_reach);
            traversal.traverser = Player::IP;
            root.cfr_traversal(&traversal, &ip_reach, &oop_reach);

            if report_every > 0 && i % report_every == 0 && i != iterations {
                let report = exploitability_of(root, &traversal, pot, t);
                log_report(&report);
                reports.push(report);
            }
        }
        self.iterations_done = start + iterations;

        if iterations > 0 {
            let last = self.exploitability();
            log_report(&last);
            reports.push(last);
        }
        reports
    }

    /// Both players' best response against the other's average strategy.
    pub fn exploitability(&self) -> ExploitabilityReport {
        let tree = &self.tree;
        let traversal = Traversal::new([&tree.ranges[0], &tree.ranges[1]], &tree.cache, self.discount);
        exploitability_of(&tree.root, &traversal, tree.starting_pot, self.iterations_done)
    }

    pub fn solution(&self) -> Solution {
        let tree = &self.tree;
        let mut nodes = Vec::new();
        collect_strategies(tree, &tree.root, &mut Vec::new(), &mut nodes);
        Solution {
            board: format_board(&tree.board),
            starting_pot: tree.starting_pot,
            starting_stack: tree.starting_stack,
            iterations: self.iterations_done,
            discount: self.discount,
            exploitability: self.exploitability(),
            oop_hands: tree.ranges[0].iter().map(|c| c.hand).collect(),
            ip_hands: tree.ranges[1].iter().map(|c| c.hand).collect(),
            nodes,
        }
    }
}

fn log_report(report: &ExploitabilityReport) {
    log::info!(
        "iteration {} oop BR {:.5} ip BR {:.5} exploitability {:.4}% of pot",
        report.iteration,
        report.oop_best_response,
        report.ip_best_response,
        report.percent_of_pot
    );
}

/// Scalar best-response value for `responder`, as an average per combo.
fn player_best_response(root: &Node, traversal: &mut Traversal<'_>, responder: Player) -> f64 {
    traversal.traverser = responder;
    let ours = traversal.range(responder);
    let theirs = traversal.range(responder.opponent());
    let relative = relative_probabilities(ours, theirs);
    let unblocked = unblocked_combos(ours, theirs);
    let evs = root.best_response(traversal, &theirs.weights());

    evs.iter()
        .zip(&relative)
        .zip(&unblocked)
        .filter(|&(_, &u)| u > 0.0)
        .map(|((ev, rel), u)| ev * rel / u)
        .sum()
}

fn exploitability_of(
    root: &Node,
    traversal: &Traversal<'_>,
    pot: f64,
    iteration: usize,
) -> ExploitabilityReport {
    let mut br = Traversal::new(
        [traversal.range(Player::OOP), traversal.range(Player::IP)],
        traversal.cache(),
        traversal.discount,
    );
    let oop = player_best_response(root, &mut br, Player::OOP);
    let ip = player_best_response(root, &mut br, Player::IP);
    ExploitabilityReport {
        iteration,
        oop_best_response: oop,
        ip_best_response: ip,
        percent_of_pot: (oop + ip) / 2.0 / pot * 100.0,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Average strategy at one decision node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeStrategy {
    /// Action indices from the root.
    pub path: Vec<usize>,
    pub label: String,
    pub player: Player,
    pub pot: f64,
    pub actions: Vec<String>,
    /// `[hand][action]`, hands in the acting player's range order.
    pub frequencies: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub board: String,
    pub starting_pot: f64,
    pub starting_stack: f64,
    pub iterations: usize,
    pub discount: Discount,
    pub exploitability: ExploitabilityReport,
    pub oop_hands: Vec<Hand>,
    pub ip_hands: Vec<Hand>,
    /// Decision nodes on the starting street.
    pub nodes: Vec<NodeStrategy>,
}

impl Solution {
    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &std::path::Path) -> SolverResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn hands(&self, player: Player) -> &[Hand] {
        match player {
            Player::OOP => &self.oop_hands,
            Player::IP => &self.ip_hands,
        }
    }
}

fn node_strategy(tree: &GameTree, node: &DecisionNode, path: &[usize]) -> NodeStrategy {
    NodeStrategy {
        path: path.to_vec(),
        label: path_label(tree, path),
        player: node.player,
        pot: node.state.pot,
        actions: node.actions().iter().map(|a| a.to_string()).collect(),
        frequencies: node.average_strategies(),
    }
}

/// Stops at chance nodes: later streets have one subtree per card.
fn collect_strategies(tree: &GameTree, node: &Node, path: &mut Vec<usize>, out: &mut Vec<NodeStrategy>) {
    if let Node::Decision(decision) = node {
        out.push(node_strategy(tree, decision, path));
        for (a, child) in decision.children().iter().enumerate() {
            path.push(a);
            collect_strategies(tree, child, path, out);
            path.pop();
        }
    }
}
