//! JSON solver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::parse_board;
use crate::error::{SolverError, SolverResult};
use crate::game_tree::{BettingConfig, GameTree, TreeParams};
use crate::ranges::parse_range;
use crate::solver::Solver;
use crate::traversal::Discount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub board: String,
    pub oop_range: String,
    pub ip_range: String,
    pub starting_pot: f64,
    pub starting_stack: f64,
    pub iterations: usize,
    /// Exploitability is reported every this many iterations; 0 disables it.
    pub report_every: usize,
    pub discount: Discount,
    pub betting: BettingConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            board: "Ac7s5s3d2h".to_string(),
            oop_range: "22+, A2+, K2+, Q2+, J2+, T2+, 92+, 82+, 72+, 62+, 52+, 42+, 32".to_string(),
            ip_range: "22+, A2+, K2+, Q2+, J2+, T2+, 92+, 82+, 72+, 62+, 52+, 42+, 32".to_string(),
            starting_pot: 40.0,
            starting_stack: 100.0,
            iterations: 200,
            report_every: 25,
            discount: Discount::default(),
            betting: BettingConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn from_json_str(json: &str) -> SolverResult<SolverConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> SolverResult<SolverConfig> {
        let text = std::fs::read_to_string(path)?;
        SolverConfig::from_json_str(&text)
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse, validate and build the tree. Nothing is built if any part of
    /// the configuration is rejected.
    pub fn build_solver(&self) -> SolverResult<Solver> {
        let board = parse_board(&self.board)?;
        let oop = parse_range(&self.oop_range)?;
        let ip = parse_range(&self.ip_range)?;
        self.discount.validate()?;
        if self.iterations == 0 {
            return Err(SolverError::InvalidValue("iterations must be at least 1".to_string()));
        }

        let tree = GameTree::build(&TreeParams {
            starting_pot: self.starting_pot,
            starting_stack: self.starting_stack,
            board: &board,
            betting: &self.betting,
            oop_range: &oop,
            ip_range: &ip,
        })?;
        Solver::new(tree, self.discount)
    }
}
