pub mod allin_node;
pub mod blockers;
pub mod cards;
pub mod chance_node;
pub mod cli;
pub mod config;
pub mod decision_node;
pub mod display;
pub mod error;
pub mod flat_cfr;
pub mod game_tree;
pub mod hand_evaluator;
pub mod node;
pub mod ranges;
pub mod river_cache;
pub mod showdown_node;
pub mod solver;
pub mod terminal_node;
pub mod traversal;
