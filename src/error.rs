use thiserror::Error;

use crate::node::{Player, Street};

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Board must have 3, 4 or 5 cards, got {0}")]
    InvalidBoardSize(usize),

    #[error("Duplicate card on board: {0}")]
    DuplicateCard(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Invalid percentage marker: {0}")]
    InvalidPercentage(String),

    #[error("{0} range is empty after removing board conflicts")]
    EmptyRange(Player),

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Starting {name} must be positive, got {value}")]
    NonPositiveAmount { name: &'static str, value: f64 },

    #[error("Empty bet menu for {player} on the {street} after {bet_number} bet(s)")]
    EmptyBetMenu {
        street: Street,
        player: Player,
        bet_number: usize,
    },

    #[error("Invalid bet size {size} in {context}")]
    InvalidBetSize { size: f64, context: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;
