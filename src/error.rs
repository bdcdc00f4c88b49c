//! Error types for game construction and payoff queries.

use thiserror::Error;

/// Errors produced while constructing or querying an action graph game.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggError {
    /// Malformed input while reading the AGG text format.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The function-node graph contains a cycle.
    #[error("cycle of function nodes through node {node}")]
    FunctionNodeCycle { node: usize },

    /// A function node aggregates a neighbor with a different projection function.
    #[error("projection function mismatch between node {node} and its neighbor {neighbor}")]
    ProjectionMismatch { node: usize, neighbor: usize },

    /// A player's action set is not strictly ascending by node index.
    #[error("action set for player {player} is not strictly ascending")]
    ActionSetNotAscending { player: usize },

    /// The game description is inconsistent (wrong lengths, out-of-range indices).
    #[error("invalid game description: {0}")]
    InvalidDescription(String),

    /// A MAPPING payoff table specified the same configuration twice.
    #[error("payoff for configuration {config:?} at action node {node} specified more than once")]
    DuplicatePayoff { node: usize, config: Vec<u32> },

    /// A payoff table is missing a configuration from the acceptance set.
    #[error("payoff for configuration {config:?} at action node {node} not specified")]
    MissingPayoff { node: usize, config: Vec<u32> },

    /// A COMPLETE payoff table has the wrong number of entries.
    #[error("action node {node} expects {expected} payoff values, got {got}")]
    PayoffCountMismatch {
        node: usize,
        expected: usize,
        got: usize,
    },

    /// A queried configuration is absent from a payoff table.
    #[error("configuration {config:?} not found in the payoff table of action node {node}")]
    ConfigurationNotFound { node: usize, config: Vec<u32> },

    /// A strategy profile has the wrong dimension or a negative entry.
    #[error("invalid strategy profile: {0}")]
    InvalidProfile(String),

    /// A player index is out of range.
    #[error("player index {player} out of range ({num_players} players)")]
    PlayerOutOfRange { player: usize, num_players: usize },

    /// An action index is out of range for the given player or class.
    #[error("action index {action} out of range ({num_actions} actions)")]
    ActionOutOfRange { action: usize, num_actions: usize },

    /// A symmetric oracle was called on a game that is not symmetric.
    #[error("the game is not symmetric")]
    NotSymmetric,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AggError>;
