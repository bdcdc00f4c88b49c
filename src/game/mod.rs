//! Game construction and the payoff oracle.
//!
//! This module provides:
//! - [`GameConfig`]: a raw, validated game description
//! - [`AggGame`]: the constructed game with its precomputed tables and
//!   payoff oracle
//! - [`parse_game`]: the AGG text format reader

mod builder;
pub mod config;
pub mod oracle;
pub mod parser;

pub use config::{GameConfig, PayoffInput};
pub use oracle::{AggGame, GameStats};
pub use parser::parse_game;
