//! An action graph game (AGG) engine.
//!
//! Action graph games represent simultaneous-move games compactly: players
//! share action nodes, payoff dependencies follow the edges of an action
//! graph, and function nodes aggregate counts through projection functions.
//! Expected payoffs under mixed strategy profiles are then computed in
//! polynomial time over distributions of neighbor configurations instead
//! of the exponential normal form.
//!
//! This library provides:
//! - [`AggGame`]: the game object with its payoff oracle (pure, mixed,
//!   per-action, Jacobian, symmetric and k-symmetric payoffs)
//! - [`GameConfig`]: in-memory game construction
//! - [`parse_game`]: the AGG text format reader
//! - [`AggNumber`]: scalar genericity (`f64` for speed,
//!   [`num_rational::Rational64`] for exact arithmetic)
//!
//! # Examples
//!
//! See the demos for complete walkthroughs:
//! ```bash
//! cargo run --example coordination
//! cargo run --example el_farol
//! ```

pub mod distrib;
pub mod error;
pub mod game;
pub mod gray;
pub mod proj;
pub mod scalar;

pub use distrib::{Config, ConfigDistrib, PayoffTable};
pub use error::{AggError, Result};
pub use game::{parse_game, AggGame, GameConfig, GameStats, PayoffInput};
pub use gray::GrayComposition;
pub use proj::ProjFunc;
pub use scalar::AggNumber;
