//! Raw game descriptions, validated before construction.

use crate::distrib::Config;
use crate::error::{AggError, Result};
use crate::proj::ProjFunc;
use crate::scalar::AggNumber;

/// Payoff input for one action node.
#[derive(Debug, Clone, PartialEq)]
pub enum PayoffInput<T> {
    /// Values in ascending lexicographic order over the node's acceptance
    /// set (the set of configurations reachable under some profile).
    Complete(Vec<T>),
    /// Explicit (configuration, value) pairs. Every configuration in the
    /// acceptance set must appear exactly once.
    Mapping(Vec<(Config, T)>),
}

/// A raw action graph game description.
///
/// Validated and consumed by [`AggGame::new`](crate::AggGame::new); the
/// fields mirror the sections of the AGG file format.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig<T> {
    /// Number of players.
    pub num_players: usize,
    /// Number of action nodes; they occupy indices `[0, S)`.
    pub num_action_nodes: usize,
    /// Number of function nodes; they occupy indices `[S, S + F)`.
    pub num_function_nodes: usize,
    /// Per player, the action-node indices of its actions, strictly
    /// ascending.
    pub action_sets: Vec<Vec<usize>>,
    /// Per node (action nodes first, then function nodes), the ordered
    /// neighbor list.
    pub neighbors: Vec<Vec<usize>>,
    /// Per function node, its projection function.
    pub functions: Vec<ProjFunc>,
    /// Per action node, its payoff table input.
    pub payoffs: Vec<PayoffInput<T>>,
}

impl<T: AggNumber> GameConfig<T> {
    /// Checks lengths, index ranges, action-set ordering, and projection
    /// parameters. Graph-level checks (cycles, signature chains) happen
    /// during construction.
    pub fn validate(&self) -> Result<()> {
        let n = self.num_players;
        let s = self.num_action_nodes;
        let f = self.num_function_nodes;

        if n == 0 {
            return Err(AggError::InvalidDescription(
                "a game needs at least one player".into(),
            ));
        }
        if self.action_sets.len() != n {
            return Err(AggError::InvalidDescription(format!(
                "expected {} action sets, got {}",
                n,
                self.action_sets.len()
            )));
        }
        if self.neighbors.len() != s + f {
            return Err(AggError::InvalidDescription(format!(
                "expected {} neighbor lists, got {}",
                s + f,
                self.neighbors.len()
            )));
        }
        if self.functions.len() != f {
            return Err(AggError::InvalidDescription(format!(
                "expected {} projection functions, got {}",
                f,
                self.functions.len()
            )));
        }
        if self.payoffs.len() != s {
            return Err(AggError::InvalidDescription(format!(
                "expected {} payoff tables, got {}",
                s,
                self.payoffs.len()
            )));
        }

        for (player, actions) in self.action_sets.iter().enumerate() {
            if actions.is_empty() {
                return Err(AggError::InvalidDescription(format!(
                    "player {} has an empty action set",
                    player
                )));
            }
            if !actions.windows(2).all(|w| w[0] < w[1]) {
                return Err(AggError::ActionSetNotAscending { player });
            }
            if let Some(&node) = actions.iter().find(|&&node| node >= s) {
                return Err(AggError::InvalidDescription(format!(
                    "player {} lists node {} which is not an action node",
                    player, node
                )));
            }
        }

        for (node, neighbors) in self.neighbors.iter().enumerate() {
            if let Some(&bad) = neighbors.iter().find(|&&w| w >= s + f) {
                return Err(AggError::InvalidDescription(format!(
                    "node {} lists out-of-range neighbor {}",
                    node, bad
                )));
            }
        }

        for (idx, func) in self.functions.iter().enumerate() {
            match *func {
                ProjFunc::SumMod { modulus } if modulus == 0 => {
                    return Err(AggError::InvalidDescription(format!(
                        "function node {} has modulus 0",
                        s + idx
                    )));
                }
                ProjFunc::Power { exponent } if exponent == 0 => {
                    return Err(AggError::InvalidDescription(format!(
                        "function node {} has exponent 0",
                        s + idx
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
