//! Game construction: ancestor walks, projection tensors, player
//! orderings, and acceptance sets.
//!
//! The builder runs every setup-time computation that does not depend on
//! payoff values. Splitting it from [`AggGame`] lets the file reader learn
//! each node's acceptance set (and thus how many payoff values to expect)
//! before it has finished reading the file.

use std::collections::BTreeSet;

use crate::distrib::{Config, ConfigDistrib, PayoffTable};
use crate::error::{AggError, Result};
use crate::game::oracle::AggGame;
use crate::proj::ProjFunc;
use crate::scalar::AggNumber;

/// Precomputed game structure, short of payoff values.
#[derive(Debug)]
pub(crate) struct GameBuilder<T> {
    num_players: usize,
    num_action_nodes: usize,
    num_function_nodes: usize,
    actions: Vec<usize>,
    strategy_offset: Vec<usize>,
    total_actions: usize,
    max_actions: usize,
    action_sets: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
    functions: Vec<ProjFunc>,
    composers: Vec<Vec<ProjFunc>>,
    projection: Vec<Vec<Vec<Config>>>,
    seeds: Vec<Vec<ConfigDistrib<T>>>,
    porder: Vec<Vec<Vec<usize>>>,
    is_pure: Vec<bool>,
    node2action: Vec<Vec<Option<usize>>>,
    player2class: Vec<usize>,
    player_classes: Vec<Vec<usize>>,
    unique_action_sets: Vec<Vec<usize>>,
    ksym_strategy_offset: Vec<usize>,
    acceptance: Vec<BTreeSet<Config>>,
}

impl<T: AggNumber> GameBuilder<T> {
    /// Runs all payoff-independent setup. The inputs must already have
    /// passed [`GameConfig::validate`](crate::GameConfig::validate)-level
    /// checks; this performs the graph-level ones (cycles, signature
    /// chains) on top.
    pub(crate) fn new(
        num_players: usize,
        num_action_nodes: usize,
        num_function_nodes: usize,
        action_sets: Vec<Vec<usize>>,
        neighbors: Vec<Vec<usize>>,
        functions: Vec<ProjFunc>,
    ) -> Result<Self> {
        let n = num_players;
        let s = num_action_nodes;

        for (player, set) in action_sets.iter().enumerate() {
            if !set.windows(2).all(|w| w[0] < w[1]) {
                return Err(AggError::ActionSetNotAscending { player });
            }
        }

        let actions: Vec<usize> = action_sets.iter().map(|a| a.len()).collect();
        let mut strategy_offset = vec![0; n + 1];
        for p in 0..n {
            strategy_offset[p + 1] = strategy_offset[p] + actions[p];
        }
        let total_actions = strategy_offset[n];
        let max_actions = actions.iter().copied().max().unwrap_or(0);

        // Player classes: players grouped by identical (sorted) action set.
        let mut keyed: Vec<(&Vec<usize>, usize)> = action_sets.iter().zip(0..n).collect();
        keyed.sort();
        let mut unique_action_sets: Vec<Vec<usize>> = Vec::new();
        let mut player_classes: Vec<Vec<usize>> = Vec::new();
        let mut player2class = vec![0; n];
        for (set, player) in keyed {
            if unique_action_sets.last() != Some(set) {
                unique_action_sets.push(set.clone());
                player_classes.push(Vec::new());
            }
            let class = unique_action_sets.len() - 1;
            player_classes[class].push(player);
            player2class[player] = class;
        }
        let mut ksym_strategy_offset = vec![0; unique_action_sets.len() + 1];
        for (c, set) in unique_action_sets.iter().enumerate() {
            ksym_strategy_offset[c + 1] = ksym_strategy_offset[c] + set.len();
        }

        let is_pure: Vec<bool> = neighbors[..s]
            .iter()
            .map(|list| list.iter().all(|&w| w < s))
            .collect();

        let mut node2action = vec![vec![None; n]; s];
        for p in 0..n {
            for (a, &node) in action_sets[p].iter().enumerate() {
                node2action[node][p] = Some(a);
            }
        }

        // Ancestor multisets for function nodes, with cycle and signature
        // checks along the way.
        let mut ancestors: Vec<Vec<usize>> = Vec::with_capacity(num_function_nodes);
        for g in 0..num_function_nodes {
            let mut dest = Vec::new();
            let mut path = Vec::new();
            collect_ancestors(&mut dest, s + g, s, &neighbors, &functions, &mut path)?;
            dest.sort_unstable();
            ancestors.push(dest);
        }

        // Composer per neighbor position of each action node.
        let composers: Vec<Vec<ProjFunc>> = neighbors[..s]
            .iter()
            .map(|list| {
                list.iter()
                    .map(|&w| if w < s { ProjFunc::Sum } else { functions[w - s] })
                    .collect()
            })
            .collect();

        // Projection tensor and per-node projected-strategy seeds.
        let mut projection: Vec<Vec<Vec<Config>>> = Vec::with_capacity(s);
        let mut seeds: Vec<Vec<ConfigDistrib<T>>> = Vec::with_capacity(s);
        for v in 0..s {
            let mut node_proj = Vec::with_capacity(n);
            let mut node_seeds = Vec::with_capacity(n);
            for p in 0..n {
                let mut player_proj = Vec::with_capacity(actions[p]);
                let mut seed = ConfigDistrib::new();
                for &action_node in &action_sets[p] {
                    let key: Config = neighbors[v]
                        .iter()
                        .map(|&w| {
                            if w == action_node {
                                1
                            } else if w >= s {
                                let f = &functions[w - s];
                                let count = ancestors[w - s]
                                    .iter()
                                    .filter(|&&anc| anc == action_node)
                                    .count();
                                f.apply(&vec![action_node as u32; count])
                            } else {
                                0
                            }
                        })
                        .collect();
                    seed.add(key.clone(), T::one());
                    player_proj.push(key);
                }
                node_proj.push(player_proj);
                node_seeds.push(seed);
            }
            projection.push(node_proj);
            seeds.push(node_seeds);
        }

        // Porder: the player itself first, the rest by ascending projected
        // support size. Small supports first keeps intermediate products
        // small.
        let mut porder: Vec<Vec<Vec<usize>>> = Vec::with_capacity(n);
        for p in 0..n {
            let mut per_action = Vec::with_capacity(actions[p]);
            for &v in &action_sets[p] {
                let mut order: Vec<usize> = vec![p];
                let mut others: Vec<(usize, usize)> = (0..n)
                    .filter(|&q| q != p)
                    .map(|q| (seeds[v][q].len(), q))
                    .collect();
                others.sort_unstable();
                order.extend(others.into_iter().map(|(_, q)| q));
                per_action.push(order);
            }
            porder.push(per_action);
        }

        let mut builder = GameBuilder {
            num_players,
            num_action_nodes,
            num_function_nodes,
            actions,
            strategy_offset,
            total_actions,
            max_actions,
            action_sets,
            neighbors,
            functions,
            composers,
            projection,
            seeds,
            porder,
            is_pure,
            node2action,
            player2class,
            player_classes,
            unique_action_sets,
            ksym_strategy_offset,
            acceptance: vec![BTreeSet::new(); s],
        };
        builder.derive_acceptance_sets();
        Ok(builder)
    }

    /// Derives, per action node, the configurations a payoff must exist
    /// for: multiply the projected supports of all players in `Porder`
    /// order, once per distinct player class.
    fn derive_acceptance_sets(&mut self) {
        let n = self.num_players;
        let mut done: BTreeSet<&[usize]> = BTreeSet::new();
        for p in 0..n {
            if !done.insert(&self.action_sets[p]) {
                continue;
            }
            for (a, &v) in self.action_sets[p].iter().enumerate() {
                let composers = &self.composers[v];
                let mut current = ConfigDistrib::<T>::singleton(self.projection[v][p][a].clone());
                let mut next = ConfigDistrib::new();
                for k in 1..n {
                    let q = self.porder[p][a][k];
                    next.assign_product(&current, &self.seeds[v][q], composers);
                    std::mem::swap(&mut current, &mut next);
                }
                self.acceptance[v].extend(current.keys().cloned());
            }
        }
    }

    /// The acceptance set of an action node.
    pub(crate) fn acceptance(&self, node: usize) -> &BTreeSet<Config> {
        &self.acceptance[node]
    }

    /// Assembles the game once payoff tables exist for every action node.
    pub(crate) fn finish(self, payoffs: Vec<PayoffTable<T>>) -> AggGame<T> {
        debug_assert_eq!(payoffs.len(), self.num_action_nodes);
        let n = self.num_players;
        let projected_strat = self.seeds;
        AggGame {
            num_players: self.num_players,
            num_action_nodes: self.num_action_nodes,
            num_function_nodes: self.num_function_nodes,
            actions: self.actions,
            strategy_offset: self.strategy_offset,
            total_actions: self.total_actions,
            max_actions: self.max_actions,
            action_sets: self.action_sets,
            neighbors: self.neighbors,
            functions: self.functions,
            composers: self.composers,
            projection: self.projection,
            payoffs,
            porder: self.porder,
            is_pure: self.is_pure,
            node2action: self.node2action,
            player2class: self.player2class,
            player_classes: self.player_classes,
            unique_action_sets: self.unique_action_sets,
            ksym_strategy_offset: self.ksym_strategy_offset,
            acceptance: self.acceptance,
            projected_strat,
            pr: vec![ConfigDistrib::new(); n],
        }
    }
}

/// Collects the action-node ancestors of `node` into `dest`, keeping
/// duplicates: one occurrence per distinct path, which is the multiplicity
/// the projection function observes. Rejects cycles among function nodes
/// and projection-signature mismatches along the walk.
fn collect_ancestors(
    dest: &mut Vec<usize>,
    node: usize,
    s: usize,
    neighbors: &[Vec<usize>],
    functions: &[ProjFunc],
    path: &mut Vec<usize>,
) -> Result<()> {
    if node < s {
        dest.push(node);
        return Ok(());
    }
    if path.contains(&node) {
        return Err(AggError::FunctionNodeCycle { node });
    }
    path.push(node);
    for &w in &neighbors[node] {
        if w >= s && functions[w - s] != functions[node - s] {
            return Err(AggError::ProjectionMismatch { node, neighbor: w });
        }
        collect_ancestors(dest, w, s, neighbors, functions, path)?;
    }
    path.pop();
    Ok(())
}
