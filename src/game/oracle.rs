//! The action graph game object and its payoff oracle.
//!
//! [`AggGame`] owns every table precomputed at construction (projections,
//! player orderings, payoff tables keyed by neighbor configuration) plus
//! the scratch buffers the oracle reuses across calls (`projected_strat`,
//! `pr`). Oracle methods therefore take `&mut self` and are not reentrant
//! on one instance; clone the game for concurrent use.

use std::collections::BTreeSet;

use crate::distrib::{Config, ConfigDistrib, PayoffTable};
use crate::error::{AggError, Result};
use crate::game::builder::GameBuilder;
use crate::game::config::{GameConfig, PayoffInput};
use crate::gray::GrayComposition;
use crate::proj::ProjFunc;
use crate::scalar::AggNumber;

/// A compact simultaneous-move game with graph-structured payoffs.
///
/// Construct from a [`GameConfig`] or from the AGG text format via
/// [`parse_game`](crate::game::parse_game). Payoff queries take mixed
/// strategy profiles as flat probability slices segmented by player (see
/// [`first_action`](Self::first_action)).
#[derive(Debug, Clone)]
pub struct AggGame<T> {
    pub(crate) num_players: usize,
    pub(crate) num_action_nodes: usize,
    pub(crate) num_function_nodes: usize,
    /// Per-player action counts.
    pub(crate) actions: Vec<usize>,
    /// Prefix sums of `actions`; entry `n` is the total action count.
    pub(crate) strategy_offset: Vec<usize>,
    pub(crate) total_actions: usize,
    pub(crate) max_actions: usize,
    pub(crate) action_sets: Vec<Vec<usize>>,
    pub(crate) neighbors: Vec<Vec<usize>>,
    pub(crate) functions: Vec<ProjFunc>,
    /// Per action node, the composer at each neighbor position.
    pub(crate) composers: Vec<Vec<ProjFunc>>,
    /// `projection[v][p][a]`: contribution of player `p`'s action `a` to
    /// the configuration of node `v`.
    pub(crate) projection: Vec<Vec<Vec<Config>>>,
    pub(crate) payoffs: Vec<PayoffTable<T>>,
    /// `porder[p][a]`: multiplication order, `p` first, then ascending
    /// projected-support size.
    pub(crate) porder: Vec<Vec<Vec<usize>>>,
    /// True when every neighbor of the node is an action node.
    pub(crate) is_pure: Vec<bool>,
    /// Local action index of node `v` for player `p`, if `v` is in `p`'s
    /// action set.
    pub(crate) node2action: Vec<Vec<Option<usize>>>,
    pub(crate) player2class: Vec<usize>,
    pub(crate) player_classes: Vec<Vec<usize>>,
    pub(crate) unique_action_sets: Vec<Vec<usize>>,
    pub(crate) ksym_strategy_offset: Vec<usize>,
    pub(crate) acceptance: Vec<BTreeSet<Config>>,
    // Scratch space, rewritten by every oracle call.
    pub(crate) projected_strat: Vec<Vec<ConfigDistrib<T>>>,
    pub(crate) pr: Vec<ConfigDistrib<T>>,
}

/// Summary counts for a constructed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameStats {
    pub num_players: usize,
    pub num_action_nodes: usize,
    pub num_function_nodes: usize,
    pub total_actions: usize,
    pub num_player_classes: usize,
    /// Total payoff entries across all action nodes.
    pub payoff_entries: usize,
}

impl<T: AggNumber> AggGame<T> {
    /// Builds a game from a raw description.
    pub fn new(config: GameConfig<T>) -> Result<Self> {
        config.validate()?;
        let GameConfig {
            num_players,
            num_action_nodes,
            num_function_nodes,
            action_sets,
            neighbors,
            functions,
            payoffs,
        } = config;
        let builder = GameBuilder::new(
            num_players,
            num_action_nodes,
            num_function_nodes,
            action_sets,
            neighbors,
            functions,
        )?;
        let mut tables = Vec::with_capacity(num_action_nodes);
        for (node, input) in payoffs.into_iter().enumerate() {
            let table = match input {
                PayoffInput::Complete(values) => PayoffTable::from_complete(
                    node,
                    builder.acceptance(node).iter().cloned(),
                    values,
                )?,
                PayoffInput::Mapping(pairs) => {
                    PayoffTable::from_mapping(node, builder.acceptance(node).iter(), pairs)?
                }
            };
            tables.push(table);
        }
        Ok(builder.finish(tables))
    }

    // ----- queries ---------------------------------------------------

    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn num_action_nodes(&self) -> usize {
        self.num_action_nodes
    }

    pub fn num_function_nodes(&self) -> usize {
        self.num_function_nodes
    }

    /// Number of actions of one player.
    pub fn num_actions(&self, player: usize) -> usize {
        self.actions[player]
    }

    /// Largest per-player action count.
    pub fn max_actions(&self) -> usize {
        self.max_actions
    }

    /// Length of a flat mixed strategy profile.
    pub fn total_actions(&self) -> usize {
        self.total_actions
    }

    /// Index of `player`'s first action in a flat profile.
    pub fn first_action(&self, player: usize) -> usize {
        self.strategy_offset[player]
    }

    /// The action-node indices of one player's actions.
    pub fn action_set(&self, player: usize) -> &[usize] {
        &self.action_sets[player]
    }

    /// The neighbor list of any node (action or function).
    pub fn node_neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    /// The projection function of function node `g` (local index).
    pub fn function(&self, g: usize) -> ProjFunc {
        self.functions[g]
    }

    /// True when all players share one action set.
    pub fn is_symmetric(&self) -> bool {
        self.player_classes.len() == 1
    }

    pub fn num_player_classes(&self) -> usize {
        self.player_classes.len()
    }

    /// The class a player belongs to.
    pub fn player_class(&self, player: usize) -> usize {
        self.player2class[player]
    }

    /// The players of one class.
    pub fn players_in_class(&self, class: usize) -> &[usize] {
        &self.player_classes[class]
    }

    /// The shared (sorted) action set of one class.
    pub fn class_action_set(&self, class: usize) -> &[usize] {
        &self.unique_action_sets[class]
    }

    /// Length of a flat k-symmetric strategy profile.
    pub fn num_ksym_actions(&self) -> usize {
        *self.ksym_strategy_offset.last().unwrap()
    }

    /// Index of a class's first action in a flat k-symmetric profile.
    pub fn first_ksym_action(&self, class: usize) -> usize {
        self.ksym_strategy_offset[class]
    }

    /// The configurations a payoff must exist for at `node`.
    pub fn acceptance_set(&self, node: usize) -> &BTreeSet<Config> {
        &self.acceptance[node]
    }

    /// The payoff table of an action node.
    pub fn payoff_table(&self, node: usize) -> &PayoffTable<T> {
        &self.payoffs[node]
    }

    /// The smallest payoff in the game.
    pub fn min_payoff(&self) -> Option<T> {
        self.payoffs
            .iter()
            .filter_map(|t| t.min_value())
            .reduce(|best, v| if v < best { v } else { best })
            .cloned()
    }

    /// The largest payoff in the game.
    pub fn max_payoff(&self) -> Option<T> {
        self.payoffs
            .iter()
            .filter_map(|t| t.max_value())
            .reduce(|best, v| if v > best { v } else { best })
            .cloned()
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            num_players: self.num_players,
            num_action_nodes: self.num_action_nodes,
            num_function_nodes: self.num_function_nodes,
            total_actions: self.total_actions,
            num_player_classes: self.player_classes.len(),
            payoff_entries: self.payoffs.iter().map(|t| t.len()).sum(),
        }
    }

    // ----- the oracle ------------------------------------------------

    /// Payoff to `player` under a pure profile (one local action index per
    /// player).
    pub fn pure_payoff(&self, player: usize, profile: &[usize]) -> Result<T> {
        self.check_player(player)?;
        if profile.len() != self.num_players {
            return Err(AggError::InvalidProfile(format!(
                "pure profile has length {}, expected {}",
                profile.len(),
                self.num_players
            )));
        }
        for (p, &a) in profile.iter().enumerate() {
            self.check_action(a, self.actions[p])?;
        }

        let node = self.action_sets[player][profile[player]];
        let mut config = self.projection[node][0][profile[0]].clone();
        for p in 1..self.num_players {
            let contribution = &self.projection[node][p][profile[p]];
            for (j, f) in self.composers[node].iter().enumerate() {
                config[j] = f.compose(config[j], contribution[j]);
            }
        }
        self.payoffs[node]
            .get(&config)
            .cloned()
            .ok_or(AggError::ConfigurationNotFound { node, config })
    }

    /// Expected payoff to `player` from playing pure action `act` while
    /// everyone else follows the mixed profile `s`.
    pub fn action_payoff(&mut self, player: usize, act: usize, s: &[T]) -> Result<T> {
        self.check_player(player)?;
        self.check_action(act, self.actions[player])?;
        self.check_profile(s)?;
        let node = self.action_sets[player][act];
        self.project_profile(node, s);
        self.compute_pr(player, act, None);
        Ok(self.pr[self.num_players - 1].inner_prod(&self.payoffs[node]))
    }

    /// Expected payoff to `player` under the mixed profile `s`.
    pub fn mixed_payoff(&mut self, player: usize, s: &[T]) -> Result<T> {
        self.check_player(player)?;
        self.check_profile(s)?;
        let mut total = T::zero();
        for act in 0..self.actions[player] {
            let weight = s[self.strategy_offset[player] + act].clone();
            if weight > T::zero() {
                let node = self.action_sets[player][act];
                self.project_profile(node, s);
                self.compute_pr(player, act, None);
                total += weight * self.pr[self.num_players - 1].inner_prod(&self.payoffs[node]);
            }
        }
        Ok(total)
    }

    /// Expected payoff to `player` for each of its pure actions.
    pub fn payoff_vector(&mut self, player: usize, s: &[T]) -> Result<Vec<T>> {
        self.check_player(player)?;
        self.check_profile(s)?;
        (0..self.actions[player])
            .map(|act| self.action_payoff(player, act, s))
            .collect()
    }

    /// Like [`action_payoff`](Self::action_payoff), but with `p2` forced to
    /// play pure action `a2`. This is the Jacobian entry
    /// `∂ E[u_{p1}(a1)] / ∂ s[p2, a2]` used by homotopy solvers.
    pub fn jacobian_payoff(
        &mut self,
        p1: usize,
        a1: usize,
        p2: usize,
        a2: usize,
        s: &[T],
    ) -> Result<T> {
        self.check_player(p1)?;
        self.check_player(p2)?;
        self.check_action(a1, self.actions[p1])?;
        self.check_action(a2, self.actions[p2])?;
        self.check_profile(s)?;
        let node = self.action_sets[p1][a1];
        self.project_profile(node, s);
        self.compute_pr(p1, a1, Some((p2, a2)));
        Ok(self.pr[self.num_players - 1].inner_prod(&self.payoffs[node]))
    }

    /// Expected payoff to any one player of a symmetric game when every
    /// player follows the single mixed strategy `s` (indexed like player
    /// 0's action list).
    pub fn sym_mixed_payoff(&mut self, s: &[T]) -> Result<T> {
        self.check_symmetric()?;
        self.check_dist(s, self.actions[0])?;
        let mut total = T::zero();
        for act in 0..self.actions[0] {
            if s[act] > T::zero() {
                total += s[act].clone() * self.sym_action_payoff_inner(act, s)?;
            }
        }
        Ok(total)
    }

    /// Expected payoff for playing pure action `act` in a symmetric game
    /// while everyone else follows `s`.
    pub fn sym_action_payoff(&mut self, act: usize, s: &[T]) -> Result<T> {
        self.check_symmetric()?;
        self.check_action(act, self.actions[0])?;
        self.check_dist(s, self.actions[0])?;
        self.sym_action_payoff_inner(act, s)
    }

    /// The symmetric payoff for every action.
    pub fn sym_payoff_vector(&mut self, s: &[T]) -> Result<Vec<T>> {
        self.check_symmetric()?;
        self.check_dist(s, self.actions[0])?;
        (0..self.actions[0])
            .map(|act| self.sym_action_payoff_inner(act, s))
            .collect()
    }

    /// Expected payoff to a player of `class` under a k-symmetric profile:
    /// one mixed strategy per class, concatenated in class order (see
    /// [`first_ksym_action`](Self::first_ksym_action)).
    pub fn ksym_mixed_payoff(&mut self, class: usize, s: &[T]) -> Result<T> {
        self.check_class(class)?;
        self.check_dist(s, self.num_ksym_actions())?;
        let mut total = T::zero();
        for act in 0..self.unique_action_sets[class].len() {
            let weight = s[self.ksym_strategy_offset[class] + act].clone();
            if weight > T::zero() {
                total += weight * self.ksym_action_payoff_inner(class, act, s, None)?;
            }
        }
        Ok(total)
    }

    /// Expected payoff for a player of `class` playing pure action `act`
    /// under a k-symmetric profile.
    pub fn ksym_action_payoff(&mut self, class: usize, act: usize, s: &[T]) -> Result<T> {
        self.check_class(class)?;
        self.check_action(act, self.unique_action_sets[class].len())?;
        self.check_dist(s, self.num_ksym_actions())?;
        self.ksym_action_payoff_inner(class, act, s, None)
    }

    /// The k-symmetric payoff for every action of `class`.
    pub fn ksym_payoff_vector(&mut self, class: usize, s: &[T]) -> Result<Vec<T>> {
        self.check_class(class)?;
        self.check_dist(s, self.num_ksym_actions())?;
        (0..self.unique_action_sets[class].len())
            .map(|act| self.ksym_action_payoff_inner(class, act, s, None))
            .collect()
    }

    /// K-symmetric Jacobian entry: payoff for `class1` playing `act1` with
    /// one player of `class2` forced onto `act2`. Zero when `class1 ==
    /// class2` holds fewer than two players.
    pub fn ksym_jacobian_payoff(
        &mut self,
        class1: usize,
        act1: usize,
        class2: usize,
        act2: usize,
        s: &[T],
    ) -> Result<T> {
        self.check_class(class1)?;
        self.check_class(class2)?;
        self.check_action(act1, self.unique_action_sets[class1].len())?;
        self.check_action(act2, self.unique_action_sets[class2].len())?;
        self.check_dist(s, self.num_ksym_actions())?;
        if class1 == class2 && self.player_classes[class1].len() <= 1 {
            return Ok(T::zero());
        }
        self.ksym_action_payoff_inner(class1, act1, s, Some((class2, act2)))
    }

    /// Distribution over neighbor configurations of the node played by
    /// `own_class` at `act`, induced by the players of `pl_class` all
    /// following `s_class` (their class strategy). One player is withheld
    /// when `pl_class == own_class` (the focal player) and one more when
    /// `forced` names this class; the forced action is applied pure.
    pub fn sym_config_prob(
        &mut self,
        pl_class: usize,
        s_class: &[T],
        own_class: usize,
        act: usize,
        forced: Option<(usize, usize)>,
    ) -> Result<ConfigDistrib<T>> {
        self.check_class(pl_class)?;
        self.check_class(own_class)?;
        self.check_action(act, self.unique_action_sets[own_class].len())?;
        if let Some((class2, act2)) = forced {
            self.check_class(class2)?;
            self.check_action(act2, self.unique_action_sets[class2].len())?;
        }
        self.check_dist(s_class, self.unique_action_sets[pl_class].len())?;
        self.sym_config_prob_inner(pl_class, s_class, own_class, act, forced)
    }

    // ----- internals -------------------------------------------------

    fn sym_action_payoff_inner(&mut self, act: usize, s: &[T]) -> Result<T> {
        let node = self.action_sets[0][act];
        let n = self.num_players;

        if !self.is_pure[node] {
            // Function-node neighbors: trie arithmetic. One opponent
            // distribution raised to the (n-1)-th power, then the focal
            // player's own contribution fused into the inner product.
            if n == 1 {
                let config = self.projection[node][0][act].clone();
                return self.payoffs[node]
                    .get(&config)
                    .cloned()
                    .ok_or(AggError::ConfigurationNotFound { node, config });
            }
            self.project_player(node, 0, s);
            let (head, tail) = self.pr.split_at_mut(n - 1);
            let dest = &mut tail[0];
            self.projected_strat[node][0].power_into(
                n - 1,
                dest,
                &mut head[n - 2],
                &self.composers[node],
            );
            return Ok(dest.inner_prod_with_kernel(
                &self.projection[node][0][act],
                &self.composers[node],
                &self.payoffs[node],
            ));
        }

        // All neighbors are action nodes: integrate over compositions of
        // the n-1 opponents across the support, updating the multinomial
        // probability incrementally.
        let arity = self.neighbors[node].len();
        let mut support: Vec<Option<usize>> = Vec::new();
        let mut support_prob: Vec<T> = Vec::new();
        let mut null_prob = T::one();
        let mut covered = 0usize;
        let mut self_pos = None;
        for (idx, &w) in self.neighbors[node].iter().enumerate() {
            if w == node {
                self_pos = Some(idx);
            }
            if let Some(a) = self.node2action[w][0] {
                covered += 1;
                if s[a] > T::zero() {
                    support.push(Some(idx));
                    support_prob.push(s[a].clone());
                    null_prob = null_prob - s[a].clone();
                }
            }
        }
        if covered < self.actions[0] && null_prob > T::zero() {
            support.push(None);
            support_prob.push(null_prob);
        }
        if support.is_empty() {
            // Degenerate strategy with no mass anywhere relevant; the
            // opponents contribute nothing.
            let mut config = vec![0; arity];
            if let Some(pos) = self_pos {
                config[pos] += 1;
            }
            return self.payoffs[node]
                .get(&config)
                .cloned()
                .ok_or(AggError::ConfigurationNotFound { node, config });
        }

        let mut gc = GrayComposition::new((n - 1) as u32, support.len());
        let mut prob = support_prob[0].ipow((n - 1) as u32);
        let mut total = T::zero();
        loop {
            let comp = gc.get();
            let mut config = vec![0; arity];
            for (j, cat) in support.iter().enumerate() {
                if let Some(idx) = cat {
                    config[*idx] = comp[j];
                }
            }
            if let Some(pos) = self_pos {
                config[pos] += 1;
            }
            let u = self.payoffs[node]
                .get(&config)
                .ok_or(AggError::ConfigurationNotFound { node, config })?;
            total += prob.clone() * u.clone();

            gc.incr();
            if gc.eof() {
                break;
            }
            let comp = gc.get();
            prob = prob * T::from_usize(comp[gc.d] as usize + 1) * support_prob[gc.i].clone()
                / T::from_usize(comp[gc.i] as usize)
                / support_prob[gc.d].clone();
        }
        Ok(total)
    }

    fn ksym_action_payoff_inner(
        &mut self,
        class: usize,
        act: usize,
        s: &[T],
        forced: Option<(usize, usize)>,
    ) -> Result<T> {
        let node = self.unique_action_sets[class][act];
        let lo = self.ksym_strategy_offset[0];
        let hi = self.ksym_strategy_offset[1];
        let mut dist = self.sym_config_prob_inner(0, &s[lo..hi], class, act, forced)?;
        for pc in 1..self.player_classes.len() {
            let lo = self.ksym_strategy_offset[pc];
            let hi = self.ksym_strategy_offset[pc + 1];
            let part = self.sym_config_prob_inner(pc, &s[lo..hi], class, act, forced)?;
            dist.mul_assign_with(&part, &self.composers[node]);
        }
        Ok(dist.inner_prod(&self.payoffs[node]))
    }

    fn sym_config_prob_inner(
        &mut self,
        pl_class: usize,
        s_class: &[T],
        own_class: usize,
        act: usize,
        forced: Option<(usize, usize)>,
    ) -> Result<ConfigDistrib<T>> {
        let node = self.unique_action_sets[own_class][act];
        let rep = self.player_classes[pl_class][0];
        let arity = self.neighbors[node].len();

        let mut num_pl = self.player_classes[pl_class].len() as i64;
        if pl_class == own_class {
            num_pl -= 1;
        }
        let forced_here = forced.filter(|&(class2, _)| class2 == pl_class);
        if forced_here.is_some() {
            num_pl -= 1;
        }
        if num_pl < 0 {
            return Err(AggError::InvalidProfile(format!(
                "player class {} has too few players to withhold from",
                pl_class
            )));
        }
        let num_pl = num_pl as usize;

        if !self.is_pure[node] {
            self.project_player(node, rep, s_class);
            let mut dest = ConfigDistrib::new();
            if num_pl > 0 {
                self.projected_strat[node][rep].power_into(
                    num_pl,
                    &mut dest,
                    &mut self.pr[0],
                    &self.composers[node],
                );
            }
            if pl_class == own_class {
                let single = ConfigDistrib::singleton(self.projection[node][rep][act].clone());
                if dest.is_empty() {
                    dest = single;
                } else {
                    dest.mul_assign_with(&single, &self.composers[node]);
                }
            }
            if let Some((_, act2)) = forced_here {
                let single = ConfigDistrib::singleton(self.projection[node][rep][act2].clone());
                if dest.is_empty() {
                    dest = single;
                } else {
                    dest.mul_assign_with(&single, &self.composers[node]);
                }
            }
            return Ok(dest);
        }

        // Pure node: enumerate compositions of the class over the support.
        let mut support: Vec<Option<usize>> = Vec::new();
        let mut support_prob: Vec<T> = Vec::new();
        let mut null_prob = T::one();
        let mut self_pos = None;
        let mut forced_pos = None;
        for (idx, &w) in self.neighbors[node].iter().enumerate() {
            if w == node {
                self_pos = Some(idx);
            }
            if let Some((class2, act2)) = forced {
                if w == self.unique_action_sets[class2][act2] {
                    forced_pos = Some(idx);
                }
            }
            if let Some(a) = self.node2action[w][rep] {
                if s_class[a] > T::zero() {
                    support.push(Some(idx));
                    support_prob.push(s_class[a].clone());
                    null_prob = null_prob - s_class[a].clone();
                }
            }
        }
        if null_prob > T::zero() {
            support.push(None);
            support_prob.push(null_prob);
        }

        let mut dest = ConfigDistrib::new();
        let base_config = |comp: &[u32]| -> Config {
            let mut config = vec![0; arity];
            for (j, cat) in support.iter().enumerate() {
                if let Some(idx) = cat {
                    config[*idx] = comp[j];
                }
            }
            if pl_class == own_class {
                if let Some(pos) = self_pos {
                    config[pos] += 1;
                }
            }
            if forced_here.is_some() {
                if let Some(pos) = forced_pos {
                    config[pos] += 1;
                }
            }
            config
        };

        if support.is_empty() {
            dest.add(base_config(&[]), T::one());
            return Ok(dest);
        }

        let mut gc = GrayComposition::new(num_pl as u32, support.len());
        let mut prob = support_prob[0].ipow(num_pl as u32);
        loop {
            dest.add(base_config(gc.get()), prob.clone());
            gc.incr();
            if gc.eof() {
                break;
            }
            let comp = gc.get();
            prob = prob * T::from_usize(comp[gc.d] as usize + 1) * support_prob[gc.i].clone()
                / T::from_usize(comp[gc.i] as usize)
                / support_prob[gc.d].clone();
        }
        Ok(dest)
    }

    /// Writes every player's marginal from `s` into the projected-strategy
    /// scratch of `node`.
    fn project_profile(&mut self, node: usize, s: &[T]) {
        for p in 0..self.num_players {
            let lo = self.strategy_offset[p];
            let hi = self.strategy_offset[p + 1];
            self.project_player(node, p, &s[lo..hi]);
        }
    }

    /// Writes one player's marginal (a local strategy slice) into the
    /// projected-strategy scratch of `node`.
    fn project_player(&mut self, node: usize, player: usize, strategy: &[T]) {
        let proj = &self.projection[node][player];
        let dist = &mut self.projected_strat[node][player];
        dist.reset();
        for (j, w) in strategy.iter().enumerate() {
            if *w > T::zero() {
                dist.add(proj[j].clone(), w.clone());
            }
        }
    }

    /// Chains the per-player distributions at the node of
    /// `(player, act)` in `porder` order into `pr[n-1]`. When `forced`
    /// names a player, its slot multiplies a pure singleton instead of its
    /// projected strategy.
    fn compute_pr(&mut self, player: usize, act: usize, forced: Option<(usize, usize)>) {
        let node = self.action_sets[player][act];
        let composers = &self.composers[node];
        self.pr[0].reset();
        self.pr[0].add(self.projection[node][player][act].clone(), T::one());
        for k in 1..self.num_players {
            let q = self.porder[player][act][k];
            let (head, tail) = self.pr.split_at_mut(k);
            let prev = &head[k - 1];
            let dest = &mut tail[0];
            match forced {
                Some((p2, a2)) if q == p2 => {
                    let single =
                        ConfigDistrib::singleton(self.projection[node][p2][a2].clone());
                    dest.assign_product(prev, &single, composers);
                }
                _ => {
                    dest.assign_product(prev, &self.projected_strat[node][q], composers);
                }
            }
        }
    }

    fn check_player(&self, player: usize) -> Result<()> {
        if player >= self.num_players {
            return Err(AggError::PlayerOutOfRange {
                player,
                num_players: self.num_players,
            });
        }
        Ok(())
    }

    fn check_class(&self, class: usize) -> Result<()> {
        if class >= self.player_classes.len() {
            return Err(AggError::PlayerOutOfRange {
                player: class,
                num_players: self.player_classes.len(),
            });
        }
        Ok(())
    }

    fn check_action(&self, action: usize, num_actions: usize) -> Result<()> {
        if action >= num_actions {
            return Err(AggError::ActionOutOfRange {
                action,
                num_actions,
            });
        }
        Ok(())
    }

    fn check_symmetric(&self) -> Result<()> {
        if !self.is_symmetric() {
            return Err(AggError::NotSymmetric);
        }
        Ok(())
    }

    fn check_profile(&self, s: &[T]) -> Result<()> {
        self.check_dist(s, self.total_actions)
    }

    fn check_dist(&self, s: &[T], expected: usize) -> Result<()> {
        if s.len() != expected {
            return Err(AggError::InvalidProfile(format!(
                "profile has length {}, expected {}",
                s.len(),
                expected
            )));
        }
        if let Some(idx) = s.iter().position(|w| *w < T::zero()) {
            return Err(AggError::InvalidProfile(format!(
                "negative probability at index {}",
                idx
            )));
        }
        Ok(())
    }
}
