//! Reading and writing the AGG text format.
//!
//! The format is whitespace-separated ASCII: player/node counts, action
//! sets, neighbor lists, function-node descriptors, then one payoff table
//! per action node (COMPLETE values in acceptance order, or MAPPING
//! `[ configuration ] value` pairs). `#` starts a comment running to the
//! end of the line and may appear between any two tokens.
//!
//! Payoff sections can only be decoded against the acceptance sets, so the
//! reader interleaves with construction: it parses the topology, runs the
//! setup computations, and then consumes the payoff sections knowing how
//! many values each node requires.

use crate::distrib::Config;
use crate::error::{AggError, Result};
use crate::game::builder::GameBuilder;
use crate::game::oracle::AggGame;
use crate::proj::ProjFunc;
use crate::scalar::AggNumber;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tok<'a> {
    Word(&'a str),
    LBracket,
    RBracket,
}

struct Parser<'a> {
    tokens: Vec<(Tok<'a>, usize, usize)>,
    pos: usize,
    end: (usize, usize),
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut line = 1;
        let mut col = 1;
        let mut word_start: Option<(usize, usize, usize)> = None;
        let mut in_comment = false;
        for (idx, c) in input.char_indices() {
            if in_comment {
                if c == '\n' {
                    in_comment = false;
                }
            } else if c == '#' {
                if let Some((start, l, co)) = word_start.take() {
                    tokens.push((Tok::Word(&input[start..idx]), l, co));
                }
                in_comment = true;
            } else if c.is_whitespace() || c == '[' || c == ']' {
                if let Some((start, l, co)) = word_start.take() {
                    tokens.push((Tok::Word(&input[start..idx]), l, co));
                }
                if c == '[' {
                    tokens.push((Tok::LBracket, line, col));
                } else if c == ']' {
                    tokens.push((Tok::RBracket, line, col));
                }
            } else if word_start.is_none() {
                word_start = Some((idx, line, col));
            }
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        if let Some((start, l, co)) = word_start {
            tokens.push((Tok::Word(&input[start..]), l, co));
        }
        Parser {
            tokens,
            pos: 0,
            end: (line, col),
        }
    }

    fn parse_err(&self, line: usize, column: usize, message: String) -> AggError {
        AggError::Parse {
            line,
            column,
            message,
        }
    }

    fn next(&mut self, what: &str) -> Result<(Tok<'a>, usize, usize)> {
        match self.tokens.get(self.pos) {
            Some(&t) => {
                self.pos += 1;
                Ok(t)
            }
            None => Err(self.parse_err(
                self.end.0,
                self.end.1,
                format!("unexpected end of input while reading {}", what),
            )),
        }
    }

    fn expect_usize(&mut self, what: &str) -> Result<usize> {
        let (tok, line, col) = self.next(what)?;
        match tok {
            Tok::Word(w) => w.parse().map_err(|_| {
                self.parse_err(line, col, format!("expected {} (an integer), got '{}'", what, w))
            }),
            Tok::LBracket => Err(self.parse_err(line, col, format!("expected {}, got '['", what))),
            Tok::RBracket => Err(self.parse_err(line, col, format!("expected {}, got ']'", what))),
        }
    }

    fn expect_u32(&mut self, what: &str) -> Result<u32> {
        let value = self.expect_usize(what)?;
        u32::try_from(value).map_err(|_| {
            let (line, col) = self.last_pos();
            self.parse_err(line, col, format!("{} out of range: {}", what, value))
        })
    }

    fn expect_scalar<T: AggNumber>(&mut self, what: &str) -> Result<T> {
        let (tok, line, col) = self.next(what)?;
        match tok {
            Tok::Word(w) => T::parse_token(w).ok_or_else(|| {
                self.parse_err(line, col, format!("expected {} (a number), got '{}'", what, w))
            }),
            _ => Err(self.parse_err(line, col, format!("expected {} (a number)", what))),
        }
    }

    fn expect_lbracket(&mut self) -> Result<()> {
        let (tok, line, col) = self.next("'['")?;
        if tok != Tok::LBracket {
            return Err(self.parse_err(line, col, "expected '['".into()));
        }
        Ok(())
    }

    fn expect_rbracket(&mut self) -> Result<()> {
        let (tok, line, col) = self.next("']'")?;
        if tok != Tok::RBracket {
            return Err(self.parse_err(line, col, "expected ']'".into()));
        }
        Ok(())
    }

    fn last_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|&(_, l, c)| (l, c))
            .unwrap_or(self.end)
    }
}

/// Parses a game from the AGG text format.
pub fn parse_game<T: AggNumber>(input: &str) -> Result<AggGame<T>> {
    let mut p = Parser::new(input);

    let num_players = p.expect_usize("the number of players")?;
    let num_action_nodes = p.expect_usize("the number of action nodes")?;
    let num_function_nodes = p.expect_usize("the number of function nodes")?;
    if num_players == 0 {
        let (line, col) = p.last_pos();
        return Err(p.parse_err(line, col, "a game needs at least one player".into()));
    }

    let mut sizes = Vec::with_capacity(num_players);
    for player in 0..num_players {
        sizes.push(p.expect_usize(&format!("the size of player {}'s action set", player))?);
    }

    let mut action_sets = Vec::with_capacity(num_players);
    for (player, &size) in sizes.iter().enumerate() {
        let mut set = Vec::with_capacity(size);
        for a in 0..size {
            let node =
                p.expect_usize(&format!("action {} of player {}", a, player))?;
            if node >= num_action_nodes {
                let (line, col) = p.last_pos();
                return Err(p.parse_err(
                    line,
                    col,
                    format!(
                        "action node index {} of player {} out of range (must be < {})",
                        node, player, num_action_nodes
                    ),
                ));
            }
            set.push(node);
        }
        action_sets.push(set);
    }

    let num_nodes = num_action_nodes + num_function_nodes;
    let mut neighbors = Vec::with_capacity(num_nodes);
    for node in 0..num_nodes {
        let count = p.expect_usize(&format!("the neighbor count of node {}", node))?;
        let mut list = Vec::with_capacity(count);
        for j in 0..count {
            let w = p.expect_usize(&format!("neighbor {} of node {}", j, node))?;
            if w >= num_nodes {
                let (line, col) = p.last_pos();
                return Err(p.parse_err(
                    line,
                    col,
                    format!("neighbor index {} of node {} out of range", w, node),
                ));
            }
            list.push(w);
        }
        neighbors.push(list);
    }

    let mut functions = Vec::with_capacity(num_function_nodes);
    for g in 0..num_function_nodes {
        let tag = p.expect_usize(&format!("the type of function node {}", g))?;
        let func = match tag {
            0 => ProjFunc::Sum,
            1 => ProjFunc::Exist,
            2 => ProjFunc::Match {
                target: p.expect_u32(&format!("the match target of function node {}", g))?,
            },
            3 => {
                let modulus = p.expect_u32(&format!("the modulus of function node {}", g))?;
                if modulus == 0 {
                    let (line, col) = p.last_pos();
                    return Err(p.parse_err(
                        line,
                        col,
                        format!("function node {} has modulus 0", g),
                    ));
                }
                ProjFunc::SumMod { modulus }
            }
            4 => {
                let exponent = p.expect_u32(&format!("the exponent of function node {}", g))?;
                if exponent == 0 {
                    let (line, col) = p.last_pos();
                    return Err(p.parse_err(
                        line,
                        col,
                        format!("function node {} has exponent 0", g),
                    ));
                }
                ProjFunc::Power { exponent }
            }
            _ => {
                let (line, col) = p.last_pos();
                return Err(p.parse_err(
                    line,
                    col,
                    format!("unknown projection function tag {}", tag),
                ));
            }
        };
        functions.push(func);
    }

    let builder: GameBuilder<T> = GameBuilder::new(
        num_players,
        num_action_nodes,
        num_function_nodes,
        action_sets,
        neighbors.clone(),
        functions,
    )?;

    let mut tables = Vec::with_capacity(num_action_nodes);
    for node in 0..num_action_nodes {
        let tag = p.expect_usize(&format!("the payoff type of action node {}", node))?;
        let table = match tag {
            0 => {
                // COMPLETE: one value per acceptance configuration, in
                // ascending key order.
                let count = builder.acceptance(node).len();
                let mut values = Vec::with_capacity(count);
                for j in 0..count {
                    values.push(
                        p.expect_scalar::<T>(&format!("payoff {} of action node {}", j, node))?,
                    );
                }
                crate::distrib::PayoffTable::from_complete(
                    node,
                    builder.acceptance(node).iter().cloned(),
                    values,
                )?
            }
            1 => {
                // MAPPING: an entry count, then bracketed pairs.
                let arity = neighbors[node].len();
                let count =
                    p.expect_usize(&format!("the entry count for action node {}", node))?;
                let mut pairs = Vec::with_capacity(count);
                for _ in 0..count {
                    p.expect_lbracket()?;
                    let mut config: Config = Vec::with_capacity(arity);
                    for j in 0..arity {
                        config.push(p.expect_u32(&format!(
                            "element {} of a configuration of action node {}",
                            j, node
                        ))?);
                    }
                    p.expect_rbracket()?;
                    let value = p.expect_scalar::<T>(&format!(
                        "the payoff value for a configuration of action node {}",
                        node
                    ))?;
                    pairs.push((config, value));
                }
                crate::distrib::PayoffTable::from_mapping(
                    node,
                    builder.acceptance(node).iter(),
                    pairs,
                )?
            }
            _ => {
                let (line, col) = p.last_pos();
                return Err(p.parse_err(line, col, format!("unknown payoff type {}", tag)));
            }
        };
        tables.push(table);
    }

    Ok(builder.finish(tables))
}

impl<T: AggNumber> AggGame<T> {
    /// Parses a game from the AGG text format.
    pub fn from_agg_text(input: &str) -> Result<Self> {
        parse_game(input)
    }

    /// Serializes the game back to the AGG text format.
    ///
    /// Payoff tables are written in MAPPING form with keys in ascending
    /// order, so `parse_game(game.to_agg_text())` reconstructs an
    /// equivalent game.
    pub fn to_agg_text(&self) -> String {
        let mut out = String::new();
        out.push_str("# players, action nodes, function nodes\n");
        out.push_str(&format!(
            "{}\n{}\n{}\n",
            self.num_players, self.num_action_nodes, self.num_function_nodes
        ));

        let sizes: Vec<String> = self.actions.iter().map(|a| a.to_string()).collect();
        out.push_str(&sizes.join(" "));
        out.push('\n');

        for set in &self.action_sets {
            let line: Vec<String> = set.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }

        for list in &self.neighbors {
            out.push_str(&list.len().to_string());
            for w in list {
                out.push_str(&format!(" {}", w));
            }
            out.push('\n');
        }

        for func in &self.functions {
            match func.param() {
                Some(param) => out.push_str(&format!("{} {}\n", func.tag(), param)),
                None => out.push_str(&format!("{}\n", func.tag())),
            }
        }

        for (node, table) in self.payoffs.iter().enumerate() {
            out.push_str(&format!("# payoffs for action node {}\n", node));
            out.push_str(&format!("1\n{}\n", table.len()));
            for (config, value) in table.iter() {
                out.push('[');
                for (j, c) in config.iter().enumerate() {
                    if j > 0 {
                        out.push(' ');
                    }
                    out.push_str(&c.to_string());
                }
                out.push_str(&format!("] {}\n", value));
            }
        }

        out
    }
}
