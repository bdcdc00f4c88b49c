//! Performance benchmarks for the AGG payoff oracle.
//!
//! Run with: cargo bench
//!
//! These benchmarks track construction and oracle throughput on congestion
//! games of growing size to detect performance regressions early.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use agg::{parse_game, AggGame, GameConfig, PayoffInput, ProjFunc};

/// A symmetric congestion game: every facility's payoff is 10 minus its
/// own attendance. All nodes are pure, so the symmetric oracle takes the
/// Gray-code path.
fn congestion_game(players: usize, facilities: usize) -> AggGame<f64> {
    let payoffs = (0..facilities)
        .map(|_| {
            PayoffInput::Mapping(
                (1..=players)
                    .map(|count| (vec![count as u32], 10.0 - count as f64))
                    .collect(),
            )
        })
        .collect();
    let config = GameConfig {
        num_players: players,
        num_action_nodes: facilities,
        num_function_nodes: 0,
        action_sets: vec![(0..facilities).collect(); players],
        neighbors: (0..facilities).map(|v| vec![v]).collect(),
        functions: vec![],
        payoffs,
    };
    AggGame::new(config).expect("valid congestion game")
}

/// The same game with a SUM function node over all facilities added to
/// every neighborhood, forcing the symmetric oracle onto the trie path.
fn congestion_game_with_sum(players: usize, facilities: usize) -> AggGame<f64> {
    let sum_node = facilities;
    let payoffs = (0..facilities)
        .map(|_| {
            PayoffInput::Mapping(
                (1..=players)
                    .map(|count| {
                        (vec![count as u32, players as u32], 10.0 - count as f64)
                    })
                    .collect(),
            )
        })
        .collect();
    let mut neighbors: Vec<Vec<usize>> = (0..facilities).map(|v| vec![v, sum_node]).collect();
    neighbors.push((0..facilities).collect());
    let config = GameConfig {
        num_players: players,
        num_action_nodes: facilities,
        num_function_nodes: 1,
        action_sets: vec![(0..facilities).collect(); players],
        neighbors,
        functions: vec![ProjFunc::Sum],
        payoffs,
    };
    AggGame::new(config).expect("valid game")
}

/// A random profile: per-player uniform draws, normalized.
fn random_profile(rng: &mut SmallRng, players: usize, actions: usize) -> Vec<f64> {
    let mut s = Vec::with_capacity(players * actions);
    for _ in 0..players {
        let draws: Vec<f64> = (0..actions).map(|_| rng.gen::<f64>() + 1e-3).collect();
        let total: f64 = draws.iter().sum();
        s.extend(draws.into_iter().map(|d| d / total));
    }
    s
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for &(players, facilities) in &[(4, 3), (6, 4), (8, 5)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}p_{}f", players, facilities)),
            &(players, facilities),
            |b, &(players, facilities)| {
                b.iter(|| congestion_game(black_box(players), black_box(facilities)));
            },
        );
    }
    group.finish();
}

fn bench_mixed_payoff(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut game = congestion_game(6, 4);
    let s = random_profile(&mut rng, 6, 4);
    c.bench_function("mixed_payoff_6p_4f", |b| {
        b.iter(|| game.mixed_payoff(0, black_box(&s)).unwrap());
    });
}

fn bench_payoff_vector(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut game = congestion_game(6, 4);
    let s = random_profile(&mut rng, 6, 4);
    c.bench_function("payoff_vector_6p_4f", |b| {
        b.iter(|| game.payoff_vector(0, black_box(&s)).unwrap());
    });
}

fn bench_jacobian(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(13);
    let mut game = congestion_game(6, 4);
    let s = random_profile(&mut rng, 6, 4);
    c.bench_function("jacobian_6p_4f", |b| {
        b.iter(|| game.jacobian_payoff(0, 0, 3, 2, black_box(&s)).unwrap());
    });
}

fn bench_sym_gray_path(c: &mut Criterion) {
    let mut game = congestion_game(8, 5);
    let s = [0.3, 0.25, 0.2, 0.15, 0.1];
    c.bench_function("sym_mixed_gray_8p_5f", |b| {
        b.iter(|| game.sym_mixed_payoff(black_box(&s)).unwrap());
    });
}

fn bench_sym_trie_path(c: &mut Criterion) {
    let mut game = congestion_game_with_sum(8, 5);
    let s = [0.3, 0.25, 0.2, 0.15, 0.1];
    c.bench_function("sym_mixed_trie_8p_5f", |b| {
        b.iter(|| game.sym_mixed_payoff(black_box(&s)).unwrap());
    });
}

fn bench_parse(c: &mut Criterion) {
    let text = congestion_game(6, 4).to_agg_text();
    c.bench_function("parse_6p_4f", |b| {
        b.iter(|| parse_game::<f64>(black_box(&text)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_mixed_payoff,
    bench_payoff_vector,
    bench_jacobian,
    bench_sym_gray_path,
    bench_sym_trie_path,
    bench_parse,
);

criterion_main!(benches);
