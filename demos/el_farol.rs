//! The El Farol bar game, built in memory.
//!
//! Five patrons decide between going to the bar (action node 0) and
//! staying home (action node 1). The bar's payoff falls with attendance;
//! staying home is a constant. The demo sweeps the symmetric mixture and
//! locates the indifference point.
//!
//! Run with: `cargo run --example el_farol`

use agg::{AggGame, GameConfig, PayoffInput};

const PATRONS: usize = 5;

fn build() -> AggGame<f64> {
    // Going to the bar pays 6 minus the attendance (self included);
    // staying home always pays 3. Node 0's neighborhood is itself, node
    // 1 needs no neighbors at all.
    let bar_payoffs: Vec<_> = (1..=PATRONS)
        .map(|attendance| (vec![attendance as u32], 6.0 - attendance as f64))
        .collect();
    let config = GameConfig {
        num_players: PATRONS,
        num_action_nodes: 2,
        num_function_nodes: 0,
        action_sets: vec![vec![0, 1]; PATRONS],
        neighbors: vec![vec![0], vec![]],
        functions: vec![],
        payoffs: vec![
            PayoffInput::Mapping(bar_payoffs),
            PayoffInput::Mapping(vec![(vec![], 3.0)]),
        ],
    };
    AggGame::new(config).expect("valid game")
}

fn main() {
    println!("El Farol bar game ({} patrons)", PATRONS);
    println!("==============================");
    println!();

    let mut game = build();
    println!(
        "payoff range: {:?} to {:?}",
        game.min_payoff().unwrap(),
        game.max_payoff().unwrap()
    );
    println!();

    println!("Everyone goes:      bar pays {}", game.pure_payoff(0, &[0; PATRONS]).unwrap());
    println!(
        "Only patron 0 goes: bar pays {}",
        game.pure_payoff(0, &[0, 1, 1, 1, 1]).unwrap()
    );
    println!();

    println!("Symmetric mixture sweep (p = probability of going):");
    println!("  p      go      stay");
    let mut best = (0.0, f64::MAX);
    for step in 0..=20 {
        let p = step as f64 / 20.0;
        let payoffs = game.sym_payoff_vector(&[p, 1.0 - p]).unwrap();
        let gap = (payoffs[0] - payoffs[1]).abs();
        if gap < best.1 {
            best = (p, gap);
        }
        println!("  {:.2}  {:6.3}  {:6.3}", p, payoffs[0], payoffs[1]);
    }
    println!();
    println!(
        "Indifference (symmetric equilibrium) near p = {:.2}: going and \
         staying are equally attractive there.",
        best.0
    );
}
