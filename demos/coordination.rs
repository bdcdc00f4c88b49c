//! A two-player coordination game, parsed from the AGG text format.
//!
//! Both players pick one of two meeting spots. Each spot is an action node
//! whose payoff table sees the attendance of both spots: coordinating pays
//! 2, miscoordinating pays 0.
//!
//! Run with: `cargo run --example coordination`

use agg::AggGame;

const GAME: &str = "\
# two players, two shared meeting spots
2 2 0
2 2
0 1
0 1
# each spot observes both attendance counts
2 0 1
2 0 1
# spot 0: worth 2 only when both show up there
1 2
[ 2 0 ] 2
[ 1 1 ] 0
# spot 1: worth 2 only when both show up there
1 2
[ 0 2 ] 2
[ 1 1 ] 0
";

fn main() {
    println!("Coordination game");
    println!("=================");
    println!();

    let mut game: AggGame<f64> = AggGame::from_agg_text(GAME).expect("valid game file");
    let stats = game.stats();
    println!(
        "{} players, {} action nodes, {} payoff entries",
        stats.num_players, stats.num_action_nodes, stats.payoff_entries
    );
    println!();

    println!("Pure profiles:");
    for a0 in 0..2 {
        for a1 in 0..2 {
            let u0 = game.pure_payoff(0, &[a0, a1]).unwrap();
            let u1 = game.pure_payoff(1, &[a0, a1]).unwrap();
            println!("  spots ({}, {}): payoffs ({}, {})", a0, a1, u0, u1);
        }
    }
    println!();

    // Expected payoffs when both players mix.
    println!("Both players mixing p on spot 0:");
    for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let s = [p, 1.0 - p, p, 1.0 - p];
        let value = game.mixed_payoff(0, &s).unwrap();
        println!("  p = {:.2}: expected payoff {:.4}", p, value);
    }
    println!();

    // The game is symmetric, so the single-strategy oracle agrees.
    let sym = game.sym_mixed_payoff(&[0.5, 0.5]).unwrap();
    println!("Symmetric oracle at p = 0.50: {:.4}", sym);
    println!();
    println!("The uniform mixture is the (inefficient) symmetric equilibrium:");
    println!("both pure coordination profiles pay 2, mixing pays {:.2}.", sym);
}
