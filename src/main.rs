use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;

use std::cmp::Ordering;
use std::io::{stdin, stdout};
use std::time::Instant;

use connect4_solver::{
    display::{draw, Player},
    game::human_vs_human,
    position::Position,
    solver::{best_of, moves_to_win, Mode, Solver},
};

/// Position solved when no moves are given
const SAMPLE_POSITION: &str = "44444433";

/// Exact solver for Connect 4 positions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Moves leading to the position, as 1-based column digits
    #[arg(default_value = SAMPLE_POSITION)]
    moves: String,
    /// Only compute whether the position is won, drawn or lost
    #[arg(long)]
    weak: bool,
    /// Search the most promising moves first
    #[arg(long)]
    ordered: bool,
    /// Score every move of the position instead of the position itself
    #[arg(long)]
    analyse: bool,
    /// Play a game between two humans instead of solving
    #[arg(long)]
    play: bool,
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(args.log_level)?;

    if args.play {
        let state = human_vs_human(stdin().lock(), &mut stdout())?;
        info!("game finished: {:?}", state);
        return Ok(());
    }

    let mut position = Position::new();
    let played = position.play(&args.moves);
    if played != args.moves.chars().count() {
        return Err(anyhow!(
            "invalid move sequence '{}', stopped after {} moves",
            args.moves,
            played
        ));
    }

    let player = Player::to_move(position.nb_moves());
    draw(&mut stdout(), &position, player)?;

    let mode = if args.weak { Mode::Weak } else { Mode::Strong };
    let mut solver = Solver::new().with_move_ordering(args.ordered);
    let start_time = Instant::now();

    if args.analyse {
        let scores = solver.analyse(&position, mode);
        for (column, score) in scores.iter().enumerate() {
            match score {
                Some(score) => info!("column {}: {}", column + 1, score),
                None => info!("column {}: full", column + 1),
            }
        }
        if let Some((column, score)) = best_of(&scores) {
            info!("best move: {} (score {})", column + 1, score);
        }
    } else {
        let score = solver.solve(&position, mode);
        info!("score: {}", score);

        if mode == Mode::Strong {
            let distance = moves_to_win(&position, score);
            let move_string = if distance == 1 { "move" } else { "moves" };
            match score.cmp(&0) {
                Ordering::Greater => info!(
                    "player {} can force a win in at most {} {}",
                    player, distance, move_string
                ),
                Ordering::Less => info!(
                    "player {} can force a win in at most {} {}",
                    player.opponent(),
                    distance,
                    move_string
                ),
                Ordering::Equal => info!(
                    "player {} can at best force a draw, {} {} remaining",
                    player, distance, move_string
                ),
            }
        }
    }

    info!(
        "searched {} nodes in {:.3}s",
        solver.node_count,
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
