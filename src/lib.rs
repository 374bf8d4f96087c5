//! An exact solver for the board game 'Connect 4'
//!
//! Positions are stored as a pair of bitboards and scored by a negamax
//! search with alpha-beta pruning, either exactly ("strong") or only
//! as win/draw/loss ("weak").
//!
//! # Basic Usage
//!
//! ```
//! use connect4_solver::{position::Position, solver::{Mode, Solver}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let position = Position::from_moves("112233")?;
//! let mut solver = Solver::new();
//!
//! assert_eq!(solver.solve(&position, Mode::Strong), 18);
//! assert_eq!(solver.solve(&position, Mode::Weak), 1);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod position;

pub mod solver;

pub mod display;

pub mod game;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
// every column must be addressable by a single digit in move sequences
const_assert!(WIDTH < 10);
