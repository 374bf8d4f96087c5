//! Rendering of positions for the terminal

use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::fmt;
use std::io::Write;

use crate::{
    position::{Cell, Position},
    HEIGHT, WIDTH,
};

/// One of the two players, player one moves first
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The player to move after `moves` moves have been played
    pub fn to_move(moves: usize) -> Self {
        if moves % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn marker(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }

    fn color(self) -> Color {
        match self {
            Player::One => Color::Red,
            Player::Two => Color::Yellow,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "1"),
            Player::Two => write!(f, "2"),
        }
    }
}

// `current` is the player whose tiles are stored in the position's current mask
fn owner(position: &Position, column: usize, row: usize, current: Player) -> Option<Player> {
    match position.cell(column, row) {
        Cell::Current => Some(current),
        Cell::Opponent => Some(current.opponent()),
        Cell::Empty => None,
    }
}

fn column_header() -> String {
    let mut header: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    header.push('\n');
    header
}

/// Plain text board, top row first, `.` for empty cells
pub fn board_string(position: &Position, current: Player) -> String {
    let mut board = column_header();
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            board.push(owner(position, column, row, current).map_or('.', Player::marker));
        }
        board.push('\n');
    }
    board
}

/// Draws the board with coloured tiles
pub fn draw<W: Write>(out: &mut W, position: &Position, current: Player) -> Result<()> {
    out.queue(PrintStyledContent(style(column_header())))?;
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            out.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match owner(position, column, row, current) {
                        Some(player) => player.color(),
                        None => Color::DarkBlue,
                    }),
            ))?;
        }
        out.queue(PrintStyledContent(style("\n")))?;
    }
    out.flush()?;
    Ok(())
}
