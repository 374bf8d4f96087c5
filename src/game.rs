//! Two player games on a single board

use anyhow::{anyhow, Result};
use log::debug;

use std::io::{BufRead, Write};

use crate::{
    display::{draw, Player},
    position::Position,
    HEIGHT, WIDTH,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// A game in progress, keeping the moves played so far
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    history: String,
    state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self {
            position: Position::new(),
            history: String::new(),
            state: GameState::Playing,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The player to move
    pub fn player(&self) -> Player {
        Player::to_move(self.position.nb_moves())
    }

    /// The moves played so far as 1-based column digits
    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Plays a 1-based column for the player to move, returning the new state of the game
    pub fn play_checked(&mut self, column_one_indexed: usize) -> Result<GameState> {
        if self.state != GameState::Playing {
            return Err(anyhow!("Invalid move, the game is over"));
        }
        if column_one_indexed < 1 || column_one_indexed > WIDTH {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column_one_indexed,
                WIDTH
            ));
        }
        let column = column_one_indexed - 1;
        if !self.position.can_play(column) {
            return Err(anyhow!("Invalid move, column {} full", column_one_indexed));
        }

        let player = self.player();
        let winning = self.position.is_winning_move(column);
        self.position.play_column(column);
        self.history.push_str(&column_one_indexed.to_string());

        self.state = if winning {
            match player {
                Player::One => GameState::PlayerOneWin,
                Player::Two => GameState::PlayerTwoWin,
            }
        } else if self.position.nb_moves() == WIDTH * HEIGHT {
            GameState::Draw
        } else {
            GameState::Playing
        };
        debug!("player {} played column {}: {:?}", player, column_one_indexed, self.state);

        Ok(self.state)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a game between two humans, reading one column per line
///
/// Returns the final state, which is still [`GameState::Playing`] if the input ended early.
pub fn human_vs_human<R: BufRead, W: Write>(input: R, output: &mut W) -> Result<GameState> {
    let mut game = Game::new();

    draw(output, game.position(), game.player())?;
    writeln!(output, "Player {} turn, make a move (1-{}):", game.player(), WIDTH)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        let column = match line.parse::<usize>() {
            Ok(column) if line.len() == 1 => column,
            _ => {
                writeln!(output, "Invalid input: must be a single digit from 1 to {}", WIDTH)?;
                continue;
            }
        };

        let state = match game.play_checked(column) {
            Ok(state) => state,
            Err(err) => {
                // try the move again
                writeln!(output, "{}", err)?;
                continue;
            }
        };

        draw(output, game.position(), game.player())?;
        match state {
            GameState::Playing => writeln!(output, "Player {} turn:", game.player())?,
            GameState::PlayerOneWin => {
                writeln!(output, "Player 1 wins!")?;
                return Ok(state);
            }
            GameState::PlayerTwoWin => {
                writeln!(output, "Player 2 wins!")?;
                return Ok(state);
            }
            GameState::Draw => {
                writeln!(output, "Draw!")?;
                return Ok(state);
            }
        }
    }

    Ok(game.state())
}
