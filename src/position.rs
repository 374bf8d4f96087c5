//! Bitboard encoding of a Connect 4 position
//!
//! Each column is stored on `HEIGHT + 1` bits, the extra bit on top of every
//! column is always empty so that carries never leak into the next column.
//! For the standard 7x6 board the bit indices are:
//!
//! ```text
//!  .  .  .  .  .  .  .
//!  5 12 19 26 33 40 47
//!  4 11 18 25 32 39 46
//!  3 10 17 24 31 38 45
//!  2  9 16 23 30 37 44
//!  1  8 15 22 29 36 43
//!  0  7 14 21 28 35 42
//! ```
//!
//! All queries are relative to the player whose turn it is. Positions that
//! already contain an alignment of four are not supported.

use anyhow::{anyhow, Result};

use crate::{HEIGHT, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

const BOTTOM_MASK: u64 = static_masks::bottom_mask();
const BOARD_MASK: u64 = static_masks::full_board_mask();

/// The owner of a single cell, seen from the player to move
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Current,
    Opponent,
    Empty,
}

/// A Connect 4 position
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    // mask of the current player's tiles
    current_position: u64,
    // mask of all tiles
    mask: u64,
    moves: usize,
}

impl Position {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            current_position: 0,
            mask: 0,
            moves: 0,
        }
    }

    /// Creates a position directly from its bitboards
    pub fn from_parts(current_position: u64, mask: u64, moves: usize) -> Self {
        debug_assert_eq!(current_position & !mask, 0, "current player tiles outside of mask");
        debug_assert_eq!(mask & !BOARD_MASK, 0, "tiles set on guard bits");
        debug_assert_eq!(mask.count_ones() as usize, moves, "move count does not match mask");
        Self {
            current_position,
            mask,
            moves,
        }
    }

    /// Creates a position from a sequence of 1-based column digits
    ///
    /// Unlike [`play`](Position::play), every move of the sequence must be
    /// applied or an error describing the first rejected move is returned.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut position = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    let column = column - 1;
                    if !position.can_play(column) {
                        return Err(anyhow!("Invalid move, column {} full", column + 1));
                    }
                    // abort if the position is won at any point
                    if position.is_winning_move(column) {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    position.play_column(column);
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(position)
    }

    /// Plays a sequence of 1-based column digits
    ///
    /// Stops at the first character that is not a column digit, names a full
    /// column, or would complete an alignment. Returns the number of moves
    /// applied, which equals the sequence length when all of it was valid.
    pub fn play<S: AsRef<str>>(&mut self, moves: S) -> usize {
        let mut played = 0;
        for column_char in moves.as_ref().chars() {
            let column = match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => column - 1,
                _ => return played,
            };
            if !self.can_play(column) || self.is_winning_move(column) {
                return played;
            }
            self.play_column(column);
            played += 1;
        }
        played
    }

    /// Drops a tile of the current player into a playable column
    pub fn play_column(&mut self, column: usize) {
        debug_assert!(self.can_play(column), "column {} is full", column);
        self.play_move((self.mask + Self::bottom_mask_col(column)) & Self::column_mask(column));
    }

    /// Plays a move given as a single-bit bitmap of a playable cell
    pub fn play_move(&mut self, move_bitmap: u64) {
        // switch the current player
        self.current_position ^= self.mask;
        // add a cell of the previous player to the correct column
        self.mask |= move_bitmap;
        self.moves += 1;
    }

    pub fn can_play(&self, column: usize) -> bool {
        debug_assert!(column < WIDTH);
        Self::top_mask_col(column) & self.mask == 0
    }

    /// Whether the current player completes an alignment by playing `column`
    ///
    /// Must only be called on a playable column.
    pub fn is_winning_move(&self, column: usize) -> bool {
        debug_assert!(self.can_play(column), "column {} is full", column);
        self.winning_position() & self.possible() & Self::column_mask(column) != 0
    }

    /// Whether the current player can win with their next move
    pub fn can_win_next(&self) -> bool {
        self.winning_position() & self.possible() != 0
    }

    /// Bitmap of the playable cells that do not let the opponent win next turn
    ///
    /// Must not be called when the current player can win immediately, as the
    /// winning move may be filtered out in favour of a blocking one.
    pub fn possible_non_losing_moves(&self) -> u64 {
        debug_assert!(!self.can_win_next());
        let mut possible_mask = self.possible();
        let opponent_win = self.opponent_winning_position();
        let forced_moves = possible_mask & opponent_win;

        if forced_moves != 0 {
            // if more than one forced move exists, you can't prevent the opponent winning
            if forced_moves & (forced_moves - 1) != 0 {
                return 0;
            } else {
                possible_mask = forced_moves
            }
        }
        // avoid playing below an opponent's winning move
        possible_mask & !(opponent_win >> 1)
    }

    /// Number of winning cells the current player has after playing `move_bitmap`
    pub fn move_score(&self, move_bitmap: u64) -> i32 {
        Self::compute_winning_position(self.current_position | move_bitmap, self.mask)
            .count_ones() as i32
    }

    /// Bitmap with one cell for each non-full column, the next cell to fill
    pub fn possible(&self) -> u64 {
        (self.mask + BOTTOM_MASK) & BOARD_MASK
    }

    /// Empty cells that would complete an alignment for the current player
    pub fn winning_position(&self) -> u64 {
        Self::compute_winning_position(self.current_position, self.mask)
    }

    /// Empty cells that would complete an alignment for the opponent
    pub fn opponent_winning_position(&self) -> u64 {
        Self::compute_winning_position(self.current_position ^ self.mask, self.mask)
    }

    /// Bitmap of the empty cells of `mask` that complete an alignment of four for `position`
    pub fn compute_winning_position(position: u64, mask: u64) -> u64 {
        // vertical
        // find the top ends of 3-alignments
        let mut r = (position << 1) & (position << 2) & (position << 3);

        // horizontal
        let mut p = (position << (HEIGHT + 1)) & (position << (2 * (HEIGHT + 1)));
        // find the right ends of 3-alignments
        r |= p & (position << (3 * (HEIGHT + 1)));
        // find holes of the type ...O O _ O...
        r |= p & (position >> (HEIGHT + 1));

        p = (position >> (HEIGHT + 1)) & (position >> (2 * (HEIGHT + 1)));
        // find the left ends of 3-alignments
        r |= p & (position >> (3 * (HEIGHT + 1)));
        // find holes of the type ...O _ O O...
        r |= p & (position << (HEIGHT + 1));

        // diagonal /
        p = (position << HEIGHT) & (position << (2 * HEIGHT));
        r |= p & (position << (3 * HEIGHT));
        r |= p & (position >> HEIGHT);

        p = (position >> HEIGHT) & (position >> (2 * HEIGHT));
        r |= p & (position >> (3 * HEIGHT));
        r |= p & (position << HEIGHT);

        // diagonal \
        p = (position << (HEIGHT + 2)) & (position << (2 * (HEIGHT + 2)));
        r |= p & (position << (3 * (HEIGHT + 2)));
        r |= p & (position >> (HEIGHT + 2));

        p = (position >> (HEIGHT + 2)) & (position >> (2 * (HEIGHT + 2)));
        r |= p & (position >> (3 * (HEIGHT + 2)));
        r |= p & (position << (HEIGHT + 2));

        r & (BOARD_MASK ^ mask)
    }

    /// Number of moves played since the empty board
    pub fn nb_moves(&self) -> usize {
        self.moves
    }

    /// A unique key of the position, `current_position + mask`
    pub fn key(&self) -> u64 {
        self.current_position + self.mask
    }

    pub fn current_position(&self) -> u64 {
        self.current_position
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Owner of the cell at `column` and `row` (row 0 is the bottom)
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        debug_assert!(column < WIDTH && row < HEIGHT);
        let bit = 1 << (row + column * (HEIGHT + 1));
        if self.current_position & bit != 0 {
            Cell::Current
        } else if self.mask & bit != 0 {
            Cell::Opponent
        } else {
            Cell::Empty
        }
    }

    pub fn top_mask_col(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask_col(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
