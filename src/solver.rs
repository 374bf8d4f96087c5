//! An agent to solve the game of Connect 4

use log::{debug, trace};
use rayon::prelude::*;

use crate::{position::Position, HEIGHT, WIDTH};

use std::cmp::Ordering;

/// The number of cells of the board
const CELLS: i32 = (WIDTH * HEIGHT) as i32;

/// The precision of a search
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    /// Compute the exact score of the position
    Strong,
    /// Only compute whether the position is won, drawn or lost
    Weak,
}

impl Mode {
    fn report(self, score: i32) -> i32 {
        match self {
            Mode::Strong => score,
            Mode::Weak => score.signum(),
        }
    }
}

struct MoveSorter {
    size: usize,
    // move bitmap and score
    moves: [(u64, i32); WIDTH],
}

impl MoveSorter {
    pub fn new() -> Self {
        Self {
            size: 0,
            moves: [(0, 0); WIDTH],
        }
    }
    // moves pushed later come out first among equal scores
    pub fn push(&mut self, new_move: u64, score: i32) {
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.moves[pos - 1].1 > score {
            self.moves[pos] = self.moves[pos - 1];
            pos -= 1;
        }
        self.moves[pos] = (new_move, score);
    }
}
impl Iterator for MoveSorter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.moves[self.size].0)
            }
        }
    }
}

/// Returns the columns ordered from the middle outwards, as
/// the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2);
        i += 1;
    }
    move_order
}

/// Score of a position where the current player wins with their next move
fn win_score(position: &Position) -> i32 {
    (CELLS + 1 - position.nb_moves() as i32) / 2
}

/// An agent to solve Connect 4 positions
///
/// # Position Scoring
/// Scores are given from the point of view of the player to move. A position won by
/// that player scores positive, the faster the win the higher the score: winning with
/// the last tile of a 7x6 board (the 21st) scores 1, winning with the 4th tile scores 18.
/// Lost positions score the negation of the opponent's win, a drawn position scores 0.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
    move_ordering: bool,
}

impl Solver {
    /// Creates a new `Solver` exploring columns from left to right
    pub fn new() -> Self {
        Self {
            node_count: 0,
            move_ordering: false,
        }
    }

    /// Explores the most promising moves first, centre columns breaking ties
    ///
    /// Only changes the number of nodes searched, never the returned score.
    pub fn with_move_ordering(mut self, enabled: bool) -> Self {
        self.move_ordering = enabled;
        self
    }

    pub fn reset_node_count(&mut self) {
        self.node_count = 0;
    }

    /// Calculates the score of a position (see [Position Scoring])
    ///
    /// In [`Mode::Weak`] only the sign of the score is returned.
    ///
    /// [Position Scoring]: #position-scoring
    pub fn solve(&mut self, position: &Position, mode: Mode) -> i32 {
        let start_count = self.node_count;
        let moves = position.nb_moves() as i32;

        // the search does not handle positions won on the next move or full boards
        let score = if position.can_win_next() {
            win_score(position)
        } else if position.nb_moves() == WIDTH * HEIGHT {
            0
        } else {
            let (min, max) = match mode {
                Mode::Strong => (-(CELLS - moves) / 2, (CELLS + 1 - moves) / 2),
                Mode::Weak => (-1, 1),
            };
            self.negamax(*position, min, max)
        };
        let score = mode.report(score);

        debug!(
            "solved {:#x} after {} moves ({:?}): score {}, {} nodes",
            position.key(),
            moves,
            mode,
            score,
            self.node_count - start_count
        );
        score
    }

    /// Performs game tree search inside the window `[alpha, beta]`
    ///
    /// Returns the exact score if it lies inside the window, otherwise a bound on the
    /// same side of the window as the exact score.
    fn negamax(&mut self, position: Position, mut alpha: i32, mut beta: i32) -> i32 {
        debug_assert!(alpha < beta);

        // check for next-move win for current player
        for column in 0..WIDTH {
            if position.can_play(column) && position.is_winning_move(column) {
                return win_score(&position);
            }
        }
        self.node_count += 1;

        let moves = position.nb_moves() as i32;

        // look for moves that don't give the opponent a next turn win
        let non_losing_moves = position.possible_non_losing_moves();
        if non_losing_moves == 0 {
            return -(CELLS - moves) / 2;
        }

        // with two cells left and no threat from either side the game is drawn
        if moves >= CELLS - 2 {
            return 0;
        }

        // lower bound of score as the opponent cannot win next move
        let min = -(CELLS - 2 - moves) / 2;
        if alpha < min {
            alpha = min;
            if alpha >= beta {
                return alpha;
            }
        }

        // upper bound of score as we cannot win immediately
        let max = (CELLS - 1 - moves) / 2;
        if beta > max {
            beta = max;
            if alpha >= beta {
                return beta;
            }
        }

        let mut candidates = MoveSorter::new();
        for i in (0..WIDTH).rev() {
            let column = if self.move_ordering { move_order()[i] } else { i };
            let candidate = non_losing_moves & Position::column_mask(column);
            if candidate != 0 {
                let score = if self.move_ordering {
                    position.move_score(candidate)
                } else {
                    0
                };
                candidates.push(candidate, score);
            }
        }

        for move_bitmap in candidates {
            let mut next = position;
            next.play_move(move_bitmap);
            // the search window is flipped for the other player
            let score = -self.negamax(next, -beta, -alpha);
            // a perfect opponent will not allow this position, prune the remaining moves
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// Scores every legal move of the position from the point of view of the player to move
    ///
    /// Columns are searched in parallel, `None` marks a full column.
    pub fn analyse(&mut self, position: &Position, mode: Mode) -> [Option<i32>; WIDTH] {
        let move_ordering = self.move_ordering;

        let results: Vec<(Option<i32>, usize)> = (0..WIDTH)
            .into_par_iter()
            .map(|column| {
                if !position.can_play(column) {
                    return (None, 0);
                }
                if position.is_winning_move(column) {
                    return (Some(mode.report(win_score(position))), 0);
                }

                let mut solver = Solver::new().with_move_ordering(move_ordering);
                let mut next = *position;
                next.play_column(column);
                let score = -solver.solve(&next, mode);
                trace!("column {}: score {}, {} nodes", column + 1, score, solver.node_count);
                (Some(score), solver.node_count)
            })
            .collect();

        let mut scores = [None; WIDTH];
        for (column, (score, node_count)) in results.into_iter().enumerate() {
            scores[column] = score;
            self.node_count += node_count;
        }
        scores
    }

    /// Returns the best column (0-based) and its score, the leftmost one on ties
    ///
    /// Returns `None` if the board is full.
    pub fn best_move(&mut self, position: &Position, mode: Mode) -> Option<(usize, i32)> {
        best_of(&self.analyse(position, mode))
    }
}

/// Picks the highest scored column of an analysis, the leftmost one on ties
pub fn best_of(scores: &[Option<i32>; WIDTH]) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for (column, score) in scores.iter().enumerate() {
        if let Some(score) = *score {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
        }
    }
    best
}

/// Converts a strong score into a distance in moves of the player deciding the game
///
/// For a won or lost position this is the number of tiles the winner still has to
/// place, for a drawn position the number of empty cells. Scores outside the range
/// reachable from `position` yield 0.
pub fn moves_to_win(position: &Position, score: i32) -> usize {
    let moves = position.nb_moves();
    let tiles = (WIDTH * HEIGHT / 2 + 1).saturating_sub(score.unsigned_abs() as usize);
    match score.cmp(&0) {
        Ordering::Equal => WIDTH * HEIGHT - moves,
        Ordering::Greater => tiles.saturating_sub(moves / 2),
        Ordering::Less => tiles.saturating_sub((moves + 1) / 2),
    }
}
