//! Win condition checking
//!
//! Runs are found by scanning only occupied cells. A run is counted from
//! its first stone (no same-colored stone behind it), so each line segment
//! is measured once per direction.

use crate::board::{Board, Pos, Stone};

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Anti-diagonal SW
];

/// Terminal status of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Moves remain and nobody has a run
    Ongoing,
    /// `Stone` owns a run of `n_in_row`
    Win(Stone),
    /// Board is full without a run
    Draw,
}

impl Outcome {
    #[inline]
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    #[inline]
    pub fn winner(self) -> Option<Stone> {
        match self {
            Outcome::Win(stone) => Some(stone),
            _ => None,
        }
    }
}

/// Check for a winner or a draw.
///
/// Returns the first run found in row-major order of its starting stone.
pub fn check_result(board: &Board) -> Outcome {
    for pos in board.unavailable() {
        let Some(stone) = board.stone_at(pos) else {
            continue;
        };
        for &(dr, dc) in &DIRECTIONS {
            if is_run_start(board, pos, dr, dc, stone)
                && count_forward(board, pos, dr, dc, stone) >= board.n_in_row()
            {
                return Outcome::Win(stone);
            }
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// Fast run check through a specific position.
///
/// Only inspects the four lines crossing `pos`, so it is enough after a
/// single move on a board that had no run before.
#[inline]
pub fn has_run_at(board: &Board, pos: Pos, stone: Stone) -> bool {
    if board.stone_at(pos) != Some(stone) {
        return false;
    }
    DIRECTIONS.iter().any(|&(dr, dc)| {
        let behind = count_forward(board, pos, -dr, -dc, stone) - 1;
        let ahead = count_forward(board, pos, dr, dc, stone);
        behind + ahead >= board.n_in_row()
    })
}

/// Find the positions of a winning run if one exists.
///
/// Returns the whole line (at least `n_in_row` positions) in direction order.
pub fn find_run(board: &Board, stone: Stone) -> Option<Vec<Pos>> {
    for pos in board.unavailable() {
        if board.stone_at(pos) != Some(stone) {
            continue;
        }
        for &(dr, dc) in &DIRECTIONS {
            if !is_run_start(board, pos, dr, dc, stone) {
                continue;
            }
            let line: Vec<Pos> = (0..)
                .map_while(|step| pos.offset(dr, dc, step, board.rows(), board.cols()))
                .take_while(|&p| board.stone_at(p) == Some(stone))
                .collect();
            if line.len() >= board.n_in_row() {
                return Some(line);
            }
        }
    }
    None
}

/// True if no stone of the same color precedes `pos` along `(dr, dc)`
#[inline]
fn is_run_start(board: &Board, pos: Pos, dr: i32, dc: i32, stone: Stone) -> bool {
    match pos.offset(dr, dc, -1, board.rows(), board.cols()) {
        Some(prev) => board.stone_at(prev) != Some(stone),
        None => true,
    }
}

/// Count consecutive `stone` cells starting at `pos` (inclusive)
#[inline]
fn count_forward(board: &Board, pos: Pos, dr: i32, dc: i32, stone: Stone) -> usize {
    let mut count = 0;
    let mut step = 0;
    while let Some(p) = pos.offset(dr, dc, step, board.rows(), board.cols()) {
        if board.stone_at(p) != Some(stone) {
            break;
        }
        count += 1;
        step += 1;
    }
    count
}
