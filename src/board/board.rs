//! Board structure with available/occupied tracking

use super::bitboard::CellSet;
use super::{Cell, Pos, Stone, EMPTY, MAX_BOARD_SIZE};
use crate::error::BoardError;
use crate::eval::MoveCandidates;
use crate::rules::Outcome;

/// Game board: an H x W grid of `{-1, 0, +1}` plus the run length needed to win.
///
/// `available` and `unavailable` always partition the cells: every index is in
/// exactly one of them, and both are updated on every successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    n_in_row: usize,
    cells: Vec<Cell>,
    available: CellSet,
    unavailable: CellSet,
}

impl Board {
    /// Create an empty `rows` x `cols` board.
    pub fn new(rows: usize, cols: usize, n_in_row: usize) -> Result<Self, BoardError> {
        validate_shape(rows, cols, n_in_row)?;
        let total = rows * cols;
        Ok(Self {
            rows,
            cols,
            n_in_row,
            cells: vec![EMPTY; total],
            available: CellSet::full(total),
            unavailable: CellSet::empty(total),
        })
    }

    /// Create an empty square board.
    pub fn square(size: usize, n_in_row: usize) -> Result<Self, BoardError> {
        Self::new(size, size, n_in_row)
    }

    /// Import a grid snapshot given as rows of `-1`, `0` or `+1`.
    pub fn from_rows(grid: &[Vec<Cell>], n_in_row: usize) -> Result<Self, BoardError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if grid.iter().any(|row| row.len() != cols) {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }

        let mut board = Self::new(rows, cols, n_in_row)?;
        for (r, row) in grid.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == EMPTY {
                    continue;
                }
                let stone = Stone::from_cell(value).ok_or(BoardError::InvalidCell {
                    row: r,
                    col: c,
                    value,
                })?;
                board.apply_move(Pos::new(r as u8, c as u8), stone)?;
            }
        }
        Ok(board)
    }

    /// Parse rows of `X` (+1), `O` (-1) and `.` (empty).
    ///
    /// Whitespace inside a row is ignored, as are blank lines and lines
    /// starting with `#`.
    pub fn from_text(text: &str, n_in_row: usize) -> Result<Self, BoardError> {
        let mut grid = Vec::new();
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = grid.len();
            let cells = line
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .enumerate()
                .map(|(col, ch)| match ch {
                    'X' | 'x' => Ok(Stone::Black.cell()),
                    'O' | 'o' => Ok(Stone::White.cell()),
                    '.' => Ok(EMPTY),
                    symbol => Err(BoardError::InvalidSymbol { row, col, symbol }),
                })
                .collect::<Result<Vec<Cell>, _>>()?;
            grid.push(cells);
        }
        Self::from_rows(&grid, n_in_row)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Run length required to win
    #[inline]
    pub fn n_in_row(&self) -> usize {
        self.n_in_row
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Raw grid in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        (pos.row as usize) < self.rows && (pos.col as usize) < self.cols
    }

    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        pos.to_index(self.cols)
    }

    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        Pos::from_index(idx, self.cols)
    }

    /// Cell value at `pos`; positions outside the board read as empty.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        if self.in_bounds(pos) {
            self.cells[self.index(pos)]
        } else {
            EMPTY
        }
    }

    #[inline]
    pub fn stone_at(&self, pos: Pos) -> Option<Stone> {
        Stone::from_cell(self.get(pos))
    }

    /// Check if position is on the board and empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.available.contains(self.index(pos))
    }

    /// Place a stone for `stone` at `pos`.
    ///
    /// Fails without touching the board if `pos` is off the grid or taken.
    pub fn apply_move(&mut self, pos: Pos, stone: Stone) -> Result<(), BoardError> {
        let (row, col) = (pos.row as usize, pos.col as usize);
        if !self.in_bounds(pos) {
            return Err(BoardError::OutOfBounds { row, col });
        }
        let idx = self.index(pos);
        if !self.available.contains(idx) {
            return Err(BoardError::Occupied { row, col });
        }

        self.cells[idx] = stone.cell();
        self.available.remove(idx);
        self.unavailable.insert(idx);
        Ok(())
    }

    /// Empty cells
    #[inline]
    pub fn available_set(&self) -> &CellSet {
        &self.available
    }

    /// Occupied cells
    #[inline]
    pub fn unavailable_set(&self) -> &CellSet {
        &self.unavailable
    }

    /// Empty positions in row-major order
    pub fn available(&self) -> impl Iterator<Item = Pos> + '_ {
        self.available.iter_ones().map(|idx| self.pos_of(idx))
    }

    /// Occupied positions in row-major order
    pub fn unavailable(&self) -> impl Iterator<Item = Pos> + '_ {
        self.unavailable.iter_ones().map(|idx| self.pos_of(idx))
    }

    #[inline]
    pub fn available_count(&self) -> usize {
        self.available.count()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.unavailable.count()
    }

    /// Side to play next, assuming Black moved first and turns alternated
    pub fn side_to_move(&self) -> Stone {
        let black = self
            .unavailable()
            .filter(|&p| self.stone_at(p) == Some(Stone::Black))
            .count();
        if black > self.stone_count() - black {
            Stone::White
        } else {
            Stone::Black
        }
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.unavailable.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.available.is_empty()
    }

    /// Terminal status of this position
    pub fn check_result(&self) -> Outcome {
        crate::rules::check_result(self)
    }

    /// Candidate moves bucketed into forcing, proximity and remainder
    pub fn heuristic_moves(&self) -> MoveCandidates {
        crate::eval::heuristic_moves(self)
    }
}

fn validate_shape(rows: usize, cols: usize, n_in_row: usize) -> Result<(), BoardError> {
    if rows == 0 || cols == 0 || rows > MAX_BOARD_SIZE || cols > MAX_BOARD_SIZE {
        return Err(BoardError::InvalidDimensions { rows, cols });
    }
    if n_in_row < 2 || n_in_row > rows.max(cols) {
        return Err(BoardError::InvalidRunLength {
            n_in_row,
            rows,
            cols,
        });
    }
    Ok(())
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for c in 0..self.cols {
            write!(f, "{:>3}", c)?;
        }
        writeln!(f)?;

        for r in 0..self.rows {
            write!(f, "{:>3}", r)?;
            for c in 0..self.cols {
                let ch = match self.stone_at(Pos::new(r as u8, c as u8)) {
                    Some(stone) => stone.symbol(),
                    None => '.',
                };
                write!(f, "{:>3}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
