//! Board representation for N-in-a-row games

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::CellSet;
pub use board::Board;

/// Largest supported board side.
pub const MAX_BOARD_SIZE: usize = 64;

/// Numeric cell encoding used by the grid.
///
/// Pattern detection sums window values, so the two sides must stay `+1`
/// and `-1` with `0` for an empty cell.
pub type Cell = i8;

/// Value of an empty cell
pub const EMPTY: Cell = 0;

/// The two sides of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    /// Encoded as `+1`, moves first
    Black,
    /// Encoded as `-1`
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    #[must_use]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Grid encoding of this side
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Stone::Black => 1,
            Stone::White => -1,
        }
    }

    /// Decode a grid value. Returns `None` for empty or invalid cells.
    #[inline]
    pub fn from_cell(cell: Cell) -> Option<Stone> {
        match cell {
            1 => Some(Stone::Black),
            -1 => Some(Stone::White),
            _ => None,
        }
    }

    /// Single-character symbol used in text boards
    pub fn symbol(self) -> char {
        match self {
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stone::Black => write!(f, "Black"),
            Stone::White => write!(f, "White"),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index on a board `cols` wide
    #[inline]
    pub fn to_index(self, cols: usize) -> usize {
        self.row as usize * cols + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize, cols: usize) -> Self {
        Self {
            row: (idx / cols) as u8,
            col: (idx % cols) as u8,
        }
    }

    /// Step `steps` cells along `(dr, dc)`, staying inside `rows` x `cols`.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, steps: i32, rows: usize, cols: usize) -> Option<Pos> {
        let r = i32::from(self.row) + dr * steps;
        let c = i32::from(self.col) + dc * steps;
        if r >= 0 && (r as usize) < rows && c >= 0 && (c as usize) < cols {
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
