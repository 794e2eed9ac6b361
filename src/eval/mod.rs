//! Move ordering heuristics for tree expansion
//!
//! Windows of `n_in_row` cells are classified by their numeric sum and the
//! number of distinct values they contain; gaps of one-sided windows become
//! forcing candidates. Neighbours of existing stones come next, then the
//! rest of the board.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{heuristic_moves, MoveCandidates};
pub use patterns::{classify_window, Threat, WindowSummary};
