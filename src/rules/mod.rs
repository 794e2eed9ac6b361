//! Game rules for N-in-a-row games
//!
//! A side wins by owning a straight run of at least `n_in_row` stones along
//! a row, column, diagonal or anti-diagonal. A full board with no run is a
//! draw.

pub mod win;

// Re-exports for convenient access
pub use win::{check_result, find_run, has_run_at, Outcome, DIRECTIONS};
