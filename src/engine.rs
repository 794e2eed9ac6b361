//! Main AI engine wrapping the MCTS searcher
//!
//! Decision flow for one move:
//!
//! 1. **Fast path**: a single empty cell is returned without building a tree
//! 2. **Search**: otherwise the MCTS loop runs until its budget is spent and
//!    the root child with the best UCT score is played
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, Pos, SearchConfig, Stone};
//!
//! let config = SearchConfig::default().with_simulations(300).without_time_limit();
//! let mut engine = AIEngine::seeded(config, 1);
//! let mut board = Board::square(7, 5).unwrap();
//! board.apply_move(Pos::new(3, 3), Stone::Black).unwrap();
//!
//! let result = engine
//!     .get_move_with_stats(&board, Stone::Black, Some(Pos::new(3, 3)))
//!     .unwrap();
//! println!("Best move: {}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::board::{Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::search::{SearchOutcome, Searcher};

/// Which stage of the engine produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Only one cell was empty
    FastPath,
    /// Monte Carlo tree search
    Mcts,
}

/// Result of a move search with statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// Chosen cell, always empty on the input board
    pub best_move: Pos,
    pub search_type: SearchType,
    /// Completed search iterations
    pub simulations: u32,
    /// Nodes allocated in the search tree
    pub nodes: usize,
    /// Win rate of the chosen move for the side to play
    pub win_rate: f64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    #[inline]
    fn fast_path(pos: Pos, time_ms: u64) -> Self {
        Self {
            best_move: pos,
            search_type: SearchType::FastPath,
            simulations: 0,
            nodes: 0,
            win_rate: 0.0,
            time_ms,
        }
    }

    #[inline]
    fn from_mcts(outcome: &SearchOutcome, time_ms: u64) -> Self {
        Self {
            best_move: outcome.best_move,
            search_type: SearchType::Mcts,
            simulations: outcome.simulations,
            nodes: outcome.nodes,
            win_rate: outcome.win_rate,
            time_ms,
        }
    }
}

/// MCTS engine for N-in-a-row games.
///
/// Every call builds a fresh tree; nothing is kept between moves except the
/// random generator state.
pub struct AIEngine<R = ChaCha8Rng> {
    searcher: Searcher<R>,
}

impl AIEngine<ChaCha8Rng> {
    /// Engine with default settings, seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Engine with a custom configuration.
    ///
    /// Uses `config.seed` when set, entropy otherwise.
    #[must_use]
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            searcher: Searcher::from_config(config),
        }
    }

    /// Engine with a fixed seed, for reproducible play.
    #[must_use]
    pub fn seeded(config: SearchConfig, seed: u64) -> Self {
        Self {
            searcher: Searcher::seeded(config, seed),
        }
    }
}

impl<R: Rng> AIEngine<R> {
    /// Engine drawing randomness from `rng`.
    pub fn with_rng(config: SearchConfig, rng: R) -> Self {
        Self {
            searcher: Searcher::new(config, rng),
        }
    }

    /// Get the best move for the side after `last_mover`.
    ///
    /// Use [`AIEngine::get_move_with_stats`] for search statistics.
    pub fn get_move(
        &mut self,
        board: &Board,
        last_mover: Stone,
        last_move: Option<Pos>,
    ) -> Result<Pos, SearchError> {
        self.get_move_with_stats(board, last_mover, last_move)
            .map(|result| result.best_move)
    }

    /// Get the best move with search statistics.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoAvailableMoves`] if the board is full
    /// - [`SearchError::GameOver`] if the board already holds a run
    /// - [`SearchError::InvalidConfig`] if the search settings fail validation
    pub fn get_move_with_stats(
        &mut self,
        board: &Board,
        last_mover: Stone,
        last_move: Option<Pos>,
    ) -> Result<MoveResult, SearchError> {
        let start = Instant::now();

        self.searcher.check_config()?;
        if board.available_count() == 0 {
            return Err(SearchError::NoAvailableMoves);
        }
        if board.check_result().is_over() {
            return Err(SearchError::GameOver);
        }

        if board.available_count() == 1 {
            let pos = board
                .available()
                .next()
                .ok_or(SearchError::NoAvailableMoves)?;
            debug!(%pos, "single available cell");
            return Ok(MoveResult::fast_path(
                pos,
                start.elapsed().as_millis() as u64,
            ));
        }

        let outcome = self.searcher.search(board, last_mover, last_move)?;
        Ok(MoveResult::from_mcts(
            &outcome,
            start.elapsed().as_millis() as u64,
        ))
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        self.searcher.config()
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.searcher.set_config(config);
    }

    /// Set the simulation budget.
    pub fn set_max_simulations(&mut self, n: u32) {
        let config = self.config().clone().with_simulations(n);
        self.set_config(config);
    }

    /// Set the wall-clock budget in seconds; `<= 0` disables it.
    pub fn set_think_time(&mut self, secs: f64) {
        let config = self.config().clone().with_think_time(secs);
        self.set_config(config);
    }
}

impl Default for AIEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}
