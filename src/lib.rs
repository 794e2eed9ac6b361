//! Monte Carlo tree search engine for N-in-a-row games
//!
//! Plays any "get `n_in_row` stones in a line" game on a rectangular board
//! of up to 64x64 cells (gomoku, connect-style variants, tic-tac-toe):
//! - Horizontal, vertical and both diagonal runs win
//! - Overlines count as wins
//! - A full board without a run is a draw
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Grid, side encoding and available/occupied cell sets
//! - [`rules`]: Terminal detection
//! - [`eval`]: Forcing-pattern detection and expansion ordering
//! - [`search`]: Arena tree and the MCTS loop
//! - [`engine`]: Fast path plus search, with move statistics
//! - [`worker`]: Background search thread with a non-blocking poll
//! - [`game`]: Human-versus-engine session bookkeeping
//! - [`config`]: TOML configuration with environment overrides
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Board, Pos, SearchConfig, Stone};
//!
//! // Simulation budget only, fixed seed
//! let config = SearchConfig::default().with_simulations(200).without_time_limit();
//! let mut engine = AIEngine::seeded(config, 42);
//!
//! let mut board = Board::square(9, 5).unwrap();
//! board.apply_move(Pos::new(4, 4), Stone::Black).unwrap();
//!
//! // Engine answers as White
//! let pos = engine.get_move(&board, Stone::Black, Some(Pos::new(4, 4))).unwrap();
//! board.apply_move(pos, Stone::White).unwrap();
//! println!("AI plays at {}", pos);
//! ```
//!
//! # Search
//!
//! Each iteration descends by UCT through fully expanded nodes, adds one
//! child in heuristic order (forcing moves, then cells next to stones,
//! then the rest), plays a uniformly random game from it and credits the
//! result back to the root. The root child with the best UCT score is
//! played once the simulation or time budget is spent.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod worker;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Pos, Stone, EMPTY, MAX_BOARD_SIZE};
pub use config::{EngineConfig, GameConfig, SearchConfig};
pub use engine::{AIEngine, MoveResult, SearchType};
pub use error::{BoardError, ConfigError, SearchError, WorkerError};
pub use game::{GameResult, GameSession, MoveRejection};
pub use rules::Outcome;
pub use worker::{AiWorker, WorkerStatus};
