//! Error types for the board, the search and configuration loading

use thiserror::Error;

/// Errors raised by board construction and move application
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("position ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("run length {n_in_row} does not fit a {rows}x{cols} board")]
    InvalidRunLength {
        n_in_row: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid cell value {value} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: i8 },

    #[error("unexpected symbol {symbol:?} at ({row}, {col})")]
    InvalidSymbol { row: usize, col: usize, symbol: char },
}

/// Errors raised by the search tree and engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("node has no children")]
    NoChildren,

    #[error("node already has its maximum number of children")]
    AtCapacity,

    #[error("no available moves")]
    NoAvailableMoves,

    #[error("game is already over")]
    GameOver,

    #[error("{0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised by the background search worker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("a search is already running")]
    Busy,

    #[error("no search has been started")]
    Idle,

    #[error("search worker exited without a result")]
    Disconnected,

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
