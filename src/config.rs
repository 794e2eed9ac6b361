//! Engine configuration loaded from `gomoku.toml`.
//!
//! # Configuration Priority
//!
//! Settings are resolved with the following priority (highest to lowest):
//! 1. Command line flags (applied by the binary)
//! 2. Environment variables (`GOMOKU_<SECTION>_<KEY>`)
//! 3. `gomoku.toml`
//! 4. Built-in defaults
//!
//! ```text
//! GOMOKU_SEARCH_MAX_SIMULATIONS=5000
//! GOMOKU_SEARCH_THINK_TIME_SECS=0      # simulation budget only
//! GOMOKU_GAME_ROWS=15
//! GOMOKU_LOG_LEVEL=debug
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::board::{Board, MAX_BOARD_SIZE};
use crate::error::{BoardError, ConfigError};

/// Standard locations to search for gomoku.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &["gomoku.toml", "../gomoku.toml"];

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GOMOKU_CONFIG";

/// Search budget and tree shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Wall-clock budget per decision; `<= 0` disables the time limit
    pub think_time_secs: f64,
    /// Stop once the root has been visited this many times
    pub max_simulations: u32,
    /// Branching cap for every node
    pub max_children: usize,
    /// UCT exploration constant `C`
    pub exploration: f64,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            think_time_secs: 5.0,
            max_simulations: 20_000,
            max_children: 10,
            exploration: 1.96,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Wall-clock limit, if any. Budgets beyond `Duration::MAX` saturate.
    pub fn think_time(&self) -> Option<Duration> {
        if self.think_time_secs > 0.0 {
            Some(Duration::try_from_secs_f64(self.think_time_secs).unwrap_or(Duration::MAX))
        } else {
            None
        }
    }

    /// Builder pattern: set the simulation budget.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.max_simulations = n;
        self
    }

    /// Builder pattern: set the wall-clock budget in seconds.
    pub fn with_think_time(mut self, secs: f64) -> Self {
        self.think_time_secs = secs;
        self
    }

    /// Builder pattern: budget by simulation count only.
    pub fn without_time_limit(mut self) -> Self {
        self.think_time_secs = 0.0;
        self
    }

    pub fn with_max_children(mut self, n: usize) -> Self {
        self.max_children = n;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_children == 0 {
            return Err(ConfigError::Invalid(
                "search.max_children must be positive".into(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "search.exploration must be finite and non-negative, got {}",
                self.exploration
            )));
        }
        if self.think_time_secs.is_nan() {
            return Err(ConfigError::Invalid(
                "search.think_time_secs is not a number".into(),
            ));
        }
        Ok(())
    }
}

/// Board shape and seating for a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub n_in_row: usize,
    /// Human plays the first stone (`X`)
    pub human_first: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            n_in_row: 5,
            human_first: true,
        }
    }
}

impl GameConfig {
    /// Empty board with the configured shape.
    pub fn board(&self) -> Result<Board, BoardError> {
        Board::new(self.rows, self.cols, self.n_in_row)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = 1..=MAX_BOARD_SIZE;
        if !dims.contains(&self.rows) || !dims.contains(&self.cols) {
            return Err(ConfigError::Invalid(format!(
                "board {}x{} outside 1..={}",
                self.rows, self.cols, MAX_BOARD_SIZE
            )));
        }
        let longest = self.rows.max(self.cols);
        if self.n_in_row < 2 || self.n_in_row > longest {
            return Err(ConfigError::Invalid(format!(
                "game.n_in_row {} outside 2..={}",
                self.n_in_row, longest
            )));
        }
        Ok(())
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub log_level: String,
    pub search: SearchConfig,
    pub game: GameConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            search: SearchConfig::default(),
            game: GameConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        self.game.validate()
    }
}

/// Load configuration from the first file found, or defaults.
///
/// Searches `GOMOKU_CONFIG`, then [`CONFIG_SEARCH_PATHS`]. Unreadable or
/// malformed files are reported and replaced by defaults. Environment
/// overrides are applied in every case.
pub fn load_config() -> EngineConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_or_default(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_or_default(path);
        }
    }

    debug!("No gomoku.toml found, using built-in defaults");
    apply_env_overrides(EngineConfig::default())
}

fn load_or_default(path: &Path) -> EngineConfig {
    match load_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            apply_env_overrides(EngineConfig::default())
        }
    }
}

/// Load configuration from a specific file, then apply environment overrides.
pub fn load_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(apply_env_overrides(config))
}

macro_rules! override_field {
    // String field
    ($lookup:expr, $config:expr, $($field:ident).+, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$($field).+ = v;
        }
    };
    // Parseable field (u32, usize, f64, bool)
    ($lookup:expr, $config:expr, $($field:ident).+, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.trim().parse().ok()) {
            $config.$($field).+ = v;
        }
    };
    // Optional parseable field
    ($lookup:expr, $config:expr, $($field:ident).+, $key:expr, optional_parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.trim().parse().ok()) {
            $config.$($field).+ = Some(v);
        }
    };
}

/// Apply `GOMOKU_<SECTION>_<KEY>` environment overrides.
pub fn apply_env_overrides(config: EngineConfig) -> EngineConfig {
    apply_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`; unparseable values are ignored.
pub fn apply_overrides_with<F>(mut config: EngineConfig, lookup: F) -> EngineConfig
where
    F: Fn(&str) -> Option<String>,
{
    override_field!(lookup, config, log_level, "GOMOKU_LOG_LEVEL");

    override_field!(
        lookup,
        config,
        search.max_simulations,
        "GOMOKU_SEARCH_MAX_SIMULATIONS",
        parse
    );
    override_field!(
        lookup,
        config,
        search.think_time_secs,
        "GOMOKU_SEARCH_THINK_TIME_SECS",
        parse
    );
    override_field!(
        lookup,
        config,
        search.max_children,
        "GOMOKU_SEARCH_MAX_CHILDREN",
        parse
    );
    override_field!(
        lookup,
        config,
        search.exploration,
        "GOMOKU_SEARCH_EXPLORATION",
        parse
    );
    override_field!(
        lookup,
        config,
        search.seed,
        "GOMOKU_SEARCH_SEED",
        optional_parse
    );

    override_field!(lookup, config, game.rows, "GOMOKU_GAME_ROWS", parse);
    override_field!(lookup, config, game.cols, "GOMOKU_GAME_COLS", parse);
    override_field!(
        lookup,
        config,
        game.n_in_row,
        "GOMOKU_GAME_N_IN_ROW",
        parse
    );
    override_field!(
        lookup,
        config,
        game.human_first,
        "GOMOKU_GAME_HUMAN_FIRST",
        parse
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.search.max_simulations, 20_000);
        assert_eq!(config.search.max_children, 10);
        assert!((config.search.exploration - 1.96).abs() < f64::EPSILON);
        assert_eq!(config.search.think_time(), Some(Duration::from_secs(5)));
        assert_eq!(config.search.seed, None);
        assert_eq!(config.game, GameConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_think_time_disabled() {
        assert_eq!(SearchConfig::default().without_time_limit().think_time(), None);
        assert_eq!(SearchConfig::default().with_think_time(-1.0).think_time(), None);
        assert_eq!(
            SearchConfig::default().with_think_time(0.25).think_time(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_huge_think_time_saturates() {
        let config = SearchConfig::default().with_think_time(1e300);
        assert_eq!(config.think_time(), Some(Duration::MAX));
        let config = SearchConfig::default().with_think_time(f64::INFINITY);
        assert_eq!(config.think_time(), Some(Duration::MAX));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = SearchConfig::default()
            .with_simulations(64)
            .with_max_children(4)
            .with_exploration(0.05)
            .with_seed(9);
        assert_eq!(config.max_simulations, 64);
        assert_eq!(config.max_children, 4);
        assert!((config.exploration - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            log_level = "debug"

            [search]
            max_simulations = 500
            seed = 42

            [game]
            rows = 15
            cols = 15
        "#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.search.max_simulations, 500);
        assert_eq!(config.search.seed, Some(42));
        assert_eq!(config.search.max_children, 10);
        assert_eq!(config.game.rows, 15);
        assert_eq!(config.game.n_in_row, 5);
        assert!(config.game.human_first);
    }

    #[test]
    fn test_overrides() {
        let lookup = lookup_from(&[
            ("GOMOKU_LOG_LEVEL", "trace"),
            ("GOMOKU_SEARCH_MAX_SIMULATIONS", "123"),
            ("GOMOKU_SEARCH_THINK_TIME_SECS", "0"),
            ("GOMOKU_SEARCH_SEED", "7"),
            ("GOMOKU_GAME_N_IN_ROW", "4"),
            ("GOMOKU_GAME_HUMAN_FIRST", "false"),
        ]);
        let config = apply_overrides_with(EngineConfig::default(), lookup);
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.search.max_simulations, 123);
        assert_eq!(config.search.think_time(), None);
        assert_eq!(config.search.seed, Some(7));
        assert_eq!(config.game.n_in_row, 4);
        assert!(!config.game.human_first);
    }

    #[test]
    fn test_unparseable_override_ignored() {
        let lookup = lookup_from(&[("GOMOKU_SEARCH_MAX_CHILDREN", "lots")]);
        let config = apply_overrides_with(EngineConfig::default(), lookup);
        assert_eq!(config.search.max_children, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.search.max_children = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.search.exploration = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.search.exploration = -0.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.game.rows = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.game.cols = 65;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.game.n_in_row = 10;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.game.n_in_row = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_game_board() {
        let game = GameConfig {
            rows: 6,
            cols: 7,
            n_in_row: 4,
            human_first: false,
        };
        let board = game.board().unwrap();
        assert_eq!((board.rows(), board.cols(), board.n_in_row()), (6, 7, 4));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nmax_children = 3\nexploration = 0.5").unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.search.max_children, 3);
        assert!((config.search.exploration - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_from_path(&missing),
            Err(ConfigError::Io { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[search\nmax_children = ").unwrap();
        assert!(matches!(load_from_path(&bad), Err(ConfigError::Parse { .. })));
    }
}
