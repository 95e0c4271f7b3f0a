//! Game configuration loaded from `hyperspace.toml`.
//!
//! # Configuration Priority
//!
//! 1. `HYPERSPACE_DIFFICULTY` environment variable (difficulty only)
//! 2. The file named by `HYPERSPACE_CONFIG`, else the first of
//!    [`CONFIG_SEARCH_PATHS`] that exists
//! 3. Built-in defaults
//!
//! A config file that exists but cannot be read or parsed is an error; the
//! loader never falls back to defaults over a broken file.
//!
//! ```toml
//! line_length = 4
//!
//! [[boards]]
//! label = "ALPHA [EUCLIDEAN]"
//! rows = 4
//! cols = 4
//! depth = 4
//!
//! [[boards]]
//! label = "BETA [NON-EUCLIDEAN]"
//! rows = 4
//! cols = 4
//! depth = 4
//! wrap_x = true
//! wrap_y = true
//!
//! [ai]
//! difficulty = "Godlike"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::board::Mark;
use crate::engine::Difficulty;
use crate::error::{Error, Result};
use crate::rules::registry::longest_extent;
use crate::rules::{Topology, TopologyRegistry};

/// Standard locations to search for the config file
pub const CONFIG_SEARCH_PATHS: &[&str] = &["hyperspace.toml", "../hyperspace.toml"];

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "HYPERSPACE_CONFIG";

/// Environment variable overriding `ai.difficulty`
pub const DIFFICULTY_ENV: &str = "HYPERSPACE_DIFFICULTY";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Boards in id order
    pub boards: Vec<BoardSpec>,
    /// Cells in a winning line
    pub line_length: i64,
    pub scoring: ScoringConfig,
    pub ai: AiConfig,
    pub economy: EconomyConfig,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            boards: vec![
                BoardSpec {
                    label: "ALPHA [EUCLIDEAN]".into(),
                    ..BoardSpec::default()
                },
                BoardSpec {
                    label: "BETA [NON-EUCLIDEAN]".into(),
                    wrap_x: true,
                    wrap_y: true,
                    ..BoardSpec::default()
                },
            ],
            line_length: 4,
            scoring: ScoringConfig::default(),
            ai: AiConfig::default(),
            economy: EconomyConfig::default(),
            log_level: "info".into(),
        }
    }
}

/// One board's dimensions and wrap flags. x spans `cols`, y `rows`, z `depth`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardSpec {
    pub label: String,
    pub rows: i64,
    pub cols: i64,
    pub depth: i64,
    pub wrap_x: bool,
    pub wrap_y: bool,
    pub wrap_z: bool,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            label: String::new(),
            rows: 4,
            cols: 4,
            depth: 4,
            wrap_x: false,
            wrap_y: false,
            wrap_z: false,
        }
    }
}

impl BoardSpec {
    pub fn topology(&self) -> Result<Topology> {
        let dim = |name: &str, value: i64| -> Result<usize> {
            usize::try_from(value)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    Error::config(format!(
                        "board '{}' {name} must be positive, got {value}",
                        self.label
                    ))
                })
        };
        Topology::new(
            dim("cols", self.cols)?,
            dim("rows", self.rows)?,
            dim("depth", self.depth)?,
            [self.wrap_x, self.wrap_y, self.wrap_z],
        )
    }
}

/// Points paid for completed lines
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base points per completed line
    pub line: u32,
    /// Bonus for a line that changes depth
    pub diagonal_3d: u32,
    /// Cross-board bonus is `diagonal_3d * cross_board_multiplier`
    pub cross_board_multiplier: u32,
    /// Also pay the depth bonus on a cross-board line that changes depth
    pub stack_depth_bonus_on_cross_board: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            line: 10,
            diagonal_3d: 50,
            cross_board_multiplier: 2,
            stack_depth_bonus_on_cross_board: true,
        }
    }
}

/// Computer opponent settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// "X" or "O"
    pub player: String,
    /// "Rookie", "Elite" or "Godlike"
    pub difficulty: String,
    /// Weight per line the move completes
    pub complete_weight: i32,
    /// Weight per opponent line the move takes away
    pub deny_weight: i32,
    /// Weight per still-open line through the cell
    pub positional_weight: i32,
    /// Delay before the chosen move is applied (presentation only)
    pub think_time_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player: "O".into(),
            difficulty: "Elite".into(),
            complete_weight: 1_000,
            deny_weight: 500,
            positional_weight: 1,
            think_time_ms: 100,
        }
    }
}

impl AiConfig {
    pub fn difficulty(&self) -> Result<Difficulty> {
        self.difficulty.parse()
    }

    pub fn player(&self) -> Result<Mark> {
        match self.player.trim() {
            "X" | "x" => Ok(Mark::X),
            "O" | "o" => Ok(Mark::O),
            other => Err(Error::config(format!(
                "ai.player must be \"X\" or \"O\", got \"{other}\""
            ))),
        }
    }
}

/// Credits, undo and power-up prices
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub initial_wallet: u32,
    pub undo_cost: u32,
    /// Completed moves a blocked cell stays frozen
    pub block_turns: u32,
    pub costs: PowerUpCosts,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_wallet: 100,
            undo_cost: 5,
            block_turns: 3,
            costs: PowerUpCosts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PowerUpCosts {
    pub swap: u32,
    pub remove: u32,
    pub block: u32,
    pub peek: u32,
    pub clone: u32,
}

impl Default for PowerUpCosts {
    fn default() -> Self {
        Self {
            swap: 40,
            remove: 30,
            block: 25,
            peek: 15,
            clone: 50,
        }
    }
}

impl GameConfig {
    /// Check everything that can be checked without building the registry.
    pub fn validate(&self) -> Result<()> {
        if self.boards.is_empty() {
            return Err(Error::config("at least one board is required"));
        }
        let topologies = self.topologies()?;
        if self.line_length <= 0 {
            return Err(Error::config(format!(
                "line_length must be positive, got {}",
                self.line_length
            )));
        }
        let longest = topologies.iter().map(longest_extent).max().unwrap_or(0);
        if self.line_length as u64 > longest as u64 {
            return Err(Error::config(format!(
                "line_length {} exceeds the longest board axis ({longest})",
                self.line_length
            )));
        }
        self.ai.difficulty()?;
        self.ai.player()?;
        for (name, weight) in [
            ("complete_weight", self.ai.complete_weight),
            ("deny_weight", self.ai.deny_weight),
            ("positional_weight", self.ai.positional_weight),
        ] {
            if weight < 0 {
                return Err(Error::config(format!(
                    "ai.{name} must be non-negative, got {weight}"
                )));
            }
        }
        Ok(())
    }

    pub fn topologies(&self) -> Result<Vec<Topology>> {
        self.boards.iter().map(BoardSpec::topology).collect()
    }

    /// Validate and enumerate every winning line
    pub fn registry(&self) -> Result<TopologyRegistry> {
        self.validate()?;
        TopologyRegistry::new(self.topologies()?, self.line_length as usize)
    }

    /// Parse TOML text; `path` is only used in error messages
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the configuration with the priority described in the module docs,
/// then validate it.
pub fn load_config() -> Result<GameConfig> {
    let mut config = match locate_config() {
        Some(path) => load_from_path(&path)?,
        None => {
            debug!("No hyperspace.toml found, using built-in defaults");
            GameConfig::default()
        }
    };
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn locate_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Load configuration from a specific path (not validated).
pub fn load_from_path(path: &Path) -> Result<GameConfig> {
    info!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GameConfig::from_toml(&content, path)
}

pub fn apply_env_overrides(config: &mut GameConfig) {
    if let Ok(v) = std::env::var(DIFFICULTY_ENV) {
        debug!(difficulty = %v, "difficulty overridden from environment");
        config.ai.difficulty = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(content: &str) -> Result<GameConfig> {
        GameConfig::from_toml(content, Path::new("test.toml"))
    }

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.boards.len(), 2);
        assert!(config.boards[1].wrap_x && config.boards[1].wrap_y);
        assert!(!config.boards[1].wrap_z);
        assert_eq!(config.ai.difficulty().unwrap(), Difficulty::Elite);
        assert_eq!(config.ai.player().unwrap(), Mark::O);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse(
            r#"
            line_length = 4

            [ai]
            difficulty = "Godlike"
            deny_weight = 300

            [economy]
            initial_wallet = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.ai.difficulty().unwrap(), Difficulty::Godlike);
        assert_eq!(config.ai.deny_weight, 300);
        assert_eq!(config.ai.complete_weight, 1_000);
        assert_eq!(config.economy.initial_wallet, 250);
        assert_eq!(config.economy.costs.swap, 40);
    }

    #[test]
    fn test_unknown_difficulty_is_config_error() {
        let config = parse("[ai]\ndifficulty = \"Impossible\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_non_positive_dimension_is_config_error() {
        let config = parse("[[boards]]\nrows = 0\n\n[[boards]]\ncols = -2\n").unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Configuration { .. }
        ));
        assert!(config.registry().is_err());
    }

    #[test]
    fn test_line_longer_than_every_board_rejected() {
        let config = parse("line_length = 5\n").unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::Configuration { .. }
        ));

        let huge = parse("line_length = 9223372036854775807\n").unwrap();
        assert!(huge.validate().is_err());
        assert!(huge.registry().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = parse("[ai]\npositional_weight = -1\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = parse("boards = 7").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scoring]\nline = 20\n").unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.scoring.line, 20);
        assert_eq!(config.scoring.diagonal_3d, 50);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_from_path(Path::new("/nonexistent/hyperspace.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_default_registry_shape() {
        let reg = GameConfig::default().registry().unwrap();
        assert_eq!(reg.board_count(), 2);
        assert_eq!(reg.lines_for(0).len(), 76);
        assert_eq!(reg.lines_for(1).len(), 208);
        assert_eq!(reg.cross_board_lines().len(), 468);
    }
}
