//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILBOARD_CONFIG` (environment variable)
//! 2. `~/.config/mailboard/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailboard\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{Board, Column, ColumnId};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Starting board and column defaults.
    pub board: BoardConfig,
    /// Bulk import defaults.
    pub import: ImportConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// One column of the starting board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSeed {
    pub id: String,
    pub title: String,
    pub color: String,
}

/// Starting board and column defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Columns of the board used when no board file is given.
    pub columns: Vec<ColumnSeed>,
}

/// Bulk import defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Column that receives imported emails.
    pub target_column: String,
    /// Upper bound on records taken from one import file.
    pub max_results: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let seed = |id: &str, title: &str, color: &str| ColumnSeed {
            id: id.to_string(),
            title: title.to_string(),
            color: color.to_string(),
        };
        Self {
            columns: vec![
                seed("todo", "To Do", "from-blue-500 to-cyan-500"),
                seed("in-progress", "In Progress", "from-yellow-500 to-orange-500"),
                seed("waiting", "Waiting for Reply", "from-purple-500 to-pink-500"),
                seed("done", "Completed", "from-green-500 to-emerald-500"),
            ],
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            target_column: "todo".to_string(),
            max_results: 50,
        }
    }
}

impl BoardConfig {
    /// An empty board with the configured columns.
    pub fn seed_board(&self) -> Board {
        Board::new(
            self.columns
                .iter()
                .map(|c| Column::new(c.id.as_str(), c.title.as_str(), c.color.as_str()))
                .collect(),
        )
    }
}

impl ImportConfig {
    pub fn target(&self) -> ColumnId {
        ColumnId::from(self.target_column.as_str())
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<()> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (env var first, then the standard dir).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILBOARD_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("mailboard").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailboard")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("mailboard.log")
}
