//! Configuration system for the `kanboard` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/kanboard/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use kanboard_proto::task::MAX_TASK_TITLE_LENGTH;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value for {key}: {reason}")]
    InvalidValue {
        /// Dotted key of the offending value.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    ui: UiFileConfig,
    drag: DragFileConfig,
    board: BoardFileConfig,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
}

/// `[drag]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DragFileConfig {
    activation_distance: Option<f64>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    file: Option<PathBuf>,
    max_task_title_len: Option<usize>,
    seed_demo: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,

    // -- Drag --
    /// Pointer travel in terminal cells before a press becomes a drag.
    pub activation_distance: f64,

    // -- Board --
    /// Board snapshot file. `None` keeps the board in memory only.
    pub board_file: Option<PathBuf>,
    /// Maximum task title length in characters.
    pub max_task_title_len: usize,
    /// Start from the demo board when no board file exists.
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
            timestamp_format: "%H:%M".to_string(),
            activation_distance: 2.0,
            board_file: None,
            max_task_title_len: MAX_TASK_TITLE_LENGTH,
            seed_demo: true,
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path (`~/.config/kanboard/config.toml`)
    /// is tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if a resolved value is out of range.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        config.validate()?;
        Ok(config)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
            activation_distance: cli
                .drag_distance
                .or(file.drag.activation_distance)
                .unwrap_or(defaults.activation_distance),
            board_file: cli.board_file.clone().or_else(|| file.board.file.clone()),
            max_task_title_len: file
                .board
                .max_task_title_len
                .unwrap_or(defaults.max_task_title_len),
            seed_demo: !cli.empty && file.board.seed_demo.unwrap_or(defaults.seed_demo),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.activation_distance.is_finite() || self.activation_distance < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "drag.activation_distance",
                reason: format!("expected a non-negative number, got {}", self.activation_distance),
            });
        }
        if self.max_task_title_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "board.max_task_title_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal Kanban board with drag-and-drop")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/kanboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board snapshot file to load and save.
    #[arg(short, long, env = "KANBOARD_FILE")]
    pub board_file: Option<PathBuf>,

    /// Start with an empty board instead of the demo tasks.
    #[arg(long)]
    pub empty: bool,

    /// Pointer travel in cells before a press starts a drag.
    #[arg(long)]
    pub drag_distance: Option<f64>,

    /// Timestamp display format (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "KANBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/kanboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir, use defaults
            return Ok(ConfigFile::default());
        };
        config_dir.join("kanboard").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
