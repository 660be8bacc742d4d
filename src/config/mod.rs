//! Configuration for the viewer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/codecopy/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Control labels
// ─────────────────────────────────────────────────────────────────────────────

/// Labels shown on a copy control in its three visual states.
#[derive(Debug, Clone)]
pub struct Labels {
    /// Idle label
    pub copy: String,
    /// Flash label after a successful copy
    pub copied: String,
    /// Flash label after a failed copy
    pub error: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            copy: "Copy".to_string(),
            copied: "Copied!".to_string(),
            error: "Error".to_string(),
        }
    }
}

/// Labels as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLabels {
    pub copy: Option<String>,
    pub copied: Option<String>,
    pub error: Option<String>,
}

impl Labels {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLabels>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            copy: file.copy.unwrap_or(defaults.copy),
            copied: file.copied.unwrap_or(defaults.copied),
            error: file.error.unwrap_or(defaults.error),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard tier selection
// ─────────────────────────────────────────────────────────────────────────────

/// Which clipboard tiers to offer the stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipboardTier {
    /// System clipboard first, legacy selection-copy as fallback (default)
    #[default]
    Auto,
    /// System clipboard only
    System,
    /// Legacy OSC 52 selection-copy only
    Osc52,
}

impl ClipboardTier {
    /// Parse tier string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "system" => Self::System,
            "osc52" => Self::Osc52,
            _ => Self::Auto, // Default to auto for unknown values
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::System => "system",
            Self::Osc52 => "osc52",
        }
    }
}

/// Clipboard settings as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileClipboard {
    pub tier: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LogRotation {
    /// Rotate log files hourly
    Hourly,
    /// Rotate log files daily (default)
    #[default]
    Daily,
    /// Never rotate - single log file
    Never,
}

impl LogRotation {
    /// Parse rotation string from config
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "daily" => Self::Daily,
            "never" => Self::Never,
            _ => Self::Daily, // Default to daily for unknown values
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Enable file logging (in addition to TUI buffer or stdout)
    pub file_enabled: bool,
    /// Directory for log files
    pub file_dir: PathBuf,
    /// Log file rotation strategy
    pub file_rotation: LogRotation,
    /// Prefix for log file names (e.g., "codecopy" -> "codecopy.2024-01-15.log")
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false, // Opt-in feature
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "codecopy".to_string(),
        }
    }
}

/// Logging settings as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::from_str(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How long an outcome flash stays on a control before reverting (ms)
    pub flash_ms: u64,

    /// Whether to run the TUI viewer (can be disabled for a headless
    /// augment-and-report pass)
    pub enable_tui: bool,

    /// Control labels
    pub labels: Labels,

    /// Clipboard tier preference
    pub clipboard_tier: ClipboardTier,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flash_ms: 2000,
            enable_tui: true,
            labels: Labels::default(),
            clipboard_tier: ClipboardTier::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub flash_ms: Option<u64>,

    /// Optional [labels] section
    pub labels: Option<FileLabels>,

    /// Optional [clipboard] section
    pub clipboard: Option<FileClipboard>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/codecopy/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("codecopy").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        // Create parent directory
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Use Config::default().to_toml() as single source of truth
        let template = Self::default().to_toml();

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, template);
    }

    /// Load file config if it exists
    ///
    /// A broken config fails fast with a clear error instead of silently
    /// falling back to defaults while the user debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: failed to parse config file {}", path.display());
                    eprintln!("  {}", e);
                    eprintln!("  To reset, run: codecopy config --reset");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Config file doesn't exist - use defaults
                FileConfig::default()
            }
            Err(e) => {
                eprintln!("Error: cannot read config file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file)
    }

    /// Merge a file config with env overrides and defaults.
    pub(crate) fn resolve(file: FileConfig) -> Self {
        // Flash duration: env > file > default
        let flash_ms = std::env::var("CODECOPY_FLASH_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(file.flash_ms)
            .unwrap_or(2000);

        // TUI toggle: env only (runtime flag)
        let enable_tui = std::env::var("CODECOPY_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        // Labels: file > defaults
        let labels = Labels::from_file(file.labels);

        // Clipboard tier: env > file > default
        let clipboard_tier = std::env::var("CODECOPY_CLIPBOARD")
            .ok()
            .map(|s| ClipboardTier::from_str(&s))
            .or_else(|| {
                file.clipboard
                    .and_then(|c| c.tier)
                    .map(|s| ClipboardTier::from_str(&s))
            })
            .unwrap_or_default();

        // Logging: file > defaults; CODECOPY_LOG overrides the level
        let mut logging = LoggingConfig::from_file(file.logging);
        if let Ok(level) = std::env::var("CODECOPY_LOG") {
            logging.level = level;
        }

        Self {
            flash_ms,
            enable_tui,
            labels,
            clipboard_tier,
            logging,
        }
    }
}
