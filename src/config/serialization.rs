//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        format!(
            r#"# codecopy configuration

# How long an outcome flash stays on a copy control before reverting (ms)
flash_ms = {flash_ms}

# Control labels
[labels]
copy = "{copy}"
copied = "{copied}"
error = "{error}"

# Clipboard tier: auto, system, osc52
# auto tries the system clipboard first and falls back to the OSC 52
# selection-copy path when no system clipboard is available
[clipboard]
tier = "{tier}"

# Logging configuration (CODECOPY_LOG env var overrides the level)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            flash_ms = self.flash_ms,
            copy = self.labels.copy,
            copied = self.labels.copied,
            error = self.labels.error,
            tier = self.clipboard_tier.as_str(),
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
