//! Configuration tests
//!
//! Round-trip guards: the serialized default config must parse back, and
//! file values must survive the merge. Exactly one test touches the
//! CODECOPY_* env vars - keep it that way, tests share the process
//! environment.

use super::*;

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that serialized config can be parsed back.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    // Should parse without error
    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Every persisted value must survive serialize -> parse -> resolve.
#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.flash_ms = 750;
    config.labels.copy = "Yank".to_string();
    config.labels.copied = "Yanked!".to_string();
    config.labels.error = "Failed".to_string();
    config.clipboard_tier = ClipboardTier::Osc52;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let parsed: FileConfig = toml::from_str(&config.to_toml()).expect("round-trip parse");

    assert_eq!(parsed.flash_ms, Some(750));
    let labels = Labels::from_file(parsed.labels);
    assert_eq!(labels.copy, "Yank");
    assert_eq!(labels.copied, "Yanked!");
    assert_eq!(labels.error, "Failed");
    assert_eq!(
        parsed.clipboard.and_then(|c| c.tier).as_deref(),
        Some("osc52")
    );
    let logging = LoggingConfig::from_file(parsed.logging);
    assert_eq!(logging.level, "debug");
    assert!(logging.file_enabled);
    assert_eq!(logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Merge behavior
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let parsed: FileConfig = toml::from_str("flash_ms = 100\n").unwrap();
    assert_eq!(parsed.flash_ms, Some(100));

    let labels = Labels::from_file(parsed.labels);
    assert_eq!(labels.copy, "Copy");
    assert_eq!(labels.copied, "Copied!");
    assert_eq!(labels.error, "Error");

    let logging = LoggingConfig::from_file(parsed.logging);
    assert_eq!(logging.level, "info");
    assert!(!logging.file_enabled);
}

#[test]
fn test_partial_labels_section_merges_with_defaults() {
    let parsed: FileConfig = toml::from_str("[labels]\ncopied = \"Done\"\n").unwrap();
    let labels = Labels::from_file(parsed.labels);
    assert_eq!(labels.copy, "Copy");
    assert_eq!(labels.copied, "Done");
    assert_eq!(labels.error, "Error");
}

#[test]
fn test_env_overrides_beat_file_values() {
    let parsed: FileConfig =
        toml::from_str("flash_ms = 100\n[clipboard]\ntier = \"system\"\n").unwrap();

    std::env::set_var("CODECOPY_FLASH_MS", "300");
    std::env::set_var("CODECOPY_CLIPBOARD", "osc52");
    let config = Config::resolve(parsed);
    std::env::remove_var("CODECOPY_FLASH_MS");
    std::env::remove_var("CODECOPY_CLIPBOARD");

    assert_eq!(config.flash_ms, 300);
    assert_eq!(config.clipboard_tier, ClipboardTier::Osc52);
}

#[test]
fn test_unknown_tier_falls_back_to_auto() {
    assert_eq!(ClipboardTier::from_str("wayland"), ClipboardTier::Auto);
    assert_eq!(ClipboardTier::from_str("SYSTEM"), ClipboardTier::System);
    assert_eq!(ClipboardTier::from_str("osc52"), ClipboardTier::Osc52);
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::from_str("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::from_str("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::from_str("never"), LogRotation::Never);
}
