//! User settings for chat-backup
//!
//! Manages user preferences such as the backups root, whether to build the
//! compressed archive, and the placeholder text used when no clipboard is
//! available.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::settings_file_in;
use crate::error::BackupError;

/// User settings for chat-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Where backups are written (None = `<home>/chat_backups`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,

    /// Whether to compress each session into a `.tar.gz`
    #[serde(default = "default_archive")]
    pub archive: bool,

    /// Text substituted when no clipboard mechanism is available
    #[serde(default = "default_sentinel_text")]
    pub sentinel_text: String,

    /// Human-readable timestamp format (strftime), local time
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Title shown in the HTML banner
    #[serde(default = "default_html_title")]
    pub html_title: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_archive() -> bool {
    true
}

fn default_sentinel_text() -> String {
    "Manual paste required".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_html_title() -> String {
    "Chat Conversation Backup".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_root: None,
            archive: default_archive(),
            sentinel_text: default_sentinel_text(),
            timestamp_format: default_timestamp_format(),
            html_title: default_html_title(),
        }
    }
}

impl Settings {
    /// Load settings from `config_dir`, or defaults if the file doesn't exist
    pub fn load_or_default(config_dir: &Path) -> Result<Self, BackupError> {
        let settings_path = settings_file_in(config_dir);

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BackupError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BackupError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would fail later in the pipeline
    pub fn validate(&self) -> Result<(), BackupError> {
        let invalid = StrftimeItems::new(&self.timestamp_format)
            .any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(BackupError::Config(format!(
                "Invalid timestamp_format: {}",
                self.timestamp_format
            )));
        }
        Ok(())
    }

    /// Save settings to `config_dir`
    pub fn save(&self, config_dir: &Path) -> Result<(), BackupError> {
        std::fs::create_dir_all(config_dir).map_err(|e| {
            BackupError::Io(format!("Failed to create config directory: {}", e))
        })?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BackupError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(settings_file_in(config_dir), contents)
            .map_err(|e| BackupError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.archive);
        assert_eq!(settings.sentinel_text, "Manual paste required");
        assert!(settings.backup_root.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(settings.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let settings = Settings {
            archive: false,
            sentinel_text: "paste here".into(),
            ..Settings::default()
        };
        settings.save(temp_dir.path()).unwrap();

        let loaded = Settings::load_or_default(temp_dir.path()).unwrap();
        assert!(!loaded.archive);
        assert_eq!(loaded.sentinel_text, "paste here");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"archive": false}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_default(temp_dir.path()).unwrap();
        assert!(!loaded.archive);
        assert_eq!(loaded.html_title, "Chat Conversation Backup");
    }

    #[test]
    fn test_invalid_timestamp_format_rejected() {
        let settings = Settings {
            timestamp_format: "%Y-%Q".into(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(BackupError::Config(_))));
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "not json").unwrap();

        let err = Settings::load_or_default(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BackupError::Config(_)));
    }
}
