//! Path management for chat-backup
//!
//! Resolves where backups are written and where settings are read from.
//!
//! ## Backups Root Resolution Order
//!
//! 1. Explicit override (the `--output` flag)
//! 2. `CHAT_BACKUP_ROOT` environment variable
//! 3. `backup_root` from settings
//! 4. `<home>/chat_backups`
//!
//! ## Config Directory Resolution Order
//!
//! 1. `CHAT_BACKUP_CONFIG_DIR` environment variable
//! 2. Platform config directory (`~/.config/chat-backup` on Linux)

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};

use super::settings::Settings;
use crate::error::BackupError;

/// Environment variable overriding the backups root
pub const ROOT_ENV_VAR: &str = "CHAT_BACKUP_ROOT";

/// Environment variable overriding the config directory
pub const CONFIG_ENV_VAR: &str = "CHAT_BACKUP_CONFIG_DIR";

/// Manages all paths used by chat-backup
#[derive(Debug, Clone)]
pub struct BackupPaths {
    /// Directory under which every session directory and archive lives
    backups_root: PathBuf,
    /// Directory holding settings.json
    config_dir: PathBuf,
}

impl BackupPaths {
    /// Resolve paths from the environment, settings and an optional override
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and nothing
    /// else names a backups root.
    pub fn resolve(
        config_dir: PathBuf,
        settings: &Settings,
        root_override: Option<PathBuf>,
    ) -> Result<Self, BackupError> {
        let backups_root = match root_override {
            Some(root) => root,
            None => match std::env::var(ROOT_ENV_VAR) {
                Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
                _ => match &settings.backup_root {
                    Some(root) => root.clone(),
                    None => default_backups_root()?,
                },
            },
        };

        Ok(Self {
            backups_root,
            config_dir,
        })
    }

    /// Create BackupPaths with explicit directories (useful for testing)
    pub fn with_dirs(backups_root: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            backups_root,
            config_dir,
        }
    }

    /// Get the backups root
    pub fn backups_root(&self) -> &Path {
        &self.backups_root
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        settings_file_in(&self.config_dir)
    }
}

/// Settings file location inside a config directory
pub fn settings_file_in(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.json")
}

/// Resolve the config directory
///
/// # Errors
///
/// Returns an error if the platform config directory cannot be determined.
pub fn resolve_config_dir() -> Result<PathBuf, BackupError> {
    if let Ok(custom) = std::env::var(CONFIG_ENV_VAR) {
        if !custom.is_empty() {
            return Ok(PathBuf::from(custom));
        }
    }

    ProjectDirs::from("", "", "chat-backup")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BackupError::Config("Could not determine config directory".into()))
}

/// Default backups root: `<home>/chat_backups`
fn default_backups_root() -> Result<PathBuf, BackupError> {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join("chat_backups"))
        .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))
}
