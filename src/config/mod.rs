//! Configuration module for chat-backup
//!
//! This module provides configuration management including:
//! - Backups root and config directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BackupPaths;
pub use settings::Settings;
