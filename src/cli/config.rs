//! Config CLI command

use crate::config::{BackupPaths, Settings};

/// Print the resolved paths and settings
pub fn handle_config_command(paths: &BackupPaths, settings: &Settings) {
    println!("chat-backup Configuration");
    println!("=========================");
    println!("Config directory: {}", paths.config_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Backups root:     {}", paths.backups_root().display());
    println!();
    println!("Settings:");
    println!("  Create archive:   {}", settings.archive);
    println!("  Placeholder text: {}", settings.sentinel_text);
    println!("  Timestamp format: {}", settings.timestamp_format);
    println!("  HTML title:       {}", settings.html_title);
}
