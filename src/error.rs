//! Custom error types for chat-backup
//!
//! This module defines the error hierarchy for the backup pipeline using
//! thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for chat-backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// No clipboard mechanism produced any content
    #[error("Clipboard capture failed: {0}")]
    Capture(String),

    /// The session directory tree could not be created (fatal)
    #[error("Failed to create directory {}: {reason}", path.display())]
    DirectoryCreation { path: PathBuf, reason: String },

    /// A single artifact could not be rendered or written
    #[error("Failed to render {artifact}: {reason}")]
    Render { artifact: String, reason: String },

    /// Compressing the session directory failed
    #[error("Archive error: {0}")]
    Archive(String),
}

impl BackupError {
    /// Create a render error for the artifact at `artifact`
    pub fn render(artifact: impl Into<String>, reason: impl ToString) -> Self {
        Self::Render {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryCreation { .. } | Self::Config(_))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for chat-backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_render_error() {
        let err = BackupError::render("json/chat_data.json", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to render json/chat_data.json: disk full"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_directory_creation_is_fatal() {
        let err = BackupError::DirectoryCreation {
            path: PathBuf::from("/nope"),
            reason: "read-only file system".into(),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
