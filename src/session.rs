//! Backup session identity
//!
//! A [`BackupSession`] is built once per run and handed by reference to every
//! later stage. It owns the only copy of the captured text, so all artifacts
//! describe the same content.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::capture::Capture;
use crate::error::{BackupError, BackupResult};

/// Prefix shared by every session id and directory
pub const SESSION_PREFIX: &str = "chat_backup_";

/// Fixed relative paths inside a session directory
pub mod layout {
    pub const TEXT_DIR: &str = "text";
    pub const HTML_DIR: &str = "html";
    pub const JSON_DIR: &str = "json";
    pub const MEDIA_DIR: &str = "media";
    pub const LOGS_DIR: &str = "logs";

    /// Every category directory, created before anything is written
    pub const CATEGORY_DIRS: [&str; 5] = [TEXT_DIR, HTML_DIR, JSON_DIR, MEDIA_DIR, LOGS_DIR];

    pub const CLIPBOARD_FILE: &str = "text/clipboard.txt";
    pub const HISTORY_FILE: &str = "text/chat_history.txt";
    pub const HTML_FILE: &str = "html/chat_conversation.html";
    pub const JSON_FILE: &str = "json/chat_data.json";
    pub const SUMMARY_FILE: &str = "BACKUP_SUMMARY.txt";
}

/// Where the session's text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Read from a capture source (text may still be empty)
    Captured { source: String },
    /// No source worked; `raw_text` holds the sentinel
    Sentinel { reason: String },
}

/// Identity and content of one backup run
#[derive(Debug, Clone)]
pub struct BackupSession {
    id: String,
    created_at: DateTime<Utc>,
    root_path: PathBuf,
    raw_text: String,
    origin: ContentOrigin,
}

impl BackupSession {
    /// Create the session and its directory tree under `backups_root`
    ///
    /// An unavailable capture is replaced by `sentinel` so that renderers
    /// never have to special-case missing input.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryCreation` if any directory cannot be created.
    pub fn create(
        backups_root: &Path,
        created_at: DateTime<Utc>,
        capture: Capture,
        sentinel: &str,
    ) -> BackupResult<Self> {
        let id = session_id(&created_at.with_timezone(&Local));
        let root_path = backups_root.join(&id);

        let (raw_text, origin) = match capture {
            Capture::Captured { text, source } => (text, ContentOrigin::Captured { source }),
            Capture::Unavailable { reason } => {
                (sentinel.to_string(), ContentOrigin::Sentinel { reason })
            }
        };

        let session = Self {
            id,
            created_at,
            root_path,
            raw_text,
            origin,
        };
        session.ensure_directories()?;

        Ok(session)
    }

    fn ensure_directories(&self) -> BackupResult<()> {
        for dir in layout::CATEGORY_DIRS {
            let path = self.root_path.join(dir);
            fs::create_dir_all(&path).map_err(|e| BackupError::DirectoryCreation {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Session id, `chat_backup_YYYYMMDD_HHMMSS`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time (UTC)
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Creation time in the local timezone
    pub fn created_at_local(&self) -> DateTime<Local> {
        self.created_at.with_timezone(&Local)
    }

    /// Session directory
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The captured text (or sentinel)
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn origin(&self) -> &ContentOrigin {
        &self.origin
    }

    /// Whether `raw_text` is the sentinel placeholder
    pub fn is_sentinel(&self) -> bool {
        matches!(self.origin, ContentOrigin::Sentinel { .. })
    }

    /// Absolute path of a file inside the session
    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root_path.join(relative)
    }
}

/// Format a session id from a wall-clock time
pub fn session_id<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}", SESSION_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn captured(text: &str) -> Capture {
        Capture::Captured {
            text: text.into(),
            source: "test".into(),
        }
    }

    #[test]
    fn test_session_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 5).unwrap();
        assert_eq!(session_id(&at), "chat_backup_20261019_143005");
    }

    #[test]
    fn test_ids_differ_across_seconds() {
        let first = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 5).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 6).unwrap();
        assert_ne!(session_id(&first), session_id(&second));
    }

    #[test]
    fn test_create_builds_directory_tree() {
        let temp_dir = TempDir::new().unwrap();
        let session =
            BackupSession::create(temp_dir.path(), Utc::now(), captured("hello"), "sentinel")
                .unwrap();

        assert!(session.id().starts_with(SESSION_PREFIX));
        assert_eq!(session.root_path(), temp_dir.path().join(session.id()));
        for dir in layout::CATEGORY_DIRS {
            assert!(session.root_path().join(dir).is_dir(), "missing {}", dir);
        }
        assert_eq!(session.raw_text(), "hello");
        assert!(!session.is_sentinel());
    }

    #[test]
    fn test_unavailable_capture_uses_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let capture = Capture::Unavailable {
            reason: "no tools".into(),
        };
        let session = BackupSession::create(
            temp_dir.path(),
            Utc::now(),
            capture,
            "Manual paste required",
        )
        .unwrap();

        assert_eq!(session.raw_text(), "Manual paste required");
        assert!(session.is_sentinel());
    }

    #[test]
    fn test_unwritable_root_is_directory_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the backups root should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = BackupSession::create(&blocker, Utc::now(), captured("x"), "s").unwrap_err();
        assert!(matches!(err, BackupError::DirectoryCreation { .. }));
        assert!(err.is_fatal());
    }
}
