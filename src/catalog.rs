//! Listing of previous backups under a backups root

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::{BackupError, BackupResult};
use crate::manifest::Manifest;
use crate::session::{layout, SESSION_PREFIX};

/// Metadata about one backup session found on disk
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session id (directory or archive stem)
    pub id: String,
    /// Wall-clock time encoded in the id
    pub created_at: NaiveDateTime,
    /// Session directory, if it still exists
    pub directory: Option<PathBuf>,
    /// Archive file, if one exists
    pub archive: Option<PathBuf>,
    /// Total size of the directory's files, or of the archive if only that remains
    pub size_bytes: u64,
    /// Number of files in the directory (0 when only the archive remains)
    pub file_count: usize,
}

/// List every session under `backups_root`, newest first
pub fn list_sessions(backups_root: &Path) -> BackupResult<Vec<SessionInfo>> {
    if !backups_root.exists() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<SessionInfo> = Vec::new();

    for entry in fs::read_dir(backups_root)
        .map_err(|e| BackupError::Io(format!("Failed to read backups directory: {}", e)))?
    {
        let entry = entry
            .map_err(|e| BackupError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        let (id, is_archive) = match name.strip_suffix(".tar.gz") {
            Some(stem) if path.is_file() => (stem.to_string(), true),
            None if path.is_dir() => (name.clone(), false),
            _ => continue,
        };

        let Some(created_at) = parse_session_timestamp(&id) else {
            continue;
        };

        let contents = if is_archive {
            None
        } else {
            match Manifest::build(&path, &[]) {
                // The summary is counted but not sized by the manifest
                Ok(manifest) => Some((
                    manifest.entries.len()
                        + usize::from(path.join(layout::SUMMARY_FILE).is_file()),
                    manifest.total_size_bytes,
                )),
                Err(e) => {
                    warn!(session = %id, error = %e, "skipping unreadable backup");
                    continue;
                }
            }
        };

        let index = match sessions.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                sessions.push(SessionInfo {
                    id: id.clone(),
                    created_at,
                    directory: None,
                    archive: None,
                    size_bytes: 0,
                    file_count: 0,
                });
                sessions.len() - 1
            }
        };
        let info = &mut sessions[index];

        match contents {
            None => info.archive = Some(path),
            Some((file_count, size_bytes)) => {
                info.file_count = file_count;
                info.size_bytes = size_bytes;
                info.directory = Some(path);
            }
        }
    }

    for info in &mut sessions {
        if info.directory.is_none() {
            if let Some(archive) = &info.archive {
                info.size_bytes = fs::metadata(archive).map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    Ok(sessions)
}

/// Parse the time out of `chat_backup_YYYYMMDD_HHMMSS`
pub fn parse_session_timestamp(id: &str) -> Option<NaiveDateTime> {
    let rest = id.strip_prefix(SESSION_PREFIX)?;
    let (date_part, time_part) = rest.split_once('_')?;

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}
