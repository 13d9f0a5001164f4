//! Session archiving
//!
//! Compressing is the last, best-effort step of a run. A failure never
//! touches the session directory: the uncompressed tree stays the backup of
//! record and only the partially written archive file is removed.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{BackupError, BackupResult};

/// Packs a finished session directory into a single file
pub trait Archiver {
    /// Archive `session_dir` into `target`, returning the written path
    fn archive(&self, session_dir: &Path, target: &Path) -> BackupResult<PathBuf>;
}

/// gzip-compressed tarball; entries are stored under the session's directory name
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchiver {
    level: Option<u32>,
}

impl TarGzArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit gzip level (0-9)
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Some(level.min(9)),
        }
    }

    fn compression(&self) -> Compression {
        self.level.map(Compression::new).unwrap_or_default()
    }

    fn write_archive(&self, session_dir: &Path, target: &Path) -> BackupResult<()> {
        let prefix = session_dir
            .file_name()
            .ok_or_else(|| {
                BackupError::Archive(format!(
                    "Session path has no directory name: {}",
                    session_dir.display()
                ))
            })?
            .to_owned();

        let file = File::create(target).map_err(|e| {
            BackupError::Archive(format!("Failed to create {}: {}", target.display(), e))
        })?;

        let encoder = GzEncoder::new(file, self.compression());
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);

        builder
            .append_dir_all(&prefix, session_dir)
            .map_err(|e| BackupError::Archive(format!("Failed to add files: {}", e)))?;

        let encoder = builder
            .into_inner()
            .map_err(|e| BackupError::Archive(format!("Failed to finish tar stream: {}", e)))?;
        let mut file = encoder
            .finish()
            .map_err(|e| BackupError::Archive(format!("Failed to finish gzip stream: {}", e)))?;
        file.flush()
            .map_err(|e| BackupError::Archive(format!("Failed to flush archive: {}", e)))?;

        Ok(())
    }
}

impl Archiver for TarGzArchiver {
    fn archive(&self, session_dir: &Path, target: &Path) -> BackupResult<PathBuf> {
        if !session_dir.is_dir() {
            return Err(BackupError::Archive(format!(
                "Session directory not found: {}",
                session_dir.display()
            )));
        }

        if let Err(e) = self.write_archive(session_dir, target) {
            if target.exists() {
                if let Err(cleanup) = fs::remove_file(target) {
                    let reason = match e {
                        BackupError::Archive(reason) => reason,
                        other => other.to_string(),
                    };
                    return Err(BackupError::Archive(format!(
                        "{}; partial archive {} could not be removed: {}",
                        reason,
                        target.display(),
                        cleanup
                    )));
                }
            }
            return Err(e);
        }

        Ok(target.to_path_buf())
    }
}
