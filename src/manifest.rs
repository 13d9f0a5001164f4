//! Backup manifest and summary report
//!
//! The manifest is built by walking the session directory after every
//! renderer has finished, so it reflects what is actually on disk rather
//! than what was intended. The summary file it renders is counted in
//! `total_file_count` but cannot report its own size.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackupError, BackupResult};
use crate::render::{self, ArtifactFormat, RenderedArtifact};
use crate::session::{layout, BackupSession, ContentOrigin};
use crate::stats::TextStatistics;

/// One file found in the session tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub relative_path: String,
    pub format: ArtifactFormat,
    pub size_bytes: u64,
}

/// Listing of every file in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Files on disk, sorted by path, excluding the summary itself
    pub entries: Vec<ManifestEntry>,
    /// Sum of `entries` sizes
    pub total_size_bytes: u64,
    /// `entries` plus the summary file
    pub total_file_count: usize,
}

impl Manifest {
    /// Walk the session tree and record every file
    ///
    /// `written` supplies the format of each artifact the pipeline produced;
    /// anything else found on disk is classified by extension.
    pub fn build(root: &Path, written: &[RenderedArtifact]) -> BackupResult<Self> {
        let mut files = Vec::new();
        collect_files(root, root, &mut files)?;
        files.sort();

        let entries: Vec<ManifestEntry> = files
            .into_iter()
            .filter(|(relative, _)| relative != layout::SUMMARY_FILE)
            .map(|(relative_path, size_bytes)| {
                let format = written
                    .iter()
                    .find(|a| a.relative_path == relative_path)
                    .map(|a| a.format)
                    .unwrap_or_else(|| ArtifactFormat::from_extension(&relative_path));
                ManifestEntry {
                    relative_path,
                    format,
                    size_bytes,
                }
            })
            .collect();

        let total_size_bytes = entries.iter().map(|e| e.size_bytes).sum();
        let total_file_count = entries.len() + 1;

        Ok(Self {
            entries,
            total_size_bytes,
            total_file_count,
        })
    }

    /// Render the human-readable summary
    pub fn render_summary(
        &self,
        session: &BackupSession,
        stats: TextStatistics,
        timestamp_format: &str,
        archive_name: Option<&str>,
    ) -> String {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);
        let width = self
            .entries
            .iter()
            .map(|e| e.relative_path.len())
            .chain(std::iter::once(layout::SUMMARY_FILE.len()))
            .max()
            .unwrap_or(0);

        let mut lines = vec![
            rule.clone(),
            "CHAT BACKUP SUMMARY".to_string(),
            rule.clone(),
            format!("Backup ID: {}", session.id()),
            format!(
                "Created:   {}",
                session.created_at_local().format(timestamp_format)
            ),
            format!("Location:  {}", session.root_path().display()),
        ];

        match session.origin() {
            ContentOrigin::Captured { source } => {
                lines.push(format!("Source:    {}", source));
            }
            ContentOrigin::Sentinel { reason } => {
                lines.push("Source:    none (placeholder text used)".to_string());
                lines.push(format!("Reason:    {}", reason));
            }
        }

        lines.push(String::new());
        lines.push("CONTENT STATISTICS".to_string());
        lines.push(thin.clone());
        lines.push(format!("  Lines:      {}", stats.lines));
        lines.push(format!("  Words:      {}", stats.words));
        lines.push(format!("  Characters: {}", stats.characters));

        lines.push(String::new());
        lines.push("FILES".to_string());
        lines.push(thin.clone());
        for entry in &self.entries {
            lines.push(format!(
                "  {:<width$}  {:>10}  {}",
                entry.relative_path,
                format_size(entry.size_bytes),
                entry.format,
                width = width
            ));
        }
        lines.push(format!(
            "  {:<width$}  {:>10}  {}",
            layout::SUMMARY_FILE,
            "-",
            ArtifactFormat::Summary,
            width = width
        ));

        lines.push(String::new());
        lines.push(format!(
            "Total files: {} (including this summary)",
            self.total_file_count
        ));
        lines.push(format!(
            "Total size:  {} (excluding this summary)",
            format_size(self.total_size_bytes)
        ));
        if let Some(name) = archive_name {
            lines.push(format!("Archive:     {}", name));
        }
        lines.push(rule);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the summary into the session as `BACKUP_SUMMARY.txt`
    pub fn write_summary(
        &self,
        session: &BackupSession,
        stats: TextStatistics,
        timestamp_format: &str,
        archive_name: Option<&str>,
    ) -> BackupResult<RenderedArtifact> {
        let summary = self.render_summary(session, stats, timestamp_format, archive_name);
        render::write_file(
            session,
            layout::SUMMARY_FILE,
            ArtifactFormat::Summary,
            &summary,
        )
    }
}

/// Recursively collect `(relative_path, size)` for every regular file
fn collect_files(root: &Path, dir: &Path, files: &mut Vec<(String, u64)>) -> BackupResult<()> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| BackupError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

    for entry in read_dir {
        let entry = entry
            .map_err(|e| BackupError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        let metadata = entry
            .metadata()
            .map_err(|e| BackupError::Io(format!("Failed to stat {}: {}", path.display(), e)))?;

        if metadata.is_dir() {
            collect_files(root, &path, files)?;
        } else if metadata.is_file() {
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((relative, metadata.len()));
        }
    }

    Ok(())
}

/// Format a byte count for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Capture;
    use chrono::Utc;
    use tempfile::TempDir;

    fn session(temp_dir: &TempDir) -> BackupSession {
        let capture = Capture::Captured {
            text: "hello".into(),
            source: "test".into(),
        };
        BackupSession::create(temp_dir.path(), Utc::now(), capture, "sentinel").unwrap()
    }

    #[test]
    fn test_build_walks_tree() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);
        fs::write(session.path_of(layout::HISTORY_FILE), "12345").unwrap();
        fs::write(session.path_of(layout::JSON_FILE), "{}").unwrap();

        let written = vec![RenderedArtifact {
            relative_path: layout::JSON_FILE.to_string(),
            format: ArtifactFormat::Json,
            size_bytes: 2,
        }];
        let manifest = Manifest::build(session.root_path(), &written).unwrap();

        let paths: Vec<_> = manifest
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec![layout::JSON_FILE, layout::HISTORY_FILE]);
        assert_eq!(manifest.total_size_bytes, 7);
        assert_eq!(manifest.total_file_count, 3);
    }

    #[test]
    fn test_empty_directories_not_counted() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);

        let manifest = Manifest::build(session.root_path(), &[]).unwrap();
        assert!(manifest.entries.is_empty());
        assert_eq!(manifest.total_file_count, 1);
        assert_eq!(manifest.total_size_bytes, 0);
    }

    #[test]
    fn test_previous_summary_is_not_listed() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);
        fs::write(session.path_of(layout::SUMMARY_FILE), "old summary").unwrap();

        let manifest = Manifest::build(session.root_path(), &[]).unwrap();
        assert!(manifest.entries.is_empty());
        assert_eq!(manifest.total_file_count, 1);
    }

    #[test]
    fn test_summary_report() {
        let temp_dir = TempDir::new().unwrap();
        let session = session(&temp_dir);
        fs::write(session.path_of(layout::CLIPBOARD_FILE), "hello").unwrap();

        let manifest = Manifest::build(session.root_path(), &[]).unwrap();
        let stats = TextStatistics::compute(session.raw_text());
        let archive = format!("{}.tar.gz", session.id());
        let summary = manifest.render_summary(&session, stats, "%Y-%m-%d", Some(&archive));

        assert!(summary.contains(&format!("Backup ID: {}", session.id())));
        assert!(summary.contains("text/clipboard.txt"));
        assert!(summary.contains("5 B"));
        assert!(summary.contains("Total files: 2 (including this summary)"));
        assert!(summary.contains(&format!("Archive:     {}", archive)));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }
}
