//! The capture-transform-package pipeline
//!
//! Stages run strictly in order:
//!
//! 1. capture (once)
//! 2. session construction: directories created, fatal on failure
//! 3. raw clipboard file, skipped with a warning when there is no content
//! 4. statistics, computed once
//! 5. text, HTML and JSON renderers; a failure loses only that artifact
//! 6. manifest and summary, built from what is actually on disk
//! 7. archive, best effort
//!
//! Only directory creation aborts a run. Every other problem is collected in
//! the [`BackupReport`] so the caller can show it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::archive::Archiver;
use crate::capture::{self, CaptureSource};
use crate::config::Settings;
use crate::error::{BackupError, BackupResult};
use crate::manifest::Manifest;
use crate::render::{
    self, ArtifactFormat, HtmlRenderer, JsonRenderer, PlainTextRenderer, RenderedArtifact,
    Renderer,
};
use crate::session::{layout, BackupSession, ContentOrigin};
use crate::stats::TextStatistics;

/// Options for one run, usually taken from [`Settings`]
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub sentinel_text: String,
    pub timestamp_format: String,
    pub html_title: String,
    pub archive: bool,
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            sentinel_text: settings.sentinel_text.clone(),
            timestamp_format: settings.timestamp_format.clone(),
            html_title: settings.html_title.clone(),
            archive: settings.archive,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Archive outcome
#[derive(Debug)]
pub enum ArchiveStatus {
    Created(PathBuf),
    Disabled,
    Failed(BackupError),
}

/// What a run produced
#[derive(Debug)]
pub struct BackupReport {
    pub session: BackupSession,
    pub statistics: TextStatistics,
    /// Artifacts written, summary included when it succeeded
    pub artifacts: Vec<RenderedArtifact>,
    /// Artifacts that could not be written
    pub failures: Vec<BackupError>,
    /// Non-fatal conditions (empty capture, sentinel used)
    pub warnings: Vec<String>,
    pub manifest: Option<Manifest>,
    pub archive: ArchiveStatus,
}

impl BackupReport {
    /// Every artifact was written (archive and warnings aside)
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn artifact(&self, format: ArtifactFormat) -> Option<&RenderedArtifact> {
        self.artifacts.iter().find(|a| a.format == format)
    }
}

/// Runs backups into one backups root
pub struct BackupPipeline<'a> {
    backups_root: PathBuf,
    options: PipelineOptions,
    source: &'a dyn CaptureSource,
    archiver: &'a dyn Archiver,
}

impl<'a> BackupPipeline<'a> {
    pub fn new(
        backups_root: impl Into<PathBuf>,
        options: PipelineOptions,
        source: &'a dyn CaptureSource,
        archiver: &'a dyn Archiver,
    ) -> Self {
        Self {
            backups_root: backups_root.into(),
            options,
            source,
            archiver,
        }
    }

    pub fn backups_root(&self) -> &Path {
        &self.backups_root
    }

    /// Run one backup stamped with the current time
    pub fn run(&self) -> BackupResult<BackupReport> {
        self.run_at(Utc::now())
    }

    /// Run one backup stamped with `now`
    ///
    /// # Errors
    ///
    /// Returns `DirectoryCreation` if the session tree cannot be created.
    /// All other failures are reported in the returned [`BackupReport`].
    pub fn run_at(&self, now: DateTime<Utc>) -> BackupResult<BackupReport> {
        let mut warnings = Vec::new();
        let mut failures = Vec::new();
        let mut artifacts = Vec::new();

        let capture = capture::capture(self.source);
        let has_content = capture.has_content();

        let session = BackupSession::create(
            &self.backups_root,
            now,
            capture,
            &self.options.sentinel_text,
        )?;
        info!(id = session.id(), root = %session.root_path().display(), "backup session created");

        match session.origin() {
            ContentOrigin::Sentinel { reason } => {
                warn!(%reason, "clipboard unavailable, using placeholder text");
                warnings.push(format!(
                    "Nothing could be captured ({}); placeholder text \"{}\" was backed up",
                    reason, self.options.sentinel_text
                ));
            }
            ContentOrigin::Captured { .. } if !has_content => {
                warn!("clipboard is empty");
                warnings.push(format!(
                    "Clipboard is empty; {} was not written",
                    layout::CLIPBOARD_FILE
                ));
            }
            ContentOrigin::Captured { .. } => {}
        }

        if has_content {
            match render::write_file(
                &session,
                layout::CLIPBOARD_FILE,
                ArtifactFormat::Text,
                session.raw_text(),
            ) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    warn!(error = %e, "failed to write clipboard file");
                    failures.push(e);
                }
            }
        } else {
            // A same-second rerun must not ship the previous run's text
            let stale = session.path_of(layout::CLIPBOARD_FILE);
            if stale.exists() {
                if let Err(e) = fs::remove_file(&stale) {
                    warn!(error = %e, "failed to remove stale clipboard file");
                    warnings.push(format!(
                        "Could not remove {} left by an earlier run: {}",
                        layout::CLIPBOARD_FILE,
                        e
                    ));
                }
            }
        }

        let statistics = TextStatistics::compute(session.raw_text());
        debug!(?statistics, "statistics computed");

        let renderers: [Box<dyn Renderer>; 3] = [
            Box::new(PlainTextRenderer::new(&self.options.timestamp_format)),
            Box::new(HtmlRenderer::new(
                &self.options.html_title,
                &self.options.timestamp_format,
            )),
            Box::new(JsonRenderer),
        ];

        for renderer in &renderers {
            match render::write_artifact(renderer.as_ref(), &session, statistics) {
                Ok(artifact) => {
                    debug!(path = %artifact.relative_path, size = artifact.size_bytes, "artifact written");
                    artifacts.push(artifact);
                }
                Err(e) => {
                    warn!(error = %e, "artifact failed");
                    failures.push(e);
                }
            }
        }

        let archive_target = self
            .options
            .archive
            .then(|| self.backups_root.join(format!("{}.tar.gz", session.id())));
        let archive_name = archive_target
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());

        let manifest = match Manifest::build(session.root_path(), &artifacts) {
            Ok(manifest) => {
                match manifest.write_summary(
                    &session,
                    statistics,
                    &self.options.timestamp_format,
                    archive_name.as_deref(),
                ) {
                    Ok(artifact) => artifacts.push(artifact),
                    Err(e) => {
                        warn!(error = %e, "summary failed");
                        failures.push(e);
                    }
                }
                Some(manifest)
            }
            Err(e) => {
                warn!(error = %e, "manifest failed");
                failures.push(e);
                None
            }
        };

        let archive = match archive_target {
            None => ArchiveStatus::Disabled,
            Some(target) => match self.archiver.archive(session.root_path(), &target) {
                Ok(path) => {
                    info!(path = %path.display(), "archive created");
                    ArchiveStatus::Created(path)
                }
                Err(e) => {
                    warn!(error = %e, "archive failed, uncompressed backup kept");
                    ArchiveStatus::Failed(e)
                }
            },
        };

        Ok(BackupReport {
            session,
            statistics,
            artifacts,
            failures,
            warnings,
            manifest,
            archive,
        })
    }
}
