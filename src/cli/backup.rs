//! Backup CLI commands
//!
//! Implements `run` (the default command) and `list`.

use std::path::PathBuf;

use clap::Args;

use crate::archive::TarGzArchiver;
use crate::capture::{CaptureSource, FileSource, SystemClipboard};
use crate::catalog::list_sessions;
use crate::config::{BackupPaths, Settings};
use crate::error::BackupResult;
use crate::manifest::format_size;
use crate::pipeline::{ArchiveStatus, BackupPipeline, BackupReport, PipelineOptions};

/// Options for a backup run
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Read the text from a file instead of the clipboard ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Skip creating the .tar.gz archive
    #[arg(long)]
    pub no_archive: bool,
}

impl RunArgs {
    /// Combine flags given before and after the `run` subcommand
    pub fn merge(self, outer: RunArgs) -> RunArgs {
        RunArgs {
            input: self.input.or(outer.input),
            no_archive: self.no_archive || outer.no_archive,
        }
    }
}

/// How a run ended, mapped to the process exit code by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every artifact written (warnings allowed)
    Complete,
    /// At least one artifact could not be written
    Partial,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Complete => 0,
            Self::Partial => 2,
        }
    }
}

/// Handle the backup run command
pub fn handle_run_command(
    paths: &BackupPaths,
    settings: &Settings,
    args: RunArgs,
) -> BackupResult<RunOutcome> {
    let source: Box<dyn CaptureSource> = match args.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(SystemClipboard::probe()),
    };

    let mut options = PipelineOptions::from(settings);
    if args.no_archive {
        options.archive = false;
    }

    let archiver = TarGzArchiver::new();
    let pipeline =
        BackupPipeline::new(paths.backups_root(), options, source.as_ref(), &archiver);

    println!("Capturing from {}...", source.name());
    let report = pipeline.run()?;
    print_report(&report);

    Ok(if report.is_complete() {
        RunOutcome::Complete
    } else {
        RunOutcome::Partial
    })
}

fn print_report(report: &BackupReport) {
    let session = &report.session;

    println!("Backup created: {}", session.id());
    println!("Location: {}", session.root_path().display());
    println!();

    println!("Files");
    println!("=====");
    for artifact in &report.artifacts {
        println!(
            "  {:<32} {:>10}",
            artifact.relative_path,
            format_size(artifact.size_bytes)
        );
    }
    if let Some(manifest) = &report.manifest {
        println!();
        println!(
            "Total: {} file(s), {}",
            manifest.total_file_count,
            format_size(manifest.total_size_bytes)
        );
    }
    println!(
        "Content: {} line(s), {} word(s), {} character(s)",
        report.statistics.lines, report.statistics.words, report.statistics.characters
    );

    match &report.archive {
        ArchiveStatus::Created(path) => println!("Archive: {}", path.display()),
        ArchiveStatus::Disabled => {}
        ArchiveStatus::Failed(e) => {
            eprintln!("Warning: {}", e);
            eprintln!(
                "The uncompressed backup is complete at {}",
                session.root_path().display()
            );
        }
    }

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    for failure in &report.failures {
        eprintln!("Error: {}", failure);
    }
}

/// Handle the list command
pub fn handle_list_command(paths: &BackupPaths) -> BackupResult<()> {
    let sessions = list_sessions(paths.backups_root())?;

    if sessions.is_empty() {
        println!("No backups found in {}", paths.backups_root().display());
        println!("Create one with: chat-backup");
        return Ok(());
    }

    println!("Available Backups");
    println!("=================");
    println!();

    for (i, session) in sessions.iter().enumerate() {
        let kind = match (&session.directory, &session.archive) {
            (Some(_), Some(_)) => "directory + archive",
            (Some(_), None) => "directory",
            (None, Some(_)) => "archive only",
            (None, None) => "unknown",
        };
        println!(
            "  {}. {} ({}, {}, {})",
            i + 1,
            session.id,
            session.created_at.format("%Y-%m-%d %H:%M:%S"),
            format_size(session.size_bytes),
            kind,
        );
    }

    println!();
    println!("Total: {} backup(s)", sessions.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.txt");
        std::fs::write(&input, "from a file").unwrap();

        let paths = BackupPaths::with_dirs(
            temp_dir.path().join("backups"),
            temp_dir.path().join("cfg"),
        );
        let args = RunArgs {
            input: Some(input),
            no_archive: true,
        };

        let outcome = handle_run_command(&paths, &Settings::default(), args).unwrap();
        assert_eq!(outcome, RunOutcome::Complete);

        let sessions = list_sessions(paths.backups_root()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].archive.is_none());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Complete.exit_code(), 0);
        assert_eq!(RunOutcome::Partial.exit_code(), 2);
    }

    #[test]
    fn test_list_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths =
            BackupPaths::with_dirs(temp_dir.path().join("none"), temp_dir.path().to_path_buf());
        assert!(handle_list_command(&paths).is_ok());
    }

    #[test]
    fn test_merge_keeps_flags_from_both_positions() {
        let outer = RunArgs {
            input: Some(PathBuf::from("outer.txt")),
            no_archive: true,
        };
        let merged = RunArgs::default().merge(outer);
        assert_eq!(merged.input, Some(PathBuf::from("outer.txt")));
        assert!(merged.no_archive);

        let inner = RunArgs {
            input: Some(PathBuf::from("inner.txt")),
            no_archive: false,
        };
        let merged = inner.merge(RunArgs {
            input: Some(PathBuf::from("outer.txt")),
            no_archive: false,
        });
        assert_eq!(merged.input, Some(PathBuf::from("inner.txt")));
        assert!(!merged.no_archive);
    }
}
