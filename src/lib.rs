//! chat-backup - single-shot clipboard backup
//!
//! This library captures the clipboard once and writes the text as a
//! timestamped backup session: a framed plain-text copy, a self-contained
//! HTML page, a JSON document, a summary listing every file, and finally a
//! compressed archive of the whole session.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `capture`: clipboard sources behind the `CaptureSource` trait
//! - `session`: identity, directory layout and captured text of one run
//! - `stats`: line/word/character counts shared by every format
//! - `render`: plain-text, HTML and JSON renderers
//! - `manifest`: file listing and the human-readable summary
//! - `archive`: `.tar.gz` packaging of a finished session
//! - `pipeline`: runs the stages above in order
//! - `catalog`: listing of previous backups
//! - `config`: paths and user settings
//! - `cli`: command handlers for the binary
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_backup::archive::TarGzArchiver;
//! use chat_backup::capture::SystemClipboard;
//! use chat_backup::pipeline::{BackupPipeline, PipelineOptions};
//!
//! let source = SystemClipboard::probe();
//! let archiver = TarGzArchiver::new();
//! let pipeline = BackupPipeline::new("/tmp/backups", PipelineOptions::default(), &source, &archiver);
//! let report = pipeline.run()?;
//! println!("{}", report.session.id());
//! ```

pub mod archive;
pub mod capture;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod stats;

pub use error::{BackupError, BackupResult};
