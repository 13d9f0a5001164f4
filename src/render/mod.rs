//! Format renderers
//!
//! Each renderer turns the shared session and statistics into one output
//! document. Renderers never read each other's files and never mutate the
//! session, so they can run in any order.
//!
//! - `text`: framed plain-text history
//! - `html`: self-contained page with escaped content and a stats panel
//! - `json`: machine-readable document, validated after serialization

pub mod html;
pub mod json;
pub mod text;

pub use html::{escape_html, HtmlRenderer};
pub use json::{ChatData, JsonRenderer, FORMAT_VERSION};
pub use text::PlainTextRenderer;

use std::fmt;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{BackupError, BackupResult};
use crate::session::BackupSession;
use crate::stats::TextStatistics;

/// Kind of file in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Text,
    Html,
    Json,
    Summary,
}

impl ArtifactFormat {
    /// Best guess from a file name, for files no renderer reported
    pub fn from_extension(path: &str) -> Self {
        match path.rsplit('.').next() {
            Some("html") | Some("htm") => Self::Html,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
            Self::Summary => "summary",
        };
        write!(f, "{}", name)
    }
}

/// One file written into a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    /// Path under the session root, `/`-separated
    pub relative_path: String,
    pub format: ArtifactFormat,
    /// Size on disk after the write
    pub size_bytes: u64,
}

/// Produces the contents of one artifact
pub trait Renderer {
    fn format(&self) -> ArtifactFormat;

    /// Where the artifact goes under the session root
    fn relative_path(&self) -> &'static str;

    fn render(&self, session: &BackupSession, stats: TextStatistics) -> BackupResult<String>;
}

/// Render and write one artifact
pub fn write_artifact(
    renderer: &dyn Renderer,
    session: &BackupSession,
    stats: TextStatistics,
) -> BackupResult<RenderedArtifact> {
    let contents = renderer.render(session, stats)?;
    write_file(session, renderer.relative_path(), renderer.format(), &contents)
}

/// Write `contents` to `relative_path` inside the session and record its size
pub fn write_file(
    session: &BackupSession,
    relative_path: &str,
    format: ArtifactFormat,
    contents: &str,
) -> BackupResult<RenderedArtifact> {
    let path = session.path_of(relative_path);

    fs::write(&path, contents).map_err(|e| BackupError::render(relative_path, e))?;

    let size_bytes = fs::metadata(&path)
        .map_err(|e| BackupError::render(relative_path, e))?
        .len();

    Ok(RenderedArtifact {
        relative_path: relative_path.to_string(),
        format,
        size_bytes,
    })
}
