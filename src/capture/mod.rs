//! Clipboard capture
//!
//! Every way of obtaining the text to back up sits behind the
//! [`CaptureSource`] trait. The pipeline only ever sees a [`Capture`]:
//! either the captured text (possibly empty) or a reason why nothing could
//! be read.
//!
//! - `NativeClipboard`: in-process access through `arboard`
//! - `CommandClipboard`: one external tool (`pbpaste`, `xclip`, ...)
//! - `SystemClipboard`: probes a platform-specific list of the above
//! - `FileSource`: a file or stdin, used by `--input`

mod command;
mod file;
mod native;

pub use command::CommandClipboard;
pub use file::FileSource;
pub use native::NativeClipboard;

use thiserror::Error;
use tracing::debug;

/// Why a source could not produce text
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The mechanism does not exist on this machine (tool missing, no display)
    #[error("{0} is not available")]
    Unavailable(String),

    /// The mechanism exists but the read failed
    #[error("{source_name} failed: {reason}")]
    Failed { source_name: String, reason: String },

    /// Every candidate mechanism was unavailable
    #[error("no clipboard mechanism worked: {0}")]
    NoMechanism(String),
}

/// A way of reading the text to back up
pub trait CaptureSource {
    /// Short human-readable name, used in logs and the summary
    fn name(&self) -> &str;

    /// Read the current text. An empty clipboard is `Ok(String::new())`.
    fn read(&self) -> Result<String, CaptureError>;
}

/// Outcome of a capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Text was read; empty when the clipboard held nothing or only whitespace
    Captured { text: String, source: String },
    /// No mechanism worked
    Unavailable { reason: String },
}

impl Capture {
    /// Whether non-empty text was actually captured
    pub fn has_content(&self) -> bool {
        matches!(self, Self::Captured { text, .. } if !text.is_empty())
    }
}

/// Read once from `source`, normalizing whitespace-only content to empty
pub fn capture(source: &dyn CaptureSource) -> Capture {
    match source.read() {
        Ok(text) => {
            let text = if text.trim().is_empty() {
                String::new()
            } else {
                text
            };
            debug!(source = source.name(), chars = text.chars().count(), "captured text");
            Capture::Captured {
                text,
                source: source.name().to_string(),
            }
        }
        Err(e) => Capture::Unavailable {
            reason: e.to_string(),
        },
    }
}

/// The clipboard of this machine, using the first candidate that answers
pub struct SystemClipboard {
    candidates: Vec<Box<dyn CaptureSource>>,
}

impl SystemClipboard {
    /// Build the platform's candidate list (native first, then CLI tools)
    pub fn probe() -> Self {
        let mut candidates: Vec<Box<dyn CaptureSource>> = vec![Box::new(NativeClipboard)];
        candidates.extend(
            CommandClipboard::platform_defaults()
                .into_iter()
                .map(|c| Box::new(c) as Box<dyn CaptureSource>),
        );
        Self { candidates }
    }

    /// Use an explicit candidate list
    pub fn with_candidates(candidates: Vec<Box<dyn CaptureSource>>) -> Self {
        Self { candidates }
    }
}

impl CaptureSource for SystemClipboard {
    fn name(&self) -> &str {
        "system clipboard"
    }

    fn read(&self) -> Result<String, CaptureError> {
        let mut unavailable = Vec::new();
        let mut failure = None;

        for candidate in &self.candidates {
            match candidate.read() {
                Ok(text) => {
                    debug!(source = candidate.name(), "clipboard source answered");
                    return Ok(text);
                }
                Err(e @ CaptureError::Failed { .. }) => {
                    debug!(source = candidate.name(), error = %e, "clipboard source failed");
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
                Err(e) => {
                    debug!(source = candidate.name(), error = %e, "clipboard source skipped");
                    unavailable.push(e.to_string());
                }
            }
        }

        // A mechanism that exists but failed says more than the missing ones
        if let Some(e) = failure {
            return Err(e);
        }

        if unavailable.is_empty() {
            return Err(CaptureError::NoMechanism(
                "none known for this platform".into(),
            ));
        }

        Err(CaptureError::NoMechanism(unavailable.join("; ")))
    }
}
