//! Capture from a file or stdin instead of the clipboard

use std::io::Read;
use std::path::PathBuf;

use super::{CaptureError, CaptureSource};

/// Reads the text to back up from a file, or from stdin when the path is `-`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = if path.as_os_str() == "-" {
            "stdin".to_string()
        } else {
            path.display().to_string()
        };
        Self { path, name }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl CaptureSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<String, CaptureError> {
        let failed = |e: std::io::Error| CaptureError::Failed {
            source_name: self.name.clone(),
            reason: e.to_string(),
        };

        if self.is_stdin() {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).map_err(failed)?;
            return Ok(text);
        }

        std::fs::read_to_string(&self.path).map_err(failed)
    }
}
