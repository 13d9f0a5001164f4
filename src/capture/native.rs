//! In-process clipboard access through `arboard`

use super::{CaptureError, CaptureSource};

/// The OS clipboard as seen by `arboard`
pub struct NativeClipboard;

impl CaptureSource for NativeClipboard {
    fn name(&self) -> &str {
        "arboard"
    }

    fn read(&self) -> Result<String, CaptureError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| CaptureError::Unavailable(format!("arboard ({})", e)))?;

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // Empty clipboard or non-text content
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(CaptureError::Failed {
                source_name: self.name().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
