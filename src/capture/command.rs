//! Clipboard access through external command-line tools

use std::io::ErrorKind;
use std::process::Command;

use tracing::debug;

use super::{CaptureError, CaptureSource};

/// One clipboard tool, invoked as `program args...`, text read from stdout
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: &'static str,
    args: &'static [&'static str],
}

impl CommandClipboard {
    /// Describe a tool invocation
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    /// Tools worth probing on this platform, in preference order
    pub fn platform_defaults() -> Vec<Self> {
        if cfg!(target_os = "macos") {
            vec![Self::new("pbpaste", &[])]
        } else if cfg!(windows) {
            vec![Self::new(
                "powershell",
                &["-NoProfile", "-Command", "Get-Clipboard -Raw"],
            )]
        } else {
            vec![
                Self::new("wl-paste", &["--no-newline"]),
                Self::new("xclip", &["-selection", "clipboard", "-o"]),
                Self::new("xsel", &["--clipboard", "--output"]),
            ]
        }
    }
}

impl CaptureSource for CommandClipboard {
    fn name(&self) -> &str {
        self.program
    }

    fn read(&self) -> Result<String, CaptureError> {
        let output = Command::new(self.program)
            .args(self.args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CaptureError::Unavailable(self.program.to_string()),
                _ => CaptureError::Failed {
                    source_name: self.program.to_string(),
                    reason: e.to_string(),
                },
            })?;

        if !output.status.success() {
            // wl-paste and xclip exit non-zero on an empty clipboard
            if output.stdout.is_empty() {
                debug!(program = self.program, status = %output.status, "tool reported no content");
                return Ok(String::new());
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::Failed {
                source_name: self.program.to_string(),
                reason: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_unavailable() {
        let tool = CommandClipboard::new("definitely-not-a-clipboard-tool-4821", &[]);
        assert!(matches!(tool.read(), Err(CaptureError::Unavailable(_))));
    }

    #[test]
    fn test_platform_defaults_not_empty() {
        assert!(!CommandClipboard::platform_defaults().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_stdout() {
        let tool = CommandClipboard::new("echo", &["pasted"]);
        assert_eq!(tool.read().unwrap(), "pasted\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_without_output_is_empty() {
        let tool = CommandClipboard::new("false", &[]);
        assert_eq!(tool.read().unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_with_output_is_failure() {
        let tool = CommandClipboard::new("sh", &["-c", "echo partial; echo broken >&2; exit 3"]);
        match tool.read() {
            Err(CaptureError::Failed { source_name, reason }) => {
                assert_eq!(source_name, "sh");
                assert!(reason.contains("broken"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
