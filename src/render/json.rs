//! JSON renderer
//!
//! The document is built from typed structs and serialized by `serde_json`,
//! which escapes quotes, backslashes, newlines and every control character.
//! Before the document is returned it is parsed back and its `content`
//! compared to the session text, so an invalid or lossy document is reported
//! as a render failure instead of being written.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::error::{BackupError, BackupResult};
use crate::session::{layout, BackupSession};
use crate::stats::TextStatistics;

use super::{ArtifactFormat, Renderer};

/// Version of the `chat_data.json` layout
pub const FORMAT_VERSION: &str = "1.0";

/// `backup_info` member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub backup_id: String,
    /// RFC 3339 / ISO-8601, UTC
    pub timestamp: String,
    pub version: String,
}

/// Top-level `chat_data.json` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatData {
    pub backup_info: BackupInfo,
    pub statistics: TextStatistics,
    pub content: String,
}

impl ChatData {
    pub fn from_session(session: &BackupSession, stats: TextStatistics) -> Self {
        Self {
            backup_info: BackupInfo {
                backup_id: session.id().to_string(),
                timestamp: session
                    .created_at()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                version: FORMAT_VERSION.to_string(),
            },
            statistics: stats,
            content: session.raw_text().to_string(),
        }
    }

    /// Parse a `chat_data.json` document
    pub fn parse(json: &str) -> BackupResult<Self> {
        serde_json::from_str(json).map_err(BackupError::from)
    }
}

/// Renders `json/chat_data.json`
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Json
    }

    fn relative_path(&self) -> &'static str {
        layout::JSON_FILE
    }

    fn render(&self, session: &BackupSession, stats: TextStatistics) -> BackupResult<String> {
        let data = ChatData::from_session(session, stats);

        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| BackupError::render(self.relative_path(), e))?;

        let parsed = ChatData::parse(&json).map_err(|e| {
            BackupError::render(self.relative_path(), format!("output failed to parse: {}", e))
        })?;
        if parsed != data {
            return Err(BackupError::render(
                self.relative_path(),
                "output does not round-trip to the captured text",
            ));
        }

        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Capture;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn render_at(text: &str, created_at: DateTime<Utc>) -> (String, BackupSession, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let capture = Capture::Captured {
            text: text.into(),
            source: "test".into(),
        };
        let session =
            BackupSession::create(temp_dir.path(), created_at, capture, "sentinel").unwrap();
        let stats = TextStatistics::compute(session.raw_text());
        let json = JsonRenderer.render(&session, stats).unwrap();
        (json, session, temp_dir)
    }

    fn render(text: &str) -> String {
        render_at(text, Utc::now()).0
    }

    #[test]
    fn test_schema() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 5).unwrap();
        let (json, session, _temp) = render_at("hello world", at);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["backup_info"]["backup_id"], session.id());
        assert_eq!(value["backup_info"]["timestamp"], "2026-10-19T14:30:05Z");
        assert_eq!(value["backup_info"]["version"], FORMAT_VERSION);
        assert_eq!(value["statistics"]["lines"], 0);
        assert_eq!(value["statistics"]["words"], 2);
        assert_eq!(value["statistics"]["characters"], 11);
        assert!(value["statistics"]["words"].is_u64());
        assert_eq!(value["content"], "hello world");
    }

    #[test]
    fn test_quotes_and_newline_escaped() {
        let text = "hi \"bob\"\nline2";
        let json = render(text);

        assert!(json.contains(r#""content": "hi \"bob\"\nline2""#));
        let parsed = ChatData::parse(&json).unwrap();
        assert_eq!(parsed.content, text);
        assert_eq!(parsed.statistics.lines, 1);
        assert_eq!(parsed.statistics.words, 3);
    }

    #[test]
    fn test_adversarial_inputs_round_trip() {
        let inputs = [
            "",
            "x",
            "<tag attr=\"v\">&amp;</tag>",
            "back\\slash \\n not a newline",
            "tab\tbell\u{7}nul\u{0}esc\u{1b}del\u{7f}",
            "line1\r\nline2\rline3\n",
            "unicode: é ✓ 🚀 \u{2028}\u{2029}",
            "\"}, \"content\": \"injected",
        ];

        for text in inputs {
            let json = render(text);
            let parsed = ChatData::parse(&json)
                .unwrap_or_else(|e| panic!("invalid JSON for {:?}: {}", text, e));
            assert_eq!(parsed.content, text);
        }
    }

    #[test]
    fn test_no_raw_control_characters_in_output() {
        let json = render("a\nb\u{1}c\td");
        // The only literal newlines are pretty-printing between members
        let content_line = json
            .lines()
            .find(|l| l.trim_start().starts_with("\"content\""))
            .unwrap();
        assert_eq!(content_line.trim(), r#""content": "a\nb\u0001c\td""#);
        assert!(!json.chars().any(|c| c.is_control() && c != '\n'));
    }
}
