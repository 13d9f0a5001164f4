//! Plain-text history renderer

use crate::error::BackupResult;
use crate::session::{layout, BackupSession};
use crate::stats::TextStatistics;

use super::{ArtifactFormat, Renderer};

const BANNER_WIDTH: usize = 60;

/// Renders `text/chat_history.txt`: the verbatim text inside a banner frame
pub struct PlainTextRenderer {
    timestamp_format: String,
}

impl PlainTextRenderer {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }
}

impl Renderer for PlainTextRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Text
    }

    fn relative_path(&self) -> &'static str {
        layout::HISTORY_FILE
    }

    fn render(&self, session: &BackupSession, stats: TextStatistics) -> BackupResult<String> {
        let rule = "=".repeat(BANNER_WIDTH);
        let date = session.created_at_local().format(&self.timestamp_format);

        let mut out = String::with_capacity(session.raw_text().len() + 512);
        out.push_str(&rule);
        out.push('\n');
        out.push_str("CHAT BACKUP\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Backup ID: {}\n", session.id()));
        out.push_str(&format!("Date: {}\n", date));
        out.push('\n');
        out.push_str(session.raw_text());
        out.push('\n');
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str("END OF BACKUP\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Total lines: {}\n", stats.lines));

        Ok(out)
    }
}
