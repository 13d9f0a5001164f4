//! HTML renderer
//!
//! Produces a single self-contained page (inline CSS, no external
//! resources). Every interpolated string goes through [`escape_html`], the
//! captured text included, even though it sits inside a `<pre>` block.

use std::borrow::Cow;

use crate::error::BackupResult;
use crate::session::{layout, BackupSession};
use crate::stats::TextStatistics;

use super::{ArtifactFormat, Renderer};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f4f5f7; color: #1f2328; margin: 0; padding: 24px; }
    .container { max-width: 960px; margin: 0 auto; background: #ffffff; border-radius: 8px; box-shadow: 0 1px 4px rgba(0, 0, 0, 0.12); overflow: hidden; }
    .header { background: #2d3a4a; color: #ffffff; padding: 20px 24px; }
    .header h1 { margin: 0 0 8px 0; font-size: 22px; }
    .meta { font-size: 13px; opacity: 0.85; }
    .stats { display: flex; border-bottom: 1px solid #e1e4e8; }
    .stat { flex: 1; text-align: center; padding: 16px; }
    .stat + .stat { border-left: 1px solid #e1e4e8; }
    .stat-value { font-size: 24px; font-weight: 600; }
    .stat-label { font-size: 12px; text-transform: uppercase; color: #57606a; }
    .content { padding: 24px; }
    pre { white-space: pre-wrap; word-wrap: break-word; font-family: "SFMono-Regular", Consolas, monospace; font-size: 13px; line-height: 1.5; margin: 0; }
"#;

/// Escape the characters that are meaningful to HTML markup
///
/// Handles `&`, `<`, `>`, `"` and `'`, so the result is safe both in text
/// content and inside quoted attribute values. Borrows when nothing changes.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>' | '"' | '\'');

    let Some(first) = input.find(needs_escape) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Renders `html/chat_conversation.html`
pub struct HtmlRenderer {
    title: String,
    timestamp_format: String,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>, timestamp_format: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            timestamp_format: timestamp_format.into(),
        }
    }

    fn stat_cell(value: usize, label: &str) -> String {
        format!(
            "      <div class=\"stat\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>\n",
            value, label
        )
    }
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Html
    }

    fn relative_path(&self) -> &'static str {
        layout::HTML_FILE
    }

    fn render(&self, session: &BackupSession, stats: TextStatistics) -> BackupResult<String> {
        let title = escape_html(&self.title);
        let id = escape_html(session.id());
        let date = session
            .created_at_local()
            .format(&self.timestamp_format)
            .to_string();
        let date = escape_html(&date);
        let content = escape_html(session.raw_text());

        let mut out = String::with_capacity(content.len() + STYLE.len() + 1024);
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n<head>\n");
        out.push_str("  <meta charset=\"UTF-8\">\n");
        out.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        out.push_str(&format!("  <title>{} - {}</title>\n", title, id));
        out.push_str(&format!("  <style>{}  </style>\n", STYLE));
        out.push_str("</head>\n<body>\n");
        out.push_str("  <div class=\"container\">\n");
        out.push_str("    <div class=\"header\">\n");
        out.push_str(&format!("      <h1>{}</h1>\n", title));
        out.push_str(&format!(
            "      <div class=\"meta\" data-backup-id=\"{}\">Backup ID: {} &middot; {}</div>\n",
            id, id, date
        ));
        out.push_str("    </div>\n");
        out.push_str("    <div class=\"stats\">\n");
        out.push_str(&Self::stat_cell(stats.lines, "Lines"));
        out.push_str(&Self::stat_cell(stats.words, "Words"));
        out.push_str(&Self::stat_cell(stats.characters, "Characters"));
        out.push_str("    </div>\n");
        out.push_str("    <div class=\"content\">\n");
        out.push_str("      <pre>");
        out.push_str(&content);
        out.push_str("</pre>\n");
        out.push_str("    </div>\n");
        out.push_str("  </div>\n");
        out.push_str("</body>\n</html>\n");

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Capture;
    use chrono::Utc;
    use tempfile::TempDir;

    fn render_text(text: &str) -> String {
        let temp_dir = TempDir::new().unwrap();
        let capture = Capture::Captured {
            text: text.into(),
            source: "test".into(),
        };
        let session =
            BackupSession::create(temp_dir.path(), Utc::now(), capture, "sentinel").unwrap();
        let stats = TextStatistics::compute(session.raw_text());

        HtmlRenderer::new("Backup", "%Y-%m-%d %H:%M:%S")
            .render(&session, stats)
            .unwrap()
    }

    fn pre_block(html: &str) -> &str {
        let start = html.find("<pre>").unwrap() + "<pre>".len();
        let end = html.find("</pre>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_borrows_clean_input() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_script_injection_is_neutralized() {
        let html = render_text("</pre><script>alert('x')</script>");
        let pre = pre_block(&html);

        assert!(!html.contains("<script>"));
        assert_eq!(
            pre,
            "&lt;/pre&gt;&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        // Exactly one pre block survives
        assert_eq!(html.matches("<pre>").count(), 1);
        assert_eq!(html.matches("</pre>").count(), 1);
    }

    #[test]
    fn test_stats_panel_values() {
        let html = render_text("one two\nthree");
        assert!(html.contains("<div class=\"stat-value\">1</div><div class=\"stat-label\">Lines</div>"));
        assert!(html.contains("<div class=\"stat-value\">3</div><div class=\"stat-label\">Words</div>"));
        assert!(html.contains(
            "<div class=\"stat-value\">13</div><div class=\"stat-label\">Characters</div>"
        ));
    }

    #[test]
    fn test_empty_text() {
        let html = render_text("");
        assert_eq!(pre_block(&html), "");
        assert!(html.contains("<div class=\"stat-value\">0</div><div class=\"stat-label\">Words</div>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_newlines_and_backslashes_kept() {
        let html = render_text("a\\b\n\tc");
        assert_eq!(pre_block(&html), "a\\b\n\tc");
    }
}
