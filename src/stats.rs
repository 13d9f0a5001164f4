//! Text statistics shared by every rendered format

use serde::{Deserialize, Serialize};

/// Line, word and character counts for a session's text
///
/// Computed once per session and passed by value to each renderer so that
/// every format reports the same numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Number of `\n` characters (a final line without newline is not counted)
    pub lines: usize,
    /// Whitespace-delimited tokens
    pub words: usize,
    /// Unicode scalar values, newlines included
    pub characters: usize,
}

impl TextStatistics {
    pub fn compute(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count(),
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}
