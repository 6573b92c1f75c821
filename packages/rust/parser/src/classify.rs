//! Line classification.

use std::sync::LazyLock;

use regex::Regex;

/// Arabic-script question mark used in Persian text.
const ARABIC_QUESTION_MARK: char = '\u{061F}';

/// Persian word for "question", often used as a line prefix (`سوال ۱: ...`).
const QUESTION_WORD: &str = "سوال";

/// Matches a line made only of `-` / `=`, at least three of them.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-=]{3,}$").expect("separator regex"));

/// What a trimmed, non-empty line means to the block parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// Opens a new block.
    Question(&'a str),
    /// Visual delimiter, never content.
    Separator,
    /// Anything else; answer content when a question is open.
    Text(&'a str),
}

/// Classify a line that has already been trimmed.
pub(crate) fn classify(line: &str) -> Line<'_> {
    if is_question(line) {
        Line::Question(line)
    } else if is_separator(line) {
        Line::Separator
    } else {
        Line::Text(line)
    }
}

pub(crate) fn is_separator(line: &str) -> bool {
    SEPARATOR_RE.is_match(line.trim())
}

fn is_question(line: &str) -> bool {
    line.contains(ARABIC_QUESTION_MARK)
        || line.ends_with('?')
        || line.to_lowercase().starts_with(QUESTION_WORD)
}
