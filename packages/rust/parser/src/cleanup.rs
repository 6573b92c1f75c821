//! Text normalization before parsing and answer cleanup at flush time.

use crate::classify::is_separator;

/// Drop a leading UTF-8 byte-order mark.
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// Collapse every line break into `\n`.
///
/// Besides `\r\n` and lone `\r` this covers vertical tab, form feed, the
/// ASCII file/group/record separators, NEL and the Unicode line and
/// paragraph separators. `\r\n` is folded first so it stays one break.
pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split(is_line_break)
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Join answer lines, drop separator lines, and trim the result.
pub(crate) fn clean_answer(lines: &[String]) -> String {
    let joined = lines.join("\n");
    joined
        .lines()
        .filter(|line| !is_separator(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
