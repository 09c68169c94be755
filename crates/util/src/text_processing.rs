//! # Log Text Processing
//!
//! Job logs arrive as opaque text produced by arbitrary executors. Before they
//! reach the terminal every line is split out and scrubbed of characters that
//! would corrupt the screen: ANSI escape sequences and anything in the Unicode
//! `Other` category (`\p{C}`: controls, format characters, private use,
//! unassigned code points).

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("valid line break regex"));

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").expect("valid ANSI regex"));

static OTHER_CATEGORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{C}").expect("valid control regex"));

/// Removes ANSI escape sequences and Unicode `Other` characters from one line.
///
/// # Example
/// ```rust
/// use flowdash_util::strip_control_characters;
///
/// assert_eq!(strip_control_characters("\u{1b}[32mok\u{1b}[0m\u{7}"), "ok");
/// assert_eq!(strip_control_characters("tab\tbed"), "tabbed");
/// ```
pub fn strip_control_characters(line: &str) -> String {
    let without_escapes = ANSI_ESCAPE.replace_all(line, "");
    OTHER_CATEGORY.replace_all(&without_escapes, "").into_owned()
}

/// Splits log text on `\r\n`, `\n`, or `\r` and scrubs every line.
///
/// The empty segment produced by a trailing line break is dropped so that
/// `"a\nb\n"` yields exactly two lines. Blank lines inside the text are kept.
pub fn log_lines(logs: &str) -> Vec<String> {
    if logs.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = LINE_BREAK.split(logs).map(strip_control_characters).collect();
    if logs.ends_with('\n') || logs.ends_with('\r') {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        assert_eq!(log_lines("a\nb\n"), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn mixed_line_endings_split_consistently() {
        assert_eq!(log_lines("one\r\ntwo\rthree\nfour"), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn interior_blank_lines_survive() {
        assert_eq!(log_lines("a\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn control_and_format_characters_are_removed() {
        assert_eq!(strip_control_characters("be\u{0}ll\u{7}\u{200b}"), "bell");
        assert_eq!(strip_control_characters("\u{1b}[1;31mERROR\u{1b}[0m: disk"), "ERROR: disk");
    }

    #[test]
    fn empty_logs_render_nothing() {
        assert!(log_lines("").is_empty());
    }
}
