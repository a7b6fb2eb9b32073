//! Parsing of the responder's `FILES:` / `MESSAGE:` reply layout.
//!
//! Model output drifts from the requested layout in small ways (bullets,
//! backticks, trailing sentinels, chatter before the markers). The parser
//! tolerates that and never fails: unusable input degrades to empty results.

use crate::commit::prompt::{FILES_MARKER, MESSAGE_MARKER, TERMINATION_SENTINEL};

/// Message reported when the responder produced nothing to work with.
pub const NO_CHANGES_MESSAGE: &str = "No changes to commit";

/// Files and commit message extracted from a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    /// Paths in reply order, blank entries removed.
    pub files: Vec<String>,
    /// Full message section with sentinel lines removed.
    pub message: String,
    /// The reply lacked the `FILES:` or `MESSAGE:` marker.
    pub malformed: bool,
}

impl ParsedResult {
    /// The result for an absent or empty reply.
    pub fn no_changes() -> Self {
        Self {
            files: Vec::new(),
            message: NO_CHANGES_MESSAGE.to_string(),
            malformed: false,
        }
    }

    fn unmarked() -> Self {
        Self {
            files: Vec::new(),
            message: String::new(),
            malformed: true,
        }
    }
}

/// Parse a reply into a file list and commit message.
pub fn parse_reply(raw: Option<&str>) -> ParsedResult {
    let Some(text) = raw.filter(|t| !t.trim().is_empty()) else {
        return ParsedResult::no_changes();
    };

    let Some((files_section, message_section)) = split_sections(text) else {
        return ParsedResult::unmarked();
    };

    ParsedResult {
        files: parse_files(files_section),
        message: strip_sentinel_lines(message_section),
        malformed: false,
    }
}

/// Split a reply at the first `MESSAGE:` marker.
///
/// The files section is whatever sits between the first `FILES:` and the
/// first `MESSAGE:`. Returns `None` unless `FILES:` comes before `MESSAGE:`.
fn split_sections(text: &str) -> Option<(&str, &str)> {
    let (before, message_section) = text.split_once(MESSAGE_MARKER)?;
    let (_, files_section) = before.split_once(FILES_MARKER)?;

    Some((files_section, message_section))
}

/// Extract paths from the files section, one per non-blank line.
fn parse_files(section: &str) -> Vec<String> {
    section
        .lines()
        .map(clean_file_line)
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect()
}

/// Strip list markers, surrounding whitespace and code quotes from a file line.
fn clean_file_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
        .trim()
        .trim_matches('`')
        .trim()
}

/// Remove every line containing the termination sentinel, then trim.
///
/// Idempotent: applying it to its own output changes nothing.
pub fn strip_sentinel_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.contains(TERMINATION_SENTINEL))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
