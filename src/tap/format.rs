//! Pure TAP 14 line formatting.
//!
//! Nothing here writes anywhere; the functions build the exact text of each report line so the same input
//! always yields byte-identical output. Every returned string is a single line without a trailing newline.

use std::fmt;

/// First line of every report.
pub const VERSION_LINE: &str = "TAP version 14";

/// Whether a TAP consumer should count the point as passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotOk,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::NotOk => "not ok",
        }
    }
}

/// Directive appended to a result line. The reason should already be a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Skip(&'a str),
    Todo(&'a str),
}

impl Directive<'_> {
    fn keyword(&self) -> &'static str {
        match self {
            Directive::Skip(_) => "SKIP",
            Directive::Todo(_) => "TODO",
        }
    }

    fn reason(&self) -> &str {
        match self {
            Directive::Skip(reason) | Directive::Todo(reason) => reason,
        }
    }
}

/// One `ok` / `not ok` test point line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLine<'a> {
    pub status: Status,
    pub index: usize,
    pub description: Option<&'a str>,
    pub directive: Option<Directive<'a>>,
}

impl fmt::Display for ResultLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_str(), self.index)?;
        if let Some(description) = self.description {
            let description = escape_field(description);
            if !description.is_empty() {
                write!(f, " - {description}")?;
            }
        }
        if let Some(directive) = &self.directive {
            write!(f, " # {}", directive.keyword())?;
            let reason = escape_field(directive.reason());
            if !reason.is_empty() {
                write!(f, " {reason}")?;
            }
        }
        Ok(())
    }
}

/// The plan line covering every point of the session.
pub fn plan_line(total: usize) -> String {
    format!("1..{total}")
}

/// The terminal `Bail out!` line.
pub fn bail_out_line(reason: &str) -> String {
    let reason = escape_field(reason);
    if reason.is_empty() {
        "Bail out!".to_string()
    } else {
        format!("Bail out! {reason}")
    }
}

/// Escape text for a single-line TAP field (description, directive reason, bail-out reason).
///
/// ## Notes
/// - `\` becomes `\\` and `#` becomes `\#`, so consumers never mistake text for a directive.
/// - Line breaks, and any whitespace around them, collapse into a single space; leading and trailing whitespace
///   is dropped.
pub fn escape_field(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.trim().chars() {
        match ch {
            '\r' | '\n' => pending_space = true,
            _ if pending_space && ch.is_whitespace() => {}
            _ => {
                if pending_space {
                    if !out.ends_with(' ') {
                        out.push(' ');
                    }
                    pending_space = false;
                }
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '#' => out.push_str("\\#"),
                    _ => out.push(ch),
                }
            }
        }
    }
    out
}

/// Split a reason into the part that fits on the result line and the overflow lines.
pub fn split_reason(reason: &str) -> (&str, Vec<&str>) {
    let mut lines = reason.trim().lines();
    let first = lines.next().unwrap_or("");
    (first, lines.collect())
}

/// Render a message as `#` comment lines, one per message line.
///
/// Blank leading/trailing lines are dropped; an empty message yields no lines.
pub fn comment_lines(message: &str) -> Vec<String> {
    let message = message.trim_matches(|c: char| c == '\n' || c == '\r');
    if message.trim().is_empty() {
        return Vec::new();
    }
    message
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                "#".to_string()
            } else {
                format!("# {line}")
            }
        })
        .collect()
}

/// Render a TAP 14 YAML diagnostics block, indented two spaces under its result line.
///
/// ## Parameters
/// - `severity`: `fail` or `todo`.
/// - `fault`: kind of an unexpected fault, if any.
/// - `message`: free text, emitted as a literal block scalar. A message starting with whitespace gets an explicit
///   indentation indicator so its first line keeps its leading spaces.
pub fn yaml_block(severity: &str, fault: Option<&str>, message: &str) -> Vec<String> {
    let mut lines = vec!["  ---".to_string(), format!("  severity: {severity}")];
    if let Some(kind) = fault {
        lines.push(format!("  fault: {}", yaml_quote(kind)));
    }
    let message = message.trim_matches(|c: char| c == '\n' || c == '\r');
    if message.trim().is_empty() {
        lines.push("  message: \"\"".to_string());
    } else {
        // A leading space on the first line would otherwise be taken as the block's indentation
        let header = if message.starts_with(char::is_whitespace) {
            "  message: |2-"
        } else {
            "  message: |-"
        };
        lines.push(header.to_string());
        for line in message.lines() {
            lines.push(format!("    {}", line.trim_end()));
        }
    }
    lines.push("  ...".to_string());
    lines
}

fn yaml_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(status: Status, index: usize, description: Option<&str>, directive: Option<Directive<'_>>) -> String {
        ResultLine {
            status,
            index,
            description,
            directive,
        }
        .to_string()
    }

    // ========================================
    // Result lines
    // ========================================

    #[test]
    fn test_ok_line() {
        assert_eq!(line(Status::Ok, 1, Some("boots"), None), "ok 1 - boots");
    }

    #[test]
    fn test_not_ok_line_without_description() {
        assert_eq!(line(Status::NotOk, 7, None, None), "not ok 7");
        assert_eq!(line(Status::NotOk, 7, Some("   "), None), "not ok 7");
    }

    #[test]
    fn test_skip_directive() {
        assert_eq!(
            line(Status::Ok, 2, Some("wifi"), Some(Directive::Skip("no antenna"))),
            "ok 2 - wifi # SKIP no antenna"
        );
    }

    #[test]
    fn test_todo_directive_with_empty_reason() {
        assert_eq!(
            line(Status::NotOk, 3, Some("ota"), Some(Directive::Todo("  "))),
            "not ok 3 - ota # TODO"
        );
    }

    #[test]
    fn test_description_hash_is_escaped() {
        assert_eq!(
            line(Status::Ok, 1, Some("issue #12 \\ fixed"), None),
            "ok 1 - issue \\#12 \\\\ fixed"
        );
    }

    #[test]
    fn test_description_newlines_collapse() {
        assert_eq!(line(Status::Ok, 1, Some("two\nlines\r\nhere"), None), "ok 1 - two lines here");
    }

    #[test]
    fn test_whitespace_around_newlines_collapses() {
        assert_eq!(escape_field("a\n b"), "a b");
        assert_eq!(escape_field("a \r\n\t  b"), "a b");
        assert_eq!(escape_field("keep  inner  spaces"), "keep  inner  spaces");
    }

    #[test]
    fn test_same_input_same_bytes() {
        let a = line(Status::NotOk, 4, Some("adc"), Some(Directive::Todo("calibrate")));
        let b = line(Status::NotOk, 4, Some("adc"), Some(Directive::Todo("calibrate")));
        assert_eq!(a, b);
    }

    // ========================================
    // Plan and bail out
    // ========================================

    #[test]
    fn test_plan_line() {
        assert_eq!(plan_line(0), "1..0");
        assert_eq!(plan_line(12), "1..12");
    }

    #[test]
    fn test_bail_out_line() {
        assert_eq!(bail_out_line("power lost"), "Bail out! power lost");
        assert_eq!(bail_out_line(""), "Bail out!");
        assert_eq!(bail_out_line("a\nb"), "Bail out! a b");
    }

    // ========================================
    // Diagnostics
    // ========================================

    #[test]
    fn test_comment_lines_split_message() {
        assert_eq!(
            comment_lines("first\nsecond\n\nfourth\n"),
            vec!["# first", "# second", "#", "# fourth"]
        );
    }

    #[test]
    fn test_comment_lines_empty_message() {
        assert!(comment_lines("").is_empty());
        assert!(comment_lines("\n\n").is_empty());
    }

    #[test]
    fn test_split_reason() {
        assert_eq!(split_reason("later"), ("later", vec![]));
        assert_eq!(split_reason("needs rework\nsee ticket"), ("needs rework", vec!["see ticket"]));
        assert_eq!(split_reason(""), ("", vec![]));
    }

    #[test]
    fn test_yaml_block_for_fault() {
        assert_eq!(
            yaml_block("fail", Some("panic"), "index out of bounds\nat main.rs"),
            vec![
                "  ---",
                "  severity: fail",
                "  fault: \"panic\"",
                "  message: |-",
                "    index out of bounds",
                "    at main.rs",
                "  ...",
            ]
        );
    }

    #[test]
    fn test_yaml_block_keeps_leading_indentation() {
        let message = "  indented first line\nsecond line";
        let block = yaml_block("fail", None, message);
        assert_eq!(
            block,
            vec![
                "  ---",
                "  severity: fail",
                "  message: |2-",
                "      indented first line",
                "    second line",
                "  ...",
            ]
        );

        // Content lines sit exactly four spaces in; removing them gives the message back.
        let body = &block[3..block.len() - 1];
        assert!(body.iter().all(|line| line.starts_with("    ")));
        let recovered: Vec<&str> = body.iter().map(|line| &line[4..]).collect();
        assert_eq!(recovered.join("\n"), message);
    }

    #[test]
    fn test_yaml_block_blank_first_line_gets_indicator() {
        let block = yaml_block("todo", None, "   \nafter a blank line");
        assert_eq!(block[2], "  message: |2-");
        assert_eq!(block[3], "    ");
        assert_eq!(block[4], "    after a blank line");
    }

    #[test]
    fn test_yaml_block_empty_message() {
        assert_eq!(
            yaml_block("fail", None, ""),
            vec!["  ---", "  severity: fail", "  message: \"\"", "  ..."]
        );
    }
}
