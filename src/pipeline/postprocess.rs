//! Post-processing: deterministic cleanup of engine output.
//!
//! Well-prompted models still produce artefacts that have nothing to do with
//! the summary itself:
//!
//! - wrapping the whole answer in ` ```markdown ... ``` ` fences
//! - Windows-style `\r\n` line endings
//! - zero-width spaces and BOMs copied from the source document
//! - long runs of blank lines
//!
//! The passes below remove those and nothing else. Emphasis markers are left
//! alone; stripping or interpreting them is the formatter's job.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup passes to a raw engine summary.
///
/// Passes (applied in order):
/// 1. Strip outer markdown fences
/// 2. Normalise line endings (CRLF → LF)
/// 3. Remove invisible Unicode
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive blank lines down to 1
/// 6. Trim the whole text
pub fn tidy_summary(raw: &str) -> String {
    let s = strip_markdown_fences(raw);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

static RE_OUTER_FENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:markdown|md|text)?\r?\n(.*)\r?\n```\s*$")
        .expect("outer fence pattern is valid")
});

fn strip_markdown_fences(input: &str) -> String {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        assert_eq!(
            strip_markdown_fences("```markdown\n**Key** point\n```"),
            "**Key** point"
        );
        assert_eq!(strip_markdown_fences("```\nplain\n```"), "plain");
    }

    #[test]
    fn test_no_fences_passthrough() {
        let input = "Some **bold** text\n- item";
        assert_eq!(strip_markdown_fences(input), input);
    }

    #[test]
    fn test_inner_code_block_untouched() {
        let input = "Intro\n```\ncode\n```\nOutro";
        assert_eq!(strip_markdown_fences(input), input);
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_tidy_full_pass() {
        let raw = "```markdown\r\n**Summary**   \r\n\r\n\r\n\r\n- one\u{200B}\r\n- two\r\n```\n";
        assert_eq!(tidy_summary(raw), "**Summary**\n\n- one\n- two");
    }

    #[test]
    fn test_tidy_keeps_emphasis_and_bullets() {
        let raw = "**Key** point\n* item with *italic*";
        assert_eq!(tidy_summary(raw), raw);
    }
}
