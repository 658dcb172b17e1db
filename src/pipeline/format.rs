//! Summary formatting: raw markdown-flavoured engine output → plain text or a
//! structured document.
//!
//! ## Two modes
//!
//! * [`to_plain_text`] strips `**bold**` then `*italic*` markers line by line
//!   and leaves everything else (line breaks, bullet glyphs) untouched.
//! * [`to_document`] builds a small intermediate representation:
//!   a title plus ordered [`Block`]s of [`DocLine`]s, each line a sequence of
//!   styled [`Span`]s. The PDF renderer consumes this IR; it never sees
//!   markdown.
//!
//! ## Structure before emphasis
//!
//! Lines are classified on their raw text first (blank / bullet / text) and
//! only then tokenized for emphasis. A line such as `* **Revenue** grew` is
//! therefore a bullet whose first span is bold, and a line such as
//! `**Revenue** grew` is plain text, not a bullet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Title block prepended to every structured document.
pub const DOCUMENT_TITLE: &str = "PDF Summary";

/// Glyph used when re-emitting bullet lines.
pub const BULLET_GLYPH: char = '•';

// ── Plain text ───────────────────────────────────────────────────────────

static RE_BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static RE_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));

/// Strip emphasis markers, keep every other character.
///
/// Markers never span lines (`.` does not match `\n`), so the passes can run
/// over the whole text at once.
pub fn to_plain_text(raw: &str) -> String {
    let without_bold = RE_BOLD.replace_all(raw, "$1");
    RE_ITALIC.replace_all(&without_bold, "$1").into_owned()
}

// ── Structured document IR ───────────────────────────────────────────────

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "spans", rename_all = "lowercase")]
pub enum DocLine {
    /// Rendered with a leading [`BULLET_GLYPH`], whatever the source glyph was.
    Bullet(Vec<Span>),
    Text(Vec<Span>),
}

impl DocLine {
    pub fn spans(&self) -> &[Span] {
        match self {
            DocLine::Bullet(spans) | DocLine::Text(spans) => spans,
        }
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self, DocLine::Bullet(_))
    }

    /// The line's text without styling; bullets carry the normalised glyph.
    pub fn plain_text(&self) -> String {
        let body: String = self.spans().iter().map(|s| s.text.as_str()).collect();
        match self {
            DocLine::Bullet(_) => format!("{BULLET_GLYPH} {body}"),
            DocLine::Text(_) => body,
        }
    }
}

/// A paragraph: one maximal run of non-blank source lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Block {
    pub lines: Vec<DocLine>,
}

/// Title plus ordered paragraph blocks, ready for paginated rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredDoc {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl StructuredDoc {
    /// Number of blocks including the title block.
    pub fn block_count(&self) -> usize {
        self.blocks.len() + 1
    }

    pub fn paragraph_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Build the structured document for a raw summary.
pub fn to_document(raw: &str) -> StructuredDoc {
    let mut blocks = Vec::new();
    let mut current = Block::default();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.lines.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.lines.push(classify_line(trimmed));
    }
    if !current.lines.is_empty() {
        blocks.push(current);
    }

    StructuredDoc {
        title: DOCUMENT_TITLE.to_string(),
        blocks,
    }
}

/// Classify a trimmed, non-blank line and tokenize its emphasis.
fn classify_line(line: &str) -> DocLine {
    match bullet_body(line) {
        Some(body) => DocLine::Bullet(tokenize(body)),
        None => DocLine::Text(tokenize(line)),
    }
}

/// The text after a leading bullet glyph, if the line is a bullet.
///
/// `•` is always a bullet. `-` and `*` only count when followed by
/// whitespace (or nothing), so `**bold**` and `-5%` stay text.
pub(crate) fn bullet_body(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(BULLET_GLYPH) {
        return Some(rest.trim_start());
    }
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('*'))?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        Some(_) => None,
    }
}

// ── Emphasis tokenizer ───────────────────────────────────────────────────

/// Split one line into styled spans.
///
/// `**` opens bold up to the next `**`; a single `*` opens italic up to the
/// next single `*`, skipping complete `**…**` pairs on the way. Unclosed
/// markers are kept as literal text.
pub fn tokenize(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    tokenize_into(line, false, false, &mut spans);
    spans
}

fn tokenize_into(s: &str, bold: bool, italic: bool, out: &mut Vec<Span>) {
    let mut literal = String::new();
    let mut rest = s;

    while let Some(star) = rest.find('*') {
        literal.push_str(&rest[..star]);
        let after_star = &rest[star..];

        if let Some(inner_start) = after_star.strip_prefix("**") {
            if let Some(close) = inner_start.find("**") {
                push_span(out, std::mem::take(&mut literal), bold, italic);
                tokenize_into(&inner_start[..close], true, italic, out);
                rest = &inner_start[close + 2..];
                continue;
            }
            literal.push_str("**");
            rest = inner_start;
            continue;
        }

        let inner_start = &after_star[1..];
        match italic_close(inner_start) {
            Some(close) => {
                push_span(out, std::mem::take(&mut literal), bold, italic);
                tokenize_into(&inner_start[..close], bold, true, out);
                rest = &inner_start[close + 1..];
            }
            None => {
                literal.push('*');
                rest = inner_start;
            }
        }
    }

    literal.push_str(rest);
    push_span(out, literal, bold, italic);
}

/// Byte offset of the `*` closing an italic run in `s`.
fn italic_close(s: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(pos) = s[offset..].find('*') {
        let at = offset + pos;
        if s[at..].starts_with("**") {
            match s[at + 2..].find("**") {
                Some(close) => offset = at + 2 + close + 2,
                None => return Some(at),
            }
        } else {
            return Some(at);
        }
    }
    None
}

/// Append a span, merging with the previous one when the style matches.
fn push_span(out: &mut Vec<Span>, text: String, bold: bool, italic: bool) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut() {
        if last.bold == bold && last.italic == italic {
            last.text.push_str(&text);
            return;
        }
    }
    out.push(Span { text, bold, italic });
}
