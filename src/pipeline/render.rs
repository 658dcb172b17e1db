//! PDF export: render a [`StructuredDoc`] onto paginated A4 pages via pdfium.
//!
//! Rendering is split in two:
//!
//! 1. [`layout`]: pure. Word-wraps every line to the text column using
//!    Helvetica advance widths, assigns coordinates, and breaks pages. No
//!    pdfium involved, so it is tested directly.
//! 2. [`render_pdf`]: blocking. Creates a new pdfium document, draws every
//!    placed run as a text object with one of the four standard Helvetica
//!    faces, and saves to bytes.
//!
//! pdfium is not async-safe; async callers go through [`render_pdf_async`],
//! which moves the work onto `spawn_blocking`. Bytes are only returned after
//! the whole document has been saved, so a failure never yields a partial
//! file.

use crate::error::SummarizeError;
use crate::pipeline::format::{DocLine, StructuredDoc, BULLET_GLYPH};
use crate::pipeline::pdfium::bind_pdfium;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// ISO A4 in PDF points.
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;

const MARGIN: f32 = 56.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LINE_SPACING: f32 = 1.4;
const TITLE_GAP: f32 = 14.0;
const PARAGRAPH_GAP: f32 = 8.0;
const BULLET_INDENT: f32 = 14.0;

/// The four standard Helvetica faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    fn from_style(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontFace::Regular,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Italic,
            (true, true) => FontFace::BoldItalic,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldItalic)
    }
}

/// A run of text at a fixed baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub face: FontFace,
    pub size: f32,
}

/// Positioned runs for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub runs: Vec<PlacedRun>,
}

/// Positioned runs for every page, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<PageLayout>,
}

// ── Text metrics ─────────────────────────────────────────────────────────

/// Helvetica advance widths (1/1000 em) for printable ASCII, `' '..='~'`.
/// The oblique faces share these.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths, same range. Shared by Helvetica-BoldOblique.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

fn char_width(c: char, face: FontFace) -> f32 {
    let table = if face.is_bold() {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    let width = match c {
        ' '..='~' => table[c as usize - ' ' as usize],
        BULLET_GLYPH => 350,
        _ if face.is_bold() => 611,
        _ => 556,
    };
    f32::from(width)
}

/// Advance width of `text` in points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, face)).sum::<f32>() * size / 1000.0
}

// ── Layout ───────────────────────────────────────────────────────────────

/// A word: whitespace-free fragments that may switch face mid-word
/// (`**Point**:`).
type Word = Vec<(String, FontFace)>;

fn word_width(word: &Word, size: f32) -> f32 {
    word.iter().map(|(t, f)| text_width(t, *f, size)).sum()
}

/// Width of the space placed after `word`; it joins the word's last run.
fn space_after(word: &Word, size: f32) -> f32 {
    let face = word.last().map_or(FontFace::Regular, |(_, f)| *f);
    text_width(" ", face, size)
}

/// Split a line's spans into words, keeping per-fragment faces.
fn words_of(line: &DocLine) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Word = Vec::new();

    for span in line.spans() {
        let face = FontFace::from_style(span.bold, span.italic);
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some((text, f)) if *f == face => text.push(c),
                _ => current.push((c.to_string(), face)),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Break a word wider than `max` into character chunks that fit.
fn split_long_word(word: Word, max: f32, size: f32) -> Vec<Word> {
    let mut pieces = Vec::new();
    let mut current: Word = Vec::new();
    let mut width = 0.0;

    for (text, face) in word {
        for c in text.chars() {
            let w = char_width(c, face) * size / 1000.0;
            if width + w > max && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                width = 0.0;
            }
            match current.last_mut() {
                Some((t, f)) if *f == face => t.push(c),
                _ => current.push((c.to_string(), face)),
            }
            width += w;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap into lines no wider than `max`.
fn wrap(words: Vec<Word>, max: f32, size: f32) -> Vec<Vec<Word>> {
    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut width = 0.0;

    for word in words {
        let pieces = if word_width(&word, size) > max {
            split_long_word(word, max, size)
        } else {
            vec![word]
        };
        for piece in pieces {
            let w = word_width(&piece, size);
            let needed = match current.last() {
                Some(prev) => width + space_after(prev, size) + w,
                None => w,
            };
            if needed > max && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                width = w;
            } else {
                width = needed;
            }
            current.push(piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Merge a wrapped line's words into face-homogeneous runs starting at `x`.
fn place_line(words: &[Word], x: f32, y: f32, size: f32) -> Vec<PlacedRun> {
    let mut runs: Vec<(String, FontFace)> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            if let Some((text, _)) = runs.last_mut() {
                text.push(' ');
            }
        }
        for (text, face) in word {
            match runs.last_mut() {
                Some((t, f)) if f == face => t.push_str(text),
                _ => runs.push((text.clone(), *face)),
            }
        }
    }

    let mut cursor = x;
    runs.into_iter()
        .map(|(text, face)| {
            let run = PlacedRun {
                x: cursor,
                y,
                face,
                size,
                text,
            };
            cursor += text_width(&run.text, face, size);
            run
        })
        .collect()
}

/// Tracks the baseline position and opens pages as needed.
struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Move down one line of `size` and return its baseline, starting a new
    /// page when the line would cross the bottom margin.
    fn next_line(&mut self, size: f32) -> f32 {
        let advance = size * LINE_SPACING;
        if self.y - advance < MARGIN {
            self.pages.push(PageLayout::default());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= advance;
        self.y
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    fn push(&mut self, runs: Vec<PlacedRun>) {
        if let Some(page) = self.pages.last_mut() {
            page.runs.extend(runs);
        }
    }
}

/// Lay out `doc` on A4 pages.
pub fn layout(doc: &StructuredDoc) -> Layout {
    let column = PAGE_WIDTH - 2.0 * MARGIN;
    let mut cursor = Cursor::new();

    let title_words = doc
        .title
        .split_whitespace()
        .map(|w| vec![(w.to_string(), FontFace::Bold)])
        .collect();
    for line in wrap(title_words, column, TITLE_SIZE) {
        let y = cursor.next_line(TITLE_SIZE);
        cursor.push(place_line(&line, MARGIN, y, TITLE_SIZE));
    }
    cursor.gap(TITLE_GAP);

    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            cursor.gap(PARAGRAPH_GAP);
        }
        for line in &block.lines {
            let (indent, glyph) = match line {
                DocLine::Bullet(_) => (BULLET_INDENT, true),
                DocLine::Text(_) => (0.0, false),
            };
            let wrapped = wrap(words_of(line), column - indent, BODY_SIZE);

            if wrapped.is_empty() {
                let y = cursor.next_line(BODY_SIZE);
                if glyph {
                    cursor.push(vec![bullet_run(y)]);
                }
                continue;
            }

            for (n, words) in wrapped.iter().enumerate() {
                let y = cursor.next_line(BODY_SIZE);
                if glyph && n == 0 {
                    cursor.push(vec![bullet_run(y)]);
                }
                cursor.push(place_line(words, MARGIN + indent, y, BODY_SIZE));
            }
        }
    }

    Layout {
        pages: cursor.pages,
    }
}

fn bullet_run(y: f32) -> PlacedRun {
    PlacedRun {
        x: MARGIN,
        y,
        text: BULLET_GLYPH.to_string(),
        face: FontFace::Regular,
        size: BODY_SIZE,
    }
}

// ── pdfium drawing ───────────────────────────────────────────────────────

fn render_error(context: &str, e: impl std::fmt::Debug) -> SummarizeError {
    SummarizeError::ExportRender {
        message: format!("{context}: {e:?}"),
    }
}

/// Render `doc` to PDF bytes. Blocking.
pub fn render_pdf(doc: &StructuredDoc) -> Result<Vec<u8>, SummarizeError> {
    let plan = layout(doc);

    let pdfium = bind_pdfium().map_err(|e| SummarizeError::ExportRender {
        message: e.to_string(),
    })?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| render_error("create document", e))?;

    let regular = document.fonts_mut().helvetica();
    let bold = document.fonts_mut().helvetica_bold();
    let italic = document.fonts_mut().helvetica_oblique();
    let bold_italic = document.fonts_mut().helvetica_bold_oblique();

    for (index, page_plan) in plan.pages.iter().enumerate() {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::a4())
            .map_err(|e| render_error("create page", e))?;

        for run in &page_plan.runs {
            let font = match run.face {
                FontFace::Regular => regular,
                FontFace::Bold => bold,
                FontFace::Italic => italic,
                FontFace::BoldItalic => bold_italic,
            };
            page.objects_mut()
                .create_text_object(
                    PdfPoints::new(run.x),
                    PdfPoints::new(run.y),
                    &run.text,
                    font,
                    PdfPoints::new(run.size),
                )
                .map_err(|e| render_error("draw text", e))?;
        }
        debug!("Rendered page {} ({} runs)", index + 1, page_plan.runs.len());
    }

    let bytes = document
        .save_to_bytes()
        .map_err(|e| render_error("save document", e))?;

    info!(
        "PDF export: {} pages, {} bytes",
        plan.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// [`render_pdf`] on the blocking pool.
pub async fn render_pdf_async(doc: StructuredDoc) -> Result<Vec<u8>, SummarizeError> {
    tokio::task::spawn_blocking(move || render_pdf(&doc))
        .await
        .map_err(render_task_failed)?
}

fn render_task_failed(e: tokio::task::JoinError) -> SummarizeError {
    SummarizeError::ExportRender {
        message: format!("render task failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::format::to_document;

    fn all_runs(layout: &Layout) -> impl Iterator<Item = &PlacedRun> {
        layout.pages.iter().flat_map(|p| p.runs.iter())
    }

    #[test]
    fn widths_follow_helvetica_metrics() {
        assert_eq!(text_width("i", FontFace::Regular, 1000.0), 222.0);
        assert_eq!(text_width("W", FontFace::Regular, 1000.0), 944.0);
        assert!(text_width("abc", FontFace::Bold, 11.0) > text_width("abc", FontFace::Regular, 11.0));
    }

    #[test]
    fn bold_widths_come_from_their_own_table() {
        assert_eq!(text_width("i", FontFace::Bold, 1000.0), 278.0);
        assert_eq!(text_width("m", FontFace::BoldItalic, 1000.0), 889.0);
        assert_eq!(text_width("i", FontFace::Italic, 1000.0), 222.0);
        assert_eq!(text_width(" ", FontFace::Bold, 1000.0), 278.0);
    }

    #[test]
    fn bold_heavy_lines_stay_inside_the_margin() {
        let raw = (0..60)
            .map(|i| format!("**ill{i}** iii **mmm,**"))
            .collect::<Vec<_>>()
            .join(" ");
        let plan = layout(&to_document(&raw));
        let right_edge = PAGE_WIDTH - MARGIN + 0.01;
        for run in all_runs(&plan) {
            assert!(
                run.x + text_width(&run.text, run.face, run.size) <= right_edge,
                "run {:?} overflows",
                run.text
            );
        }
    }

    #[test]
    fn title_comes_first_in_bold() {
        let plan = layout(&to_document("Body text"));
        let first = &plan.pages[0].runs[0];
        assert_eq!(first.text, "PDF Summary");
        assert_eq!(first.face, FontFace::Bold);
        assert_eq!(first.size, TITLE_SIZE);
    }

    #[test]
    fn emphasis_maps_to_faces() {
        let plan = layout(&to_document("**Key Point**: it *matters*"));
        let body: Vec<(&str, FontFace)> = plan.pages[0].runs[1..]
            .iter()
            .map(|r| (r.text.as_str(), r.face))
            .collect();
        assert_eq!(
            body,
            vec![
                ("Key Point", FontFace::Bold),
                (": it ", FontFace::Regular),
                ("matters", FontFace::Italic),
            ]
        );
        let runs = &plan.pages[0].runs[1..];
        assert!(runs[0].x < runs[1].x && runs[1].x < runs[2].x);
    }

    #[test]
    fn bullets_get_glyph_and_indent() {
        let plan = layout(&to_document("- Item one"));
        let runs = &plan.pages[0].runs[1..];
        assert_eq!(runs[0].text, "•");
        assert_eq!(runs[0].x, MARGIN);
        assert_eq!(runs[1].text, "Item one");
        assert_eq!(runs[1].x, MARGIN + BULLET_INDENT);
        assert_eq!(runs[0].y, runs[1].y);
    }

    #[test]
    fn long_paragraphs_wrap_inside_the_column() {
        let plan = layout(&to_document(&"wrapping words ".repeat(80)));
        let right_edge = PAGE_WIDTH - MARGIN + 0.01;
        for run in all_runs(&plan) {
            assert!(run.x + text_width(&run.text, run.face, run.size) <= right_edge);
        }
        assert!(plan.pages[0].runs.len() > 5);
    }

    #[test]
    fn oversized_words_are_split() {
        let plan = layout(&to_document(&"x".repeat(500)));
        let body: String = all_runs(&plan).skip(1).map(|r| r.text.as_str()).collect();
        assert_eq!(body, "x".repeat(500));
    }

    #[test]
    fn content_flows_onto_new_pages() {
        let raw = (0..120)
            .map(|i| format!("Paragraph {i}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let plan = layout(&to_document(&raw));
        assert!(plan.pages.len() > 1);
        for run in all_runs(&plan) {
            assert!(run.y >= MARGIN && run.y <= PAGE_HEIGHT - MARGIN);
        }
    }

    #[test]
    fn empty_summary_still_has_a_title_page() {
        let plan = layout(&to_document(""));
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.pages[0].runs.len(), 1);
    }

    #[test]
    fn render_produces_pdf_bytes_when_pdfium_is_available() {
        if !crate::pipeline::pdfium::pdfium_available() {
            eprintln!("SKIP: pdfium library not available");
            return;
        }
        let bytes = render_pdf(&to_document("**Key Point**: This matters.\n\n- Item one")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn panicking_render_task_is_an_export_error() {
        let join_err = tokio::task::spawn_blocking(|| panic!("font table missing"))
            .await
            .unwrap_err();
        match render_task_failed(join_err) {
            SummarizeError::ExportRender { message } => {
                assert!(message.starts_with("render task failed"), "got {message}")
            }
            other => panic!("expected ExportRender, got {other:?}"),
        }
    }
}
