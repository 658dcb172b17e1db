//! Export of a finished summary into downloadable files.
//!
//! Four formats are supported:
//!
//! | Format | Default filename | Content type |
//! |--------|------------------|--------------|
//! | [`ExportFormat::Text`] | `summary.txt` | `text/plain; charset=utf-8` |
//! | [`ExportFormat::Pdf`]  | `summary.pdf` | `application/pdf` |
//! | [`ExportFormat::Json`] | `summary.json` | `application/json; charset=utf-8` |
//! | [`ExportFormat::Csv`]  | `summary.csv` | `text/csv; charset=utf-8` |
//!
//! Every format starts from the same raw markdown-flavoured summary. Text,
//! JSON and CSV strip emphasis markers first; PDF goes through the structured
//! document IR so emphasis survives as font faces.

use crate::error::SummarizeError;
use crate::pipeline::format::{bullet_body, to_document, to_plain_text, DOCUMENT_TITLE};
use crate::pipeline::render::render_pdf_async;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

const DEFAULT_BASENAME: &str = "summary";

/// Export target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Pdf,
    Json,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Pdf,
        ExportFormat::Json,
        ExportFormat::Csv,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!(
                "unknown export format '{other}' (expected txt, pdf, json or csv)"
            )),
        }
    }
}

/// A rendered export, ready to be written or sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `summary.<ext>` by default; a caller-supplied name gets the extension
/// appended when it does not already end with it.
pub fn export_filename(custom: Option<&str>, format: ExportFormat) -> String {
    let base = custom
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BASENAME);
    let suffix = format!(".{}", format.extension());
    if base.ends_with(&suffix) {
        base.to_string()
    } else {
        format!("{base}{suffix}")
    }
}

/// Render `summary` in `format`.
///
/// `title` is only used by the JSON export; it defaults to `PDF Summary`.
pub async fn export_summary(
    summary: &str,
    format: ExportFormat,
    filename: Option<&str>,
    title: Option<&str>,
) -> Result<ExportedFile, SummarizeError> {
    if summary.trim().is_empty() {
        return Err(SummarizeError::EmptySummary);
    }

    let bytes = match format {
        ExportFormat::Text => to_plain_text(summary).into_bytes(),
        ExportFormat::Pdf => render_pdf_async(to_document(summary)).await?,
        ExportFormat::Json => json_export(summary, title, OffsetDateTime::now_utc())?,
        ExportFormat::Csv => csv_export(summary).into_bytes(),
    };

    let file = ExportedFile {
        filename: export_filename(filename, format),
        content_type: format.content_type(),
        bytes,
    };
    info!("Exported {} ({} bytes)", file.filename, file.bytes.len());
    Ok(file)
}

/// Write an export to `path`, creating parent directories as needed.
pub async fn write_exported(file: &ExportedFile, path: &Path) -> Result<(), SummarizeError> {
    let write_err = |source| SummarizeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, &file.bytes).await.map_err(write_err)?;
    info!("Wrote {} ({} bytes)", path.display(), file.bytes.len());
    Ok(())
}

// ── JSON ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    title: &'a str,
    exported_at: String,
    content: JsonContent,
    metadata: JsonMetadata,
}

#[derive(Debug, Serialize)]
struct JsonContent {
    full_text: String,
    paragraphs: Vec<String>,
    points: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JsonMetadata {
    total_paragraphs: usize,
    total_points: usize,
    character_count: usize,
}

/// Non-blank lines of the stripped summary, split into paragraph lines and
/// bullet points (glyph removed).
fn split_lines(plain: &str) -> (Vec<String>, Vec<String>) {
    let mut paragraphs = Vec::new();
    let mut points = Vec::new();
    for line in plain.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match bullet_body(line) {
            Some(point) => points.push(point.trim().to_string()),
            None => paragraphs.push(line.to_string()),
        }
    }
    (paragraphs, points)
}

fn json_export(
    summary: &str,
    title: Option<&str>,
    now: OffsetDateTime,
) -> Result<Vec<u8>, SummarizeError> {
    let full_text = to_plain_text(summary);
    let (paragraphs, points) = split_lines(&full_text);

    let exported_at = now
        .format(&Rfc3339)
        .map_err(|e| SummarizeError::Internal(format!("timestamp formatting failed: {e}")))?;

    let export = JsonExport {
        title: title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DOCUMENT_TITLE),
        exported_at,
        metadata: JsonMetadata {
            total_paragraphs: paragraphs.len(),
            total_points: points.len(),
            character_count: full_text.chars().count(),
        },
        content: JsonContent {
            full_text,
            paragraphs,
            points,
        },
    };

    serde_json::to_vec_pretty(&export)
        .map_err(|e| SummarizeError::Internal(format!("JSON export failed: {e}")))
}

// ── CSV ──────────────────────────────────────────────────────────────────

/// Row type column for one stripped, non-blank line.
fn line_kind(line: &str) -> (&'static str, &str) {
    if let Some(point) = bullet_body(line) {
        ("Bullet Point", point.trim())
    } else if line.ends_with(':') {
        ("Heading", line)
    } else {
        ("Paragraph", line)
    }
}

/// Quote a CSV field when it contains a delimiter, quote, line break, or
/// leading whitespace.
fn csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(|c: char| c.is_whitespace());
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `No,Type,Content`, one row per non-blank line. `No` holds the text before
/// the first `:` of the content.
fn csv_export(summary: &str) -> String {
    let plain = to_plain_text(summary);
    let mut out = String::from("No,Type,Content\n");

    for line in plain.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (kind, content) = line_kind(line);
        let label = content.split(':').next().unwrap_or_default().trim();
        out.push_str(&csv_field(label));
        out.push(',');
        out.push_str(kind);
        out.push(',');
        out.push_str(&csv_field(content));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const SUMMARY: &str =
        "**Overview:**\nThe report covers **Q3**.\n\n- Revenue grew, sharply\n• Costs fell\n* Outlook: \"stable\"";

    #[test]
    fn filenames_get_extension() {
        assert_eq!(export_filename(None, ExportFormat::Text), "summary.txt");
        assert_eq!(export_filename(Some("  "), ExportFormat::Pdf), "summary.pdf");
        assert_eq!(export_filename(Some("q3-report"), ExportFormat::Csv), "q3-report.csv");
        assert_eq!(export_filename(Some("q3.json"), ExportFormat::Json), "q3.json");
        assert_eq!(export_filename(Some("q3.txt"), ExportFormat::Json), "q3.txt.json");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("TXT".parse::<ExportFormat>(), Ok(ExportFormat::Text));
        assert_eq!(" pdf ".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert!("docx".parse::<ExportFormat>().is_err());
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
        }
    }

    #[tokio::test]
    async fn text_export_strips_markers() {
        let file = export_summary(
            "**Key Point**: This matters.\n\n- Item one\n- Item two",
            ExportFormat::Text,
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(file.filename, "summary.txt");
        assert_eq!(file.content_type, "text/plain; charset=utf-8");
        assert_eq!(
            String::from_utf8(file.bytes).unwrap(),
            "Key Point: This matters.\n\n- Item one\n- Item two"
        );
    }

    #[tokio::test]
    async fn blank_summary_is_rejected() {
        let err = export_summary(" \n ", ExportFormat::Csv, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::EmptySummary));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn exports_are_written_with_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.csv");
        let file = export_summary("- one", ExportFormat::Csv, None, None)
            .await
            .unwrap();
        write_exported(&file, &path).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "No,Type,Content\none,Bullet Point,one\n"
        );
    }

    #[test]
    fn json_export_structure() {
        let bytes = json_export(SUMMARY, None, datetime!(2024-05-01 12:30:00 UTC)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["title"], "PDF Summary");
        assert_eq!(value["exported_at"], "2024-05-01T12:30:00Z");
        assert_eq!(
            value["content"]["paragraphs"],
            serde_json::json!(["Overview:", "The report covers Q3."])
        );
        assert_eq!(
            value["content"]["points"],
            serde_json::json!(["Revenue grew, sharply", "Costs fell", "Outlook: \"stable\""])
        );
        assert_eq!(value["metadata"]["total_paragraphs"], 2);
        assert_eq!(value["metadata"]["total_points"], 3);
        let full_text = value["content"]["full_text"].as_str().unwrap();
        assert!(!full_text.contains("**"));
        assert_eq!(
            value["metadata"]["character_count"],
            full_text.chars().count()
        );
    }

    #[test]
    fn json_export_custom_title() {
        let bytes = json_export("text", Some("Board Memo"), OffsetDateTime::UNIX_EPOCH).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["title"], "Board Memo");
    }

    #[test]
    fn csv_export_rows() {
        let csv = csv_export(SUMMARY);
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(
            rows,
            vec![
                "No,Type,Content",
                "Overview,Heading,Overview:",
                "The report covers Q3.,Paragraph,The report covers Q3.",
                "\"Revenue grew, sharply\",Bullet Point,\"Revenue grew, sharply\"",
                "Costs fell,Bullet Point,Costs fell",
                "Outlook,Bullet Point,\"Outlook: \"\"stable\"\"\"",
            ]
        );
    }
}
