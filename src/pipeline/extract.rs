//! Text extraction: PDF bytes → one normalised text blob.
//!
//! pdfium is not async-safe, so the parse runs inside
//! `tokio::task::spawn_blocking`. The page-joining rule itself lives in
//! [`assemble_pages`], a pure function that is tested without pdfium.

use crate::error::SummarizeError;
use crate::pipeline::input::Document;
use crate::pipeline::pdfium::bind_pdfium;
use tracing::{debug, info, warn};

/// Text pulled from a document: every page that produced text, in page
/// order, each followed by a newline.
///
/// Never empty after trimming whitespace; construction fails with
/// [`SummarizeError::EmptyDocument`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    pages_with_text: usize,
}

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of pages that contributed text.
    pub fn page_count(&self) -> usize {
        self.pages_with_text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Join per-page text into an [`ExtractedText`].
///
/// `None` and empty pages are skipped entirely; every other page is appended
/// followed by `\n`. A page holding only whitespace is kept (it still ends in
/// a newline) but cannot on its own make the document non-empty.
pub fn assemble_pages<I>(pages: I) -> Result<ExtractedText, SummarizeError>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut text = String::new();
    let mut pages_with_text = 0;

    for page in pages.into_iter().flatten() {
        if page.is_empty() {
            continue;
        }
        text.push_str(&page);
        text.push('\n');
        pages_with_text += 1;
    }

    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyDocument);
    }

    Ok(ExtractedText {
        text,
        pages_with_text,
    })
}

/// Extract the text of every page of `document`.
pub async fn extract(
    document: Document,
    password: Option<String>,
) -> Result<ExtractedText, SummarizeError> {
    tokio::task::spawn_blocking(move || extract_blocking(document.as_bytes(), password.as_deref()))
        .await
        .map_err(|e| SummarizeError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of [`extract`].
pub fn extract_blocking(
    bytes: &[u8],
    password: Option<&str>,
) -> Result<ExtractedText, SummarizeError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                SummarizeError::PasswordRequired
            } else {
                SummarizeError::CorruptPdf { detail: err_str }
            }
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let texts = pages.iter().enumerate().map(|(idx, page)| match page.text() {
        Ok(text) => Some(text.all()),
        Err(e) => {
            warn!("Skipping page {}: text extraction failed: {:?}", idx + 1, e);
            None
        }
    });

    let extracted = assemble_pages(texts)?;
    debug!(
        "Extracted {} chars from {}/{} pages",
        extracted.char_len(),
        extracted.page_count(),
        total_pages
    );
    Ok(extracted)
}
