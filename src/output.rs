//! Response types returned by [`crate::summarize::Summarizer`].
//!
//! Both are plain serde structs so a web host can return them as JSON
//! bodies unchanged.

use crate::language::DetectedLanguage;
use crate::pipeline::prefix_chars;
use crate::style::SummaryStyle;
use serde::{Deserialize, Serialize};

/// Maximum characters of extracted text returned by a preview.
pub const PREVIEW_CHARS: usize = 2000;

/// Result of one summarisation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Label of the engine that produced the summary (`gemini`, `mock`, …).
    pub provider: String,
    /// Code reported by the language detector, verbatim.
    pub detected_language: DetectedLanguage,
    /// The style actually used, after normalisation.
    pub style: SummaryStyle,
    /// Cleaned, markdown-flavoured summary text.
    pub summary: String,
}

/// Leading slice of the extracted text, for showing the user what was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub detected_language: DetectedLanguage,
    pub preview_text: String,
    /// Characters in the full extracted text.
    pub total_length: usize,
    /// Characters in `preview_text`.
    pub preview_length: usize,
    pub is_truncated: bool,
}

impl PreviewResponse {
    /// Build a preview of `text`. Lengths are counted in characters.
    pub fn from_text(text: &str, detected_language: DetectedLanguage) -> Self {
        let preview_text = prefix_chars(text, PREVIEW_CHARS).to_string();
        let total_length = text.chars().count();
        let preview_length = preview_text.chars().count();
        Self {
            detected_language,
            preview_text,
            total_length,
            preview_length,
            is_truncated: total_length > PREVIEW_CHARS,
        }
    }
}
