//! Error types for the pdf-summarizer library.
//!
//! Every failure that can leave the pipeline is one of the variants of
//! [`SummarizeError`]. Internal failures (pdfium errors, join errors, provider
//! errors) are translated into it at the stage that observes them, so no
//! foreign error type crosses the library boundary.
//!
//! Variants fall into two classes, reported by
//! [`SummarizeError::is_client_error`]:
//!
//! * **client**: the uploaded input is unusable (not a PDF, no text, …).
//!   Retrying with the same input cannot succeed.
//! * **server**: the input was fine but something on our side failed
//!   (engine call, document rendering, configuration).
//!
//! Language-detection failure is deliberately absent: the detector falls back
//! to English instead of failing.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-summarizer library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The path exists but could not be read as a file (a directory, an I/O
    /// fault).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes do not start with the `%PDF` signature.
    #[error("Upload is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not parse the document.
    #[error("PDF is corrupt or unreadable: {detail}")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none (or a wrong one) was provided.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// The document parsed but no page yielded any text.
    #[error("PDF contains no extractable text")]
    EmptyDocument,

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The configured engine cannot be constructed (missing API key etc.).
    #[error("Summarisation provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The summarisation engine call failed.
    #[error("Summarisation engine error: {message}")]
    Engine { message: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// An export was requested for a blank summary.
    #[error("Summary is required: nothing to export")]
    EmptySummary,

    /// The structured summary document could not be rendered.
    #[error("Failed to render summary document: {message}")]
    ExportRender { message: String },

    /// Could not create or write an export file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium system-wide, or set PDFIUM_LIB_PATH to the directory\n\
containing libpdfium.so / libpdfium.dylib / pdfium.dll.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    /// `true` when the failure is caused by the caller's input and should be
    /// reported as a client error (HTTP 4xx in a web host).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SummarizeError::FileNotFound { .. }
                | SummarizeError::PermissionDenied { .. }
                | SummarizeError::ReadFailed { .. }
                | SummarizeError::InvalidInput { .. }
                | SummarizeError::DownloadFailed { .. }
                | SummarizeError::DownloadTimeout { .. }
                | SummarizeError::NotAPdf { .. }
                | SummarizeError::CorruptPdf { .. }
                | SummarizeError::PasswordRequired
                | SummarizeError::EmptyDocument
                | SummarizeError::EmptySummary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_client_error() {
        let e = SummarizeError::EmptyDocument;
        assert!(e.is_client_error());
        assert!(e.to_string().contains("no extractable text"));
    }

    #[test]
    fn engine_error_is_server_error() {
        let e = SummarizeError::Engine {
            message: "quota exceeded".into(),
        };
        assert!(!e.is_client_error());
        assert!(e.to_string().contains("quota exceeded"));
    }

    #[test]
    fn export_render_display_carries_message() {
        let e = SummarizeError::ExportRender {
            message: "font missing".into(),
        };
        assert!(!e.is_client_error());
        assert!(e.to_string().contains("font missing"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = SummarizeError::NotAPdf {
            magic: b"PK\x03\x04".to_vec(),
        };
        assert!(e.is_client_error());
        assert!(e.to_string().contains("not a valid PDF"));
    }
}
