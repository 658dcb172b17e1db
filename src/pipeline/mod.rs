//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and the orchestrator in [`crate::summarize`] stays a
//! thin sequence of calls.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ detect ──▶ compose ──▶ engine ──▶ postprocess ──▶ format ──▶ render
//! (bytes)   (pdfium)   (whatlang)  (prompt)    (LLM)      (tidy)          (IR)       (A4 PDF)
//! ```
//!
//! 1. [`input`]  : validate uploaded bytes, or read a path / download a URL
//! 2. [`extract`]: page text via pdfium; runs in `spawn_blocking`
//! 3. [`detect`] : language of the first 1000 characters, `en` on failure
//! 4. [`compose`]: the style- and language-specific prompt
//! 5. [`engine`] : the only stage with network I/O
//! 6. [`postprocess`]: strip engine quirks (fences, CRLF, invisible chars)
//! 7. [`format`] : markdown → plain text, or → structured document IR
//! 8. [`render`] : structured document → paginated PDF bytes

pub mod compose;
pub mod detect;
pub mod engine;
pub mod extract;
pub mod format;
pub mod input;
pub mod pdfium;
pub mod postprocess;
pub mod render;

/// The first `n` characters of `s` (not bytes), borrowed.
pub(crate) fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
