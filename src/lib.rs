//! # pdf-summarizer
//!
//! Summarise PDF documents with an LLM, in the document's own language.
//!
//! The crate extracts the text of an uploaded PDF, detects its dominant
//! language, composes a style- and language-specific prompt, sends it to a
//! summarisation engine, and hands back a markdown-flavoured summary that can
//! be exported as plain text, JSON, CSV, or a formatted A4 PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Extract   page text via pdfium (spawn_blocking)
//!  ├─ 2. Detect    language of the first 1000 chars, `en` on failure
//!  ├─ 3. Compose   directive + style instructions + bold request + text (≤ 5000 chars)
//!  ├─ 4. Engine    Gemini / OpenAI / Anthropic / Ollama via edgequake-llm, or the mock
//!  ├─ 5. Tidy      strip fences, CRLF, invisible characters
//!  └─ 6. Export    txt / json / csv, or structured document → A4 PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_summarizer::{ExportFormat, Summarizer, SummarizerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // gemini when GEMINI_API_KEY is set, otherwise the offline mock engine
//!     let summarizer = Summarizer::new(SummarizerConfig::from_env())?;
//!
//!     let bytes = std::fs::read("report.pdf")?;
//!     let response = summarizer.summarize(bytes, "bullets").await?;
//!     println!("[{}] {}", response.detected_language, response.summary);
//!
//!     let pdf = summarizer.export(&response.summary, ExportFormat::Pdf, None).await?;
//!     std::fs::write(&pdf.filename, &pdf.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-summarizer = { version = "0.1", default-features = false }
//! ```
//!
//! ## Styles
//!
//! | Style | Output |
//! |-------|--------|
//! | `standard`  | Clear paragraphs highlighting key ideas (default) |
//! | `executive` | Problem, recommendations, expected impact |
//! | `bullets`   | Short bullet points, grouped under subheadings |
//! | `detailed`  | Background, main points, nuances, conclusions |
//!
//! Any other value falls back to `standard`.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod style;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EngineSelection, SummarizerConfig, SummarizerConfigBuilder};
pub use error::SummarizeError;
pub use export::{export_summary, write_exported, ExportFormat, ExportedFile};
pub use language::{DetectedLanguage, Language};
pub use output::{PreviewResponse, SummaryResponse};
pub use pipeline::compose::Prompt;
pub use pipeline::engine::{EngineError, LlmEngine, MockEngine, SummaryEngine};
pub use pipeline::format::{to_document, to_plain_text, StructuredDoc};
pub use style::SummaryStyle;
pub use summarize::Summarizer;
