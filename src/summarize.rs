//! The summarisation entry point.
//!
//! [`Summarizer`] owns the engine chosen at construction and runs one
//! sequential pipeline per call:
//!
//! ```text
//! bytes → extract → detect → compose → engine → tidy
//! ```
//!
//! It holds no per-request state, so one instance can be shared behind an
//! `Arc` by any number of concurrent callers.

use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::export::{export_summary, ExportFormat, ExportedFile};
use crate::language::DetectedLanguage;
use crate::output::{PreviewResponse, SummaryResponse};
use crate::pipeline::engine::{engine_from_config, SummaryEngine};
use crate::pipeline::extract::{extract, ExtractedText};
use crate::pipeline::input::{resolve_input, Document};
use crate::pipeline::{compose, detect, postprocess};
use crate::style::SummaryStyle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs the PDF → summary pipeline against one configured engine.
pub struct Summarizer {
    engine: Arc<dyn SummaryEngine>,
    config: SummarizerConfig,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("engine", &self.engine.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Summarizer {
    /// Build the engine described by `config`.
    ///
    /// # Errors
    /// [`SummarizeError::ProviderNotConfigured`] when a named provider cannot
    /// be instantiated (unknown name, missing API key).
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizeError> {
        let engine = engine_from_config(&config)?;
        info!("Summarizer ready (engine: {})", engine.name());
        Ok(Self { engine, config })
    }

    /// Label of the engine reported in [`SummaryResponse::provider`].
    pub fn provider_label(&self) -> &str {
        self.engine.name()
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Summarise PDF bytes.
    ///
    /// `style` is a free-form parameter; unknown values fall back to
    /// `standard` rather than failing.
    pub async fn summarize(
        &self,
        bytes: impl Into<Vec<u8>>,
        style: &str,
    ) -> Result<SummaryResponse, SummarizeError> {
        let document = Document::from_bytes(bytes)?;
        self.summarize_document(document, style).await
    }

    /// Summarise a local path or an HTTP(S) URL.
    pub async fn summarize_path(
        &self,
        input: &str,
        style: &str,
    ) -> Result<SummaryResponse, SummarizeError> {
        let document = resolve_input(input, self.config.download_timeout_secs).await?;
        self.summarize_document(document, style).await
    }

    /// Summarise PDF bytes and return the pipeline's pieces without wrapping
    /// them in a response.
    pub async fn summarize_raw(
        &self,
        bytes: impl Into<Vec<u8>>,
        style: &str,
    ) -> Result<(DetectedLanguage, SummaryStyle, String), SummarizeError> {
        let document = Document::from_bytes(bytes)?;
        self.run(document, style).await
    }

    /// Extract and detect only; the engine is never called.
    pub async fn preview(&self, bytes: impl Into<Vec<u8>>) -> Result<PreviewResponse, SummarizeError> {
        let document = Document::from_bytes(bytes)?;
        let text = self.extract_text(document).await?;
        let language = detect::detect(text.as_str());
        Ok(PreviewResponse::from_text(text.as_str(), language))
    }

    /// [`Summarizer::preview`] for a local path or an HTTP(S) URL.
    pub async fn preview_path(&self, input: &str) -> Result<PreviewResponse, SummarizeError> {
        let document = resolve_input(input, self.config.download_timeout_secs).await?;
        let text = self.extract_text(document).await?;
        let language = detect::detect(text.as_str());
        Ok(PreviewResponse::from_text(text.as_str(), language))
    }

    /// Render a summary as a downloadable file.
    ///
    /// `filename` overrides the default `summary.<ext>` base name.
    pub async fn export(
        &self,
        summary: &str,
        format: ExportFormat,
        filename: Option<&str>,
    ) -> Result<ExportedFile, SummarizeError> {
        export_summary(summary, format, filename, None).await
    }

    async fn summarize_document(
        &self,
        document: Document,
        style: &str,
    ) -> Result<SummaryResponse, SummarizeError> {
        let (detected_language, style, summary) = self.run(document, style).await?;
        Ok(SummaryResponse {
            provider: self.provider_label().to_string(),
            detected_language,
            style,
            summary,
        })
    }

    async fn extract_text(&self, document: Document) -> Result<ExtractedText, SummarizeError> {
        extract(document, self.config.password.clone()).await
    }

    async fn run(
        &self,
        document: Document,
        style: &str,
    ) -> Result<(DetectedLanguage, SummaryStyle, String), SummarizeError> {
        let style = SummaryStyle::from_param(style);
        info!("Summarising {} bytes (style: {})", document.len(), style);

        // ── Step 1: Extract text ─────────────────────────────────────────
        let text = self.extract_text(document).await?;
        info!(
            "Extracted {} chars from {} pages",
            text.char_len(),
            text.page_count()
        );

        self.summarize_extracted(&text, style).await
    }

    /// Everything after extraction: detect, compose, call the engine, tidy.
    pub(crate) async fn summarize_extracted(
        &self,
        text: &ExtractedText,
        style: SummaryStyle,
    ) -> Result<(DetectedLanguage, SummaryStyle, String), SummarizeError> {
        let start = Instant::now();

        // ── Step 2: Detect language ──────────────────────────────────────
        let detected = detect::detect(text.as_str());
        let language = detected.resolve();
        info!("Detected language: {} (prompt: {})", detected, language.code());

        // ── Step 3: Compose prompt ───────────────────────────────────────
        let prompt = compose::compose(text.as_str(), language, style);
        debug!("Prompt: {} chars", prompt.as_str().chars().count());

        // ── Step 4: Call engine ──────────────────────────────────────────
        let raw = self.engine.summarize(&prompt).await?;
        debug!(
            "Engine {} answered in {:?}",
            self.engine.name(),
            start.elapsed()
        );

        // ── Step 5: Tidy output ──────────────────────────────────────────
        let summary = postprocess::tidy_summary(&raw);

        info!(
            "Summary ready: {} chars in {:?}",
            summary.chars().count(),
            start.elapsed()
        );
        Ok((detected, style, summary))
    }
}
