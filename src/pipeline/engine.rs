//! The summarisation engine boundary: one prompt in, one raw summary out.
//!
//! Everything behind [`SummaryEngine`] is treated as an opaque service.
//! Two adapters ship with the crate:
//!
//! * [`LlmEngine`]: any `edgequake-llm` provider (Gemini, OpenAI, Ollama, …).
//!   Retry, backoff and the per-call timeout live here, in the engine client,
//!   not in the pipeline.
//! * [`MockEngine`]: deterministic, offline; used when no credentials are
//!   configured and in tests.
//!
//! ## Retry Strategy
//!
//! Exponential backoff (`retry_backoff_ms * 2^attempt`): with 500 ms base and
//! 2 retries the wait sequence is 500 ms → 1 s.

use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::language::Language;
use crate::pipeline::compose::Prompt;
use crate::pipeline::prefix_chars;
use crate::prompts::{document_heading, emphasis_directive, instruction, language_directive};
use crate::style::SummaryStyle;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Failures of a single engine invocation.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The provider returned an error (network, quota, auth, bad request).
    #[error("{0}")]
    Failed(String),

    /// The call did not complete within the configured timeout.
    #[error("engine call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The provider answered with no text.
    #[error("engine returned an empty response")]
    EmptyResponse,
}

impl From<EngineError> for SummarizeError {
    fn from(e: EngineError) -> Self {
        SummarizeError::Engine {
            message: e.to_string(),
        }
    }
}

/// A text-in / text-out summarisation service.
#[async_trait]
pub trait SummaryEngine: Send + Sync {
    /// Short provider label, reported back in summary responses.
    fn name(&self) -> &str;

    /// Send one prompt, receive the raw (markdown-flavoured) summary.
    async fn summarize(&self, prompt: &Prompt) -> Result<String, EngineError>;
}

// ── LLM-backed engine ────────────────────────────────────────────────────

/// Engine backed by an `edgequake-llm` provider.
pub struct LlmEngine {
    label: String,
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
    max_retries: u32,
    retry_backoff_ms: u64,
    api_timeout_secs: u64,
}

impl LlmEngine {
    /// Wrap an already-constructed provider.
    pub fn new(
        label: impl Into<String>,
        provider: Arc<dyn LLMProvider>,
        config: &SummarizerConfig,
    ) -> Self {
        Self {
            label: label.into(),
            provider,
            options: build_options(config),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            api_timeout_secs: config.api_timeout_secs,
        }
    }

    /// Instantiate a named provider with the given model.
    ///
    /// The provider reads its API key (`GEMINI_API_KEY`, `OPENAI_API_KEY`, …)
    /// from the environment.
    pub fn from_provider_name(
        provider_name: &str,
        model: &str,
        config: &SummarizerConfig,
    ) -> Result<Self, SummarizeError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            SummarizeError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(provider_name, provider, config))
    }
}

#[async_trait]
impl SummaryEngine for LlmEngine {
    fn name(&self) -> &str {
        &self.label
    }

    async fn summarize(&self, prompt: &Prompt) -> Result<String, EngineError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt.as_str())];
        let limit = Duration::from_secs(self.api_timeout_secs);

        let mut last_err = EngineError::Failed("no attempt made".to_string());

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms * 2u64.pow(attempt - 1);
                warn!(
                    "Engine {}: retry {}/{} after {}ms",
                    self.label, attempt, self.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            match timeout(limit, self.provider.chat(&messages, Some(&self.options))).await {
                Ok(Ok(response)) if !response.content.trim().is_empty() => {
                    debug!(
                        "Engine {}: {} input tokens, {} output tokens, {:?}",
                        self.label,
                        response.prompt_tokens,
                        response.completion_tokens,
                        start.elapsed()
                    );
                    return Ok(response.content);
                }
                Ok(Ok(_)) => {
                    warn!("Engine {}: attempt {} returned no text", self.label, attempt + 1);
                    last_err = EngineError::EmptyResponse;
                }
                Ok(Err(e)) => {
                    warn!("Engine {}: attempt {} failed: {}", self.label, attempt + 1, e);
                    last_err = EngineError::Failed(e.to_string());
                }
                Err(_) => {
                    warn!(
                        "Engine {}: attempt {} timed out after {}s",
                        self.label,
                        attempt + 1,
                        self.api_timeout_secs
                    );
                    last_err = EngineError::Timeout {
                        secs: self.api_timeout_secs,
                    };
                }
            }
        }

        Err(last_err)
    }
}

/// Build `CompletionOptions` from the summarizer config.
fn build_options(config: &SummarizerConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

// ── Mock engine ──────────────────────────────────────────────────────────

/// Number of document characters quoted by the echoing mock.
const MOCK_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone)]
enum MockBehaviour {
    Echo,
    Fixed(String),
    Fail(String),
}

/// Deterministic offline engine.
///
/// By default it echoes an excerpt of the document embedded in the prompt,
/// labelled with the prompt's language and style. Tests can make it return a fixed
/// summary or fail with a given message. Every call is counted and the last
/// prompt is kept for inspection.
#[derive(Debug)]
pub struct MockEngine {
    behaviour: MockBehaviour,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::with_behaviour(MockBehaviour::Echo)
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with `summary`.
    pub fn fixed(summary: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::Fixed(summary.into()))
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::Fail(message.into()))
    }

    fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// How many prompts this engine has received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl SummaryEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize(&self, prompt: &Prompt) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_prompt
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(prompt.to_string());

        match &self.behaviour {
            MockBehaviour::Echo => Ok(echo_summary(prompt.as_str())),
            MockBehaviour::Fixed(summary) => Ok(summary.clone()),
            MockBehaviour::Fail(message) => Err(EngineError::Failed(message.clone())),
        }
    }
}

/// `[English (bullets)] <start of the document> ... (mock summary)`.
///
/// Language and style are recovered from the prompt itself; the standard
/// style carries no label.
fn echo_summary(prompt: &str) -> String {
    let language = if prompt.starts_with(language_directive(Language::Indonesian)) {
        Language::Indonesian
    } else {
        Language::English
    };
    let language_label = match language {
        Language::Indonesian => "Bahasa Indonesia",
        Language::English => "English",
    };
    // The document follows the first emphasis directive + heading pair; text
    // inside the document never moves that boundary.
    let marker = format!(
        "{}\n\n{}\n",
        emphasis_directive(language),
        document_heading(language)
    );
    let (header, document) = match prompt.find(&marker) {
        Some(idx) => (&prompt[..idx], &prompt[idx + marker.len()..]),
        None => (prompt, prompt),
    };

    let style_label = SummaryStyle::ALL
        .into_iter()
        .find(|style| header.contains(instruction(*style, language)))
        .filter(|style| *style != SummaryStyle::Standard)
        .map(|style| format!(" ({style})"))
        .unwrap_or_default();

    format!(
        "[{language_label}{style_label}] {} ... (mock summary)",
        prefix_chars(document, MOCK_EXCERPT_CHARS)
    )
}

/// Build the engine named by the configuration.
pub fn engine_from_config(config: &SummarizerConfig) -> Result<Arc<dyn SummaryEngine>, SummarizeError> {
    use crate::config::EngineSelection;

    match &config.engine {
        EngineSelection::Custom(engine) => Ok(Arc::clone(engine)),
        EngineSelection::Mock => Ok(Arc::new(MockEngine::new())),
        EngineSelection::Provider { name, model } => {
            Ok(Arc::new(LlmEngine::from_provider_name(name, model, config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::compose::compose;

    #[test]
    fn build_options_defaults() {
        let config = SummarizerConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, Some(2048));
    }

    #[tokio::test]
    async fn echo_mock_quotes_document() {
        let engine = MockEngine::new();
        let prompt = compose("Quarterly revenue grew.", Language::English, SummaryStyle::Standard);
        let summary = engine.summarize(&prompt).await.unwrap();
        assert_eq!(summary, "[English] Quarterly revenue grew. ... (mock summary)");
        assert_eq!(engine.calls(), 1);
        assert_eq!(engine.last_prompt().as_deref(), Some(prompt.as_str()));
    }

    #[tokio::test]
    async fn echo_mock_labels_indonesian() {
        let engine = MockEngine::new();
        let prompt = compose("Pendapatan naik.", Language::Indonesian, SummaryStyle::Bullets);
        let summary = engine.summarize(&prompt).await.unwrap();
        assert!(summary.starts_with("[Bahasa Indonesia (bullets)] Pendapatan naik."));
        assert!(summary.contains("Pendapatan naik."));
    }

    #[tokio::test]
    async fn echo_mock_is_deterministic() {
        let engine = MockEngine::new();
        let prompt = compose(&"word ".repeat(400), Language::English, SummaryStyle::Detailed);
        let a = engine.summarize(&prompt).await.unwrap();
        let b = engine.summarize(&prompt).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn echo_mock_excerpt_starts_at_document_start() {
        let engine = MockEngine::new();
        let text = "Intro line.\nDocument:\nQuoted heading inside the text.";
        let prompt = compose(text, Language::English, SummaryStyle::Standard);
        let summary = engine.summarize(&prompt).await.unwrap();
        assert_eq!(
            summary,
            "[English] Intro line.\nDocument:\nQuoted heading inside the text. ... (mock summary)"
        );
    }

    #[tokio::test]
    async fn echo_mock_style_ignores_document_text() {
        let engine = MockEngine::new();
        let quoted = instruction(SummaryStyle::Bullets, Language::English);
        let prompt = compose(quoted, Language::English, SummaryStyle::Detailed);
        let summary = engine.summarize(&prompt).await.unwrap();
        assert!(summary.starts_with("[English (detailed)] "), "got {summary}");
    }

    #[tokio::test]
    async fn failing_mock_converts_to_engine_error() {
        let engine = MockEngine::failing("quota exceeded");
        let prompt = compose("x", Language::English, SummaryStyle::Standard);
        let err: SummarizeError = engine.summarize(&prompt).await.unwrap_err().into();
        match err {
            SummarizeError::Engine { message } => assert_eq!(message, "quota exceeded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mock_selection_builds_mock_engine() {
        let engine = engine_from_config(&SummarizerConfig::default()).unwrap();
        assert_eq!(engine.name(), "mock");
    }

    #[test]
    fn custom_selection_is_used_as_is() {
        let custom: Arc<dyn SummaryEngine> = Arc::new(MockEngine::fixed("done"));
        let config = SummarizerConfig::builder()
            .custom_engine(Arc::clone(&custom))
            .build()
            .unwrap();
        let engine = engine_from_config(&config).unwrap();
        assert!(Arc::ptr_eq(&engine, &custom));
    }
}
