//! Configuration types for PDF summarisation.
//!
//! All process-wide behaviour is controlled through [`SummarizerConfig`],
//! built via its [`SummarizerConfigBuilder`] or [`SummarizerConfig::from_env`].
//! The configuration is built once at startup, handed to
//! [`crate::summarize::Summarizer::new`], and never mutated afterwards.
//!
//! # Engine selection
//! Which summarisation engine runs is an explicit [`EngineSelection`] value,
//! not a global decided by whichever API key happens to be exported. `from_env`
//! performs the environment probe exactly once and records the decision in the
//! returned config.

use crate::error::SummarizeError;
use crate::pipeline::engine::SummaryEngine;
use std::fmt;
use std::sync::Arc;

/// Default model used when the `gemini` provider is auto-selected.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Which summarisation engine the pipeline talks to.
#[derive(Clone, Default)]
pub enum EngineSelection {
    /// Deterministic offline engine. Used when no provider credentials exist.
    #[default]
    Mock,
    /// A named `edgequake-llm` provider (e.g. `"gemini"`, `"openai"`, `"ollama"`)
    /// with an explicit model identifier.
    Provider { name: String, model: String },
    /// A pre-constructed engine. Takes precedence over everything else.
    Custom(Arc<dyn SummaryEngine>),
}

impl EngineSelection {
    /// Short label reported back to callers in summary responses.
    pub fn label(&self) -> String {
        match self {
            EngineSelection::Mock => "mock".to_string(),
            EngineSelection::Provider { name, .. } => name.clone(),
            EngineSelection::Custom(engine) => engine.name().to_string(),
        }
    }
}

impl fmt::Debug for EngineSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineSelection::Mock => f.write_str("Mock"),
            EngineSelection::Provider { name, model } => f
                .debug_struct("Provider")
                .field("name", name)
                .field("model", model)
                .finish(),
            EngineSelection::Custom(engine) => {
                write!(f, "Custom(<dyn SummaryEngine: {}>)", engine.name())
            }
        }
    }
}

/// Configuration for the summarisation pipeline.
///
/// # Example
/// ```rust
/// use pdf_summarizer::{EngineSelection, SummarizerConfig};
///
/// let config = SummarizerConfig::builder()
///     .engine(EngineSelection::Provider {
///         name: "gemini".into(),
///         model: "gemini-2.5-flash".into(),
///     })
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Engine the pipeline sends prompts to. Default: [`EngineSelection::Mock`].
    pub engine: EngineSelection,

    /// Sampling temperature for provider-backed engines. Default: 0.3.
    ///
    /// Summaries benefit from a little freedom in phrasing, but the model
    /// should stay close to the document; values above 1.0 start inventing.
    pub temperature: f32,

    /// Maximum tokens the engine may generate. Default: 2048.
    pub max_tokens: usize,

    /// Retries on a failed engine call, performed inside the engine adapter.
    /// Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-call engine timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            engine: EngineSelection::default(),
            temperature: 0.3,
            max_tokens: 2048,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
            password: None,
            download_timeout_secs: 120,
        }
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a configuration by probing the environment once.
    ///
    /// Resolution order:
    /// 1. `PDFSUM_PROVIDER` (+ optional `PDFSUM_MODEL`): explicit choice.
    /// 2. `GEMINI_API_KEY` set and non-empty: `gemini` / [`DEFAULT_GEMINI_MODEL`].
    /// 3. Otherwise the mock engine.
    pub fn from_env() -> Self {
        let engine = engine_from_vars(
            std::env::var("PDFSUM_PROVIDER").ok(),
            std::env::var("PDFSUM_MODEL").ok(),
            std::env::var("GEMINI_API_KEY").ok(),
        );
        Self {
            engine,
            ..Self::default()
        }
    }
}

/// Pure part of [`SummarizerConfig::from_env`], split out for testing.
fn engine_from_vars(
    provider: Option<String>,
    model: Option<String>,
    gemini_key: Option<String>,
) -> EngineSelection {
    let model = model.filter(|m| !m.trim().is_empty());

    if let Some(name) = provider.filter(|p| !p.trim().is_empty()) {
        let name = name.trim().to_lowercase();
        if name == "mock" {
            return EngineSelection::Mock;
        }
        let model = model.unwrap_or_else(|| default_model_for(&name).to_string());
        return EngineSelection::Provider { name, model };
    }

    if gemini_key.is_some_and(|k| !k.trim().is_empty()) {
        return EngineSelection::Provider {
            name: "gemini".to_string(),
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        };
    }

    EngineSelection::Mock
}

/// Sensible default model for a named provider.
pub fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "openai" => "gpt-4.1-nano",
        "anthropic" => "claude-3-5-haiku-latest",
        "ollama" => "llama3.2",
        _ => DEFAULT_GEMINI_MODEL,
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug)]
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl SummarizerConfigBuilder {
    pub fn engine(mut self, engine: EngineSelection) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn custom_engine(mut self, engine: Arc<dyn SummaryEngine>) -> Self {
        self.config.engine = EngineSelection::Custom(engine);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummarizeError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(SummarizeError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(SummarizeError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if let EngineSelection::Provider { name, model } = &c.engine {
            if name.trim().is_empty() || model.trim().is_empty() {
                return Err(SummarizeError::InvalidConfig(
                    "provider name and model must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SummarizerConfig::default();
        assert!(matches!(c.engine, EngineSelection::Mock));
        assert_eq!(c.max_retries, 2);
        assert_eq!(c.api_timeout_secs, 60);
    }

    #[test]
    fn no_credentials_selects_mock() {
        assert!(matches!(engine_from_vars(None, None, None), EngineSelection::Mock));
        assert!(matches!(
            engine_from_vars(None, None, Some("  ".into())),
            EngineSelection::Mock
        ));
    }

    #[test]
    fn gemini_key_selects_gemini() {
        match engine_from_vars(None, None, Some("key".into())) {
            EngineSelection::Provider { name, model } => {
                assert_eq!(name, "gemini");
                assert_eq!(model, DEFAULT_GEMINI_MODEL);
            }
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    #[test]
    fn explicit_provider_wins_over_gemini_key() {
        match engine_from_vars(Some("OpenAI".into()), None, Some("key".into())) {
            EngineSelection::Provider { name, model } => {
                assert_eq!(name, "openai");
                assert_eq!(model, "gpt-4.1-nano");
            }
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    #[test]
    fn explicit_mock_provider() {
        assert!(matches!(
            engine_from_vars(Some("mock".into()), None, Some("key".into())),
            EngineSelection::Mock
        ));
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = SummarizerConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = SummarizerConfig::builder()
            .engine(EngineSelection::Provider {
                name: "gemini".into(),
                model: " ".into(),
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidConfig(_)));
    }

    #[test]
    fn label_names_engine() {
        assert_eq!(EngineSelection::Mock.label(), "mock");
        let p = EngineSelection::Provider {
            name: "gemini".into(),
            model: "m".into(),
        };
        assert_eq!(p.label(), "gemini");
    }
}
