//! Language codes.
//!
//! Two notions of "language" flow through the pipeline:
//!
//! * [`DetectedLanguage`]: whatever two-letter code the detector reported
//!   (`"fr"`, `"de"`, …). It is returned to callers verbatim.
//! * [`Language`]: the instruction set the prompt is written in. Only
//!   Indonesian and English exist; every other detected code resolves to
//!   English.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Code reported when detection fails.
pub const FALLBACK_CODE: &str = "en";

/// A language the prompt composer has native instructions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
        }
    }
}

/// The code reported by the language detector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedLanguage(String);

impl DetectedLanguage {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The detector-fallback value, `en`.
    pub fn fallback() -> Self {
        Self(FALLBACK_CODE.to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Map the reported code onto an instruction set: `id` is Indonesian,
    /// everything else is English.
    pub fn resolve(&self) -> Language {
        if self.0 == "id" {
            Language::Indonesian
        } else {
            Language::English
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_resolves_to_indonesian() {
        assert_eq!(DetectedLanguage::new("id").resolve(), Language::Indonesian);
    }

    #[test]
    fn other_codes_resolve_to_english() {
        for code in ["en", "fr", "de", "ms", ""] {
            assert_eq!(DetectedLanguage::new(code).resolve(), Language::English, "{code}");
        }
    }

    #[test]
    fn reported_code_is_preserved() {
        let lang = DetectedLanguage::new("fr");
        assert_eq!(lang.code(), "fr");
        assert_eq!(serde_json::to_string(&lang).unwrap(), "\"fr\"");
    }
}
