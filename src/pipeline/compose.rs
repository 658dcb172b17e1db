//! Prompt composition: (text, language, style) → the exact engine instruction.
//!
//! Pure and deterministic. The prompt is assembled from four parts in a
//! fixed order:
//!
//! 1. language directive
//! 2. style-specific formatting instructions
//! 3. request for bold markup on key terms
//! 4. the document text, cut to [`PROMPT_TEXT_CHARS`] characters
//!
//! The document text is always the final part, with nothing after it.

use crate::language::Language;
use crate::pipeline::prefix_chars;
use crate::prompts::{
    document_heading, emphasis_directive, instruction, instructions_heading, language_directive,
};
use crate::style::SummaryStyle;
use std::fmt;

/// Hard cap on document characters embedded in a prompt.
pub const PROMPT_TEXT_CHARS: usize = 5000;

/// A fully composed engine instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the prompt for `text` in `language` using `style`.
pub fn compose(text: &str, language: Language, style: SummaryStyle) -> Prompt {
    let document = prefix_chars(text, PROMPT_TEXT_CHARS);

    let prompt = format!(
        "{directive}\n\n{heading}\n{instructions}\n\n{emphasis}\n\n{doc_heading}\n{document}",
        directive = language_directive(language),
        heading = instructions_heading(language),
        instructions = instruction(style, language),
        emphasis = emphasis_directive(language),
        doc_heading = document_heading(language),
    );

    Prompt(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::DetectedLanguage;

    const SAMPLE: &str = "Hello world. This is a test document about AI.";

    #[test]
    fn bullets_english_scenario() {
        let prompt = compose(SAMPLE, Language::English, SummaryStyle::Bullets);
        assert!(prompt.as_str().contains("bullet point format"));
        assert!(prompt.as_str().ends_with(SAMPLE));
    }

    #[test]
    fn parts_appear_in_order() {
        let prompt = compose(SAMPLE, Language::English, SummaryStyle::Executive);
        let s = prompt.as_str();
        let directive = s.find(language_directive(Language::English)).unwrap();
        let style = s.find(instruction(SummaryStyle::Executive, Language::English)).unwrap();
        let bold = s.find(emphasis_directive(Language::English)).unwrap();
        let doc = s.rfind(SAMPLE).unwrap();
        assert!(directive < style && style < bold && bold < doc);
    }

    #[test]
    fn unknown_style_uses_standard_indonesian_block() {
        let style = SummaryStyle::from_param("urgent");
        let lang = DetectedLanguage::new("id").resolve();
        let prompt = compose(SAMPLE, lang, style);
        assert_eq!(prompt, compose(SAMPLE, Language::Indonesian, SummaryStyle::Standard));
        assert!(prompt
            .as_str()
            .contains(instruction(SummaryStyle::Standard, Language::Indonesian)));
        assert!(prompt.as_str().starts_with(language_directive(Language::Indonesian)));
    }

    #[test]
    fn other_detected_languages_get_english_prompt() {
        let lang = DetectedLanguage::new("fr").resolve();
        let prompt = compose(SAMPLE, lang, SummaryStyle::Standard);
        assert!(prompt.as_str().starts_with(language_directive(Language::English)));
    }

    #[test]
    fn text_is_cut_at_five_thousand_chars() {
        let text: String = "é".repeat(PROMPT_TEXT_CHARS + 250);
        let prompt = compose(&text, Language::English, SummaryStyle::Standard);
        let expected: String = text.chars().take(PROMPT_TEXT_CHARS).collect();
        assert!(prompt.as_str().ends_with(&format!("\n{expected}")));
        let heading_end = prompt.as_str().rfind("Document:\n").unwrap() + "Document:\n".len();
        assert_eq!(&prompt.as_str()[heading_end..], expected);
    }

    #[test]
    fn short_text_is_embedded_whole() {
        let prompt = compose(SAMPLE, Language::English, SummaryStyle::Detailed);
        let heading_end = prompt.as_str().rfind("Document:\n").unwrap() + "Document:\n".len();
        assert_eq!(&prompt.as_str()[heading_end..], SAMPLE);
    }

    #[test]
    fn composition_is_pure() {
        for style in SummaryStyle::ALL {
            for lang in [Language::English, Language::Indonesian] {
                assert_eq!(compose(SAMPLE, lang, style), compose(SAMPLE, lang, style));
            }
        }
    }
}
