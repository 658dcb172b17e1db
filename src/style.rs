//! Summary styles.
//!
//! The style arrives as a free-form request parameter. Only the four exact
//! lowercase tags select a style; anything else becomes
//! [`SummaryStyle::Standard`] instead of an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named summary formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// Clear, concise paragraphs. (default)
    #[default]
    Standard,
    /// Problem / recommendation / impact, for decision makers.
    Executive,
    /// Short bullet points.
    Bullets,
    /// Longer summary with background, nuances and implications.
    Detailed,
}

impl SummaryStyle {
    /// Every style, in the order they are presented to users.
    pub const ALL: [SummaryStyle; 4] = [
        SummaryStyle::Standard,
        SummaryStyle::Executive,
        SummaryStyle::Bullets,
        SummaryStyle::Detailed,
    ];

    /// Parse a request parameter, falling back to `Standard` for anything
    /// that is not exactly one of the four tags.
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "standard" => SummaryStyle::Standard,
            "executive" => SummaryStyle::Executive,
            "bullets" => SummaryStyle::Bullets,
            "detailed" => SummaryStyle::Detailed,
            _ => SummaryStyle::Standard,
        }
    }

    /// The wire tag for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Standard => "standard",
            SummaryStyle::Executive => "executive",
            SummaryStyle::Bullets => "bullets",
            SummaryStyle::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse() {
        for style in SummaryStyle::ALL {
            assert_eq!(SummaryStyle::from_param(style.as_str()), style);
        }
    }

    #[test]
    fn unknown_tags_fall_back_to_standard() {
        assert_eq!(SummaryStyle::from_param("urgent"), SummaryStyle::Standard);
        assert_eq!(SummaryStyle::from_param(""), SummaryStyle::Standard);
        assert_eq!(SummaryStyle::from_param("bullet"), SummaryStyle::Standard);
    }

    #[test]
    fn tags_must_match_exactly() {
        assert_eq!(SummaryStyle::from_param("Bullets"), SummaryStyle::Standard);
        assert_eq!(SummaryStyle::from_param("EXECUTIVE"), SummaryStyle::Standard);
        assert_eq!(SummaryStyle::from_param(" standard"), SummaryStyle::Standard);
        assert_eq!(SummaryStyle::from_param("  bullets "), SummaryStyle::Standard);
    }

    #[test]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&SummaryStyle::Detailed).unwrap();
        assert_eq!(json, "\"detailed\"");
    }
}
