//! Instruction texts for the summarisation engine.
//!
//! Every word the engine is told lives here, so prompt regressions can be
//! caught by unit tests without calling a model. The table is a total
//! function over [`SummaryStyle`] × [`Language`]: adding a style or a
//! language without writing its instructions is a compile error.

use crate::language::Language;
use crate::style::SummaryStyle;

/// Formatting instructions for one style in one language.
pub fn instruction(style: SummaryStyle, language: Language) -> &'static str {
    match (style, language) {
        (SummaryStyle::Standard, Language::Indonesian) => {
            "Ringkasan harus jelas, singkat, dan terstruktur dalam paragraf-paragraf.\n\
Sorot ide-ide kunci dan jelaskan poin-poin penting."
        }
        (SummaryStyle::Standard, Language::English) => {
            "The summary should be clear, concise, and well-structured in paragraphs.\n\
Highlight key ideas and explain important points."
        }
        (SummaryStyle::Executive, Language::Indonesian) => {
            "Buatkan ringkasan eksekutif yang fokus pada:\n\
- Apa masalahnya?\n\
- Solusi/rekomendasi utama\n\
- Impact atau hasil yang diharapkan\n\
\n\
Gunakan bahasa yang ringkas dan actionable, cocok untuk decision makers."
        }
        (SummaryStyle::Executive, Language::English) => {
            "Create an executive summary focusing on:\n\
- What is the main issue?\n\
- Key solutions/recommendations\n\
- Expected impact or results\n\
\n\
Use concise, actionable language suitable for decision makers."
        }
        (SummaryStyle::Bullets, Language::Indonesian) => {
            "Format ringkasan sebagai poin-poin (bullet points) yang mudah dicerna:\n\
- Setiap poin maksimal 1-2 baris\n\
- Gunakan bullet (•) atau nomor untuk setiap poin\n\
- Kelompokkan poin-poin yang related dengan subheading jika perlu"
        }
        (SummaryStyle::Bullets, Language::English) => {
            "Write the summary in bullet point format that is easy to digest:\n\
- Each point should be 1-2 lines maximum\n\
- Use bullets (•) or numbers for each point\n\
- Group related points with subheadings if needed"
        }
        (SummaryStyle::Detailed, Language::Indonesian) => {
            "Buatkan ringkasan detail yang mencakup:\n\
- Latar belakang/konteks\n\
- Poin-poin utama dengan penjelasan mendalam\n\
- Nuansa dan detail penting\n\
- Kesimpulan dan implikasi\n\
\n\
Bisa lebih panjang untuk menangkap informasi yang lebih komprehensif."
        }
        (SummaryStyle::Detailed, Language::English) => {
            "Create a detailed summary that includes:\n\
- Background/context\n\
- Main points with deep explanation\n\
- Important nuances and details\n\
- Conclusions and implications\n\
\n\
Can be longer to capture more comprehensive information."
        }
    }
}

/// Opening directive: summarise, and in which language.
pub fn language_directive(language: Language) -> &'static str {
    match language {
        Language::Indonesian => "Buatkan ringkasan dari dokumen berikut dalam bahasa Indonesia.",
        Language::English => "Please summarize the following document in English.",
    }
}

/// Heading placed above the style instructions.
pub fn instructions_heading(language: Language) -> &'static str {
    match language {
        Language::Indonesian => "Instruksi format:",
        Language::English => "Format instructions:",
    }
}

/// Request for `**bold**` markup on key terms so the summary can be scanned.
pub fn emphasis_directive(language: Language) -> &'static str {
    match language {
        Language::Indonesian => {
            "Gunakan format markdown **tebal** untuk istilah kunci dan konsep penting \
agar ringkasan mudah dipindai."
        }
        Language::English => {
            "Use **bold** markdown formatting on key terms and important concepts \
so the summary is easy to scan."
        }
    }
}

/// Heading placed directly above the embedded document text.
pub fn document_heading(language: Language) -> &'static str {
    match language {
        Language::Indonesian => "Dokumen:",
        Language::English => "Document:",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANGS: [Language; 2] = [Language::Indonesian, Language::English];

    #[test]
    fn every_pair_has_instructions() {
        for style in SummaryStyle::ALL {
            for lang in LANGS {
                assert!(!instruction(style, lang).trim().is_empty(), "{style}/{lang:?}");
            }
        }
    }

    #[test]
    fn instructions_are_distinct_per_style() {
        for lang in LANGS {
            let mut seen = std::collections::HashSet::new();
            for style in SummaryStyle::ALL {
                assert!(seen.insert(instruction(style, lang)), "{style}/{lang:?}");
            }
        }
    }

    #[test]
    fn english_bullets_mentions_bullet_point_format() {
        assert!(instruction(SummaryStyle::Bullets, Language::English).contains("bullet point format"));
    }

    #[test]
    fn emphasis_directive_mentions_bold_markup() {
        for lang in LANGS {
            assert!(emphasis_directive(lang).contains("**"));
        }
    }
}
