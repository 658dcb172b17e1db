//! Language detection over a bounded sample of the extracted text.
//!
//! whatlang's trigram model carries no random state, so the same sample
//! always produces the same answer. Any failure (empty sample, no letters,
//! a language we have no two-letter code for) yields `en`; detection never
//! aborts the pipeline.

use crate::language::DetectedLanguage;
use crate::pipeline::prefix_chars;
use tracing::debug;

/// Number of leading characters inspected by the detector.
pub const DETECTION_SAMPLE_CHARS: usize = 1000;

/// Detect the dominant language of `text`.
pub fn detect(text: &str) -> DetectedLanguage {
    let sample = prefix_chars(text, DETECTION_SAMPLE_CHARS);

    let Some(info) = whatlang::detect(sample) else {
        debug!("Language detection failed; defaulting to en");
        return DetectedLanguage::fallback();
    };

    match iso639_1(info.lang().code()) {
        Some(code) => {
            debug!(
                "Detected language {} (confidence {:.2})",
                code,
                info.confidence()
            );
            DetectedLanguage::new(code)
        }
        None => {
            debug!("No two-letter code for {}; defaulting to en", info.lang().code());
            DetectedLanguage::fallback()
        }
    }
}

/// Map whatlang's ISO 639-3 codes to ISO 639-1.
fn iso639_1(code: &str) -> Option<&'static str> {
    let two = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(two)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    const ENGLISH: &str = "The quarterly report shows that revenue grew steadily across all \
regions, while operating costs remained under control thanks to the new procurement policy.";

    const INDONESIAN: &str = "Laporan ini menjelaskan bahwa pendapatan perusahaan meningkat \
secara signifikan pada tahun ini karena strategi pemasaran yang baru dan efisiensi operasional.";

    #[test]
    fn detects_english() {
        assert_eq!(detect(ENGLISH).code(), "en");
    }

    #[test]
    fn detects_indonesian() {
        let lang = detect(INDONESIAN);
        assert_eq!(lang.code(), "id");
        assert_eq!(lang.resolve(), Language::Indonesian);
    }

    #[test]
    fn detection_is_deterministic() {
        for text in [ENGLISH, INDONESIAN, "Ceci est un exemple de texte français"] {
            assert_eq!(detect(text), detect(text));
        }
    }

    #[test]
    fn failure_defaults_to_english() {
        assert_eq!(detect("").code(), "en");
        assert_eq!(detect("12345 ... 67890 !!!").code(), "en");
    }

    #[test]
    fn only_the_sample_is_inspected() {
        let text = format!("{}{}", ENGLISH.repeat(10), INDONESIAN.repeat(50));
        assert!(text.chars().count() > DETECTION_SAMPLE_CHARS * 2);
        assert_eq!(detect(&text).code(), "en");
    }

    #[test]
    fn unmapped_codes_are_none() {
        assert_eq!(iso639_1("xxx"), None);
        assert_eq!(iso639_1("ind"), Some("id"));
    }
}
