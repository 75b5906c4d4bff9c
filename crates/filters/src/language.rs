//! Language identification for cleaned comment text
//!
//! Wraps whatlang with a length and word-count guard. Short snippets are
//! tagged `unknown`, detector failures are tagged `error`, and everything
//! else gets a language code. The detector is built once from explicit
//! configuration, so identical input always yields an identical tag.

use crate::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;
use whatlang::{Detector, Lang};

/// Minimum trimmed length for language detection (chars)
const MIN_DETECTION_CHARS: usize = 5;

/// Minimum whitespace-separated words for language detection
const MIN_DETECTION_WORDS: usize = 2;

/// Language identifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageIdentifierConfig {
    /// Texts shorter than this (chars, after trimming) are `unknown`
    pub min_chars: usize,
    /// Texts with fewer words than this are `unknown`
    pub min_words: usize,
    /// Restrict detection to these languages (ISO 639-1 or 639-3 codes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
}

impl Default for LanguageIdentifierConfig {
    fn default() -> Self {
        Self {
            min_chars: MIN_DETECTION_CHARS,
            min_words: MIN_DETECTION_WORDS,
            allowlist: None,
        }
    }
}

/// Result of language identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    /// Too little text to judge
    Unknown,
    /// The detector failed on this text
    Error,
    /// Detected language code
    Code(&'static str),
}

impl LanguageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::Unknown => "unknown",
            LanguageTag::Error => "error",
            LanguageTag::Code(code) => code,
        }
    }

    /// True for `unknown` and `error`
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, LanguageTag::Code(_))
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Guarded language identifier
pub struct LanguageIdentifier {
    detector: Detector,
    min_chars: usize,
    min_words: usize,
}

impl LanguageIdentifier {
    /// Create a new identifier from configuration
    pub fn new(config: LanguageIdentifierConfig) -> Result<Self> {
        let detector = match config.allowlist {
            Some(ref codes) => {
                let langs = codes
                    .iter()
                    .map(|code| parse_language_code(code))
                    .collect::<Result<Vec<_>>>()?;

                if langs.is_empty() {
                    return Err(Error::InvalidConfig(
                        "Language allowlist must not be empty".to_string(),
                    ));
                }
                Detector::with_allowlist(langs)
            }
            None => Detector::new(),
        };

        Ok(Self {
            detector,
            min_chars: config.min_chars,
            min_words: config.min_words,
        })
    }

    /// Identify the language of a text snippet
    pub fn identify(&self, text: Option<&str>) -> LanguageTag {
        let Some(text) = text else {
            return LanguageTag::Unknown;
        };

        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_chars
            || trimmed.split_whitespace().count() < self.min_words
        {
            return LanguageTag::Unknown;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.detector.detect_lang(trimmed))) {
            Ok(Some(lang)) => LanguageTag::Code(language_code(lang)),
            Ok(None) => {
                debug!("Language detection gave no result for {:?}", trimmed);
                LanguageTag::Error
            }
            Err(_) => {
                debug!("Language detector panicked on {:?}", trimmed);
                LanguageTag::Error
            }
        }
    }
}

/// Output code for a detected language: ISO 639-1 where one exists
pub fn language_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Afr => "af",
        Lang::Aka => "ak",
        Lang::Amh => "am",
        Lang::Ara => "ar",
        Lang::Aze => "az",
        Lang::Bel => "be",
        Lang::Ben => "bn",
        Lang::Bul => "bg",
        Lang::Cat => "ca",
        Lang::Ces => "cs",
        Lang::Cmn => "zh",
        Lang::Dan => "da",
        Lang::Deu => "de",
        Lang::Ell => "el",
        Lang::Eng => "en",
        Lang::Epo => "eo",
        Lang::Est => "et",
        Lang::Fin => "fi",
        Lang::Fra => "fr",
        Lang::Guj => "gu",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Hrv => "hr",
        Lang::Hun => "hu",
        Lang::Hye => "hy",
        Lang::Ind => "id",
        Lang::Ita => "it",
        Lang::Jav => "jv",
        Lang::Jpn => "ja",
        Lang::Kan => "kn",
        Lang::Kat => "ka",
        Lang::Khm => "km",
        Lang::Kor => "ko",
        Lang::Lat => "la",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Mal => "ml",
        Lang::Mar => "mr",
        Lang::Mkd => "mk",
        Lang::Mya => "my",
        Lang::Nep => "ne",
        Lang::Nld => "nl",
        Lang::Nob => "no",
        Lang::Ori => "or",
        Lang::Pan => "pa",
        Lang::Pes => "fa",
        Lang::Pol => "pl",
        Lang::Por => "pt",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Sin => "si",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Sna => "sn",
        Lang::Spa => "es",
        Lang::Srp => "sr",
        Lang::Swe => "sv",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Tgl => "tl",
        Lang::Tha => "th",
        Lang::Tuk => "tk",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Urd => "ur",
        Lang::Uzb => "uz",
        Lang::Vie => "vi",
        Lang::Yid => "yi",
        Lang::Zul => "zu",
        #[allow(unreachable_patterns)]
        _ => lang.code(),
    }
}

/// Parse a language code (ISO 639-1 or ISO 639-3)
pub fn parse_language_code(code: &str) -> Result<Lang> {
    let code = code.trim().to_lowercase();

    if let Some(lang) = Lang::from_code(&code) {
        return Ok(lang);
    }

    Lang::all()
        .iter()
        .copied()
        .find(|lang| language_code(*lang) == code)
        .ok_or(Error::UnsupportedLanguage(code))
}

/// Statistics about identified languages
#[derive(Debug, Clone, Default, Serialize)]
pub struct LanguageStats {
    pub total: usize,
    pub unknown: usize,
    pub errors: usize,
    pub distribution: HashMap<&'static str, usize>,
}

impl LanguageStats {
    /// Count one identification result
    pub fn record(&mut self, tag: LanguageTag) {
        self.total += 1;
        match tag {
            LanguageTag::Unknown => self.unknown += 1,
            LanguageTag::Error => self.errors += 1,
            LanguageTag::Code(code) => *self.distribution.entry(code).or_insert(0) += 1,
        }
    }

    /// Number of texts tagged with `code`
    pub fn count(&self, code: &str) -> usize {
        self.distribution.get(code).copied().unwrap_or(0)
    }

    /// Share of texts tagged with `code`
    pub fn rate(&self, code: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(code) as f64 / self.total as f64
    }

    /// Share of texts too short to judge
    pub fn unknown_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.unknown as f64 / self.total as f64
    }

    /// Languages sorted by descending count, ties by code
    pub fn top_languages(&self) -> Vec<(&'static str, usize)> {
        let mut languages: Vec<_> = self.distribution.iter().map(|(c, n)| (*c, *n)).collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        languages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier() -> LanguageIdentifier {
        LanguageIdentifier::new(LanguageIdentifierConfig::default()).unwrap()
    }

    #[test]
    fn test_short_text_is_unknown() {
        let identifier = identifier();
        assert_eq!(identifier.identify(Some("ok")), LanguageTag::Unknown);
        assert_eq!(identifier.identify(Some("")), LanguageTag::Unknown);
        assert_eq!(identifier.identify(None), LanguageTag::Unknown);
    }

    #[test]
    fn test_single_long_word_is_unknown() {
        let identifier = identifier();
        assert_eq!(
            identifier.identify(Some("extraordinarily")),
            LanguageTag::Unknown
        );
    }

    #[test]
    fn test_two_short_words_below_char_guard() {
        let identifier = identifier();
        assert_eq!(identifier.identify(Some("a b")), LanguageTag::Unknown);
    }

    #[test]
    fn test_english_detection() {
        let identifier = identifier();
        assert_eq!(
            identifier.identify(Some("this is clearly english text")),
            LanguageTag::Code("en")
        );
    }

    #[test]
    fn test_spanish_detection() {
        let identifier = identifier();
        let tag = identifier
            .identify(Some("este es un texto en español que debería ser detectado correctamente"));
        assert_eq!(tag, LanguageTag::Code("es"));
    }

    #[test]
    fn test_no_letters_is_error() {
        let identifier = identifier();
        assert_eq!(identifier.identify(Some("12345 67890")), LanguageTag::Error);
    }

    #[test]
    fn test_deterministic() {
        let identifier = identifier();
        let text = "the new update broke my brushes again";
        let first = identifier.identify(Some(text));
        for _ in 0..10 {
            assert_eq!(identifier.identify(Some(text)), first);
        }

        let other = LanguageIdentifier::new(LanguageIdentifierConfig::default()).unwrap();
        assert_eq!(other.identify(Some(text)), first);
    }

    #[test]
    fn test_allowlist() {
        let identifier = LanguageIdentifier::new(LanguageIdentifierConfig {
            allowlist: Some(vec!["en".to_string(), "fra".to_string()]),
            ..Default::default()
        })
        .unwrap();

        let tag = identifier.identify(Some("this is clearly english text"));
        assert_eq!(tag, LanguageTag::Code("en"));
    }

    #[test]
    fn test_invalid_allowlist() {
        let result = LanguageIdentifier::new(LanguageIdentifierConfig {
            allowlist: Some(vec!["klingon".to_string()]),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::UnsupportedLanguage(_))));

        let result = LanguageIdentifier::new(LanguageIdentifierConfig {
            allowlist: Some(Vec::new()),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_language_code_parsing() {
        assert_eq!(parse_language_code("eng").unwrap(), Lang::Eng);
        assert_eq!(parse_language_code("en").unwrap(), Lang::Eng);
        assert_eq!(parse_language_code("ES").unwrap(), Lang::Spa);
        assert_eq!(parse_language_code("zh").unwrap(), Lang::Cmn);
        assert!(parse_language_code("invalid").is_err());
    }

    #[test]
    fn test_armenian_uses_two_letter_code() {
        assert_eq!(language_code(Lang::Hye), "hy");
        assert_eq!(parse_language_code("hy").unwrap(), Lang::Hye);
        assert_eq!(parse_language_code("hye").unwrap(), Lang::Hye);
    }

    #[test]
    fn test_tag_serialization() {
        assert_eq!(serde_json::to_string(&LanguageTag::Unknown).unwrap(), "\"unknown\"");
        assert_eq!(serde_json::to_string(&LanguageTag::Error).unwrap(), "\"error\"");
        assert_eq!(serde_json::to_string(&LanguageTag::Code("en")).unwrap(), "\"en\"");
        assert!(LanguageTag::Unknown.is_sentinel());
        assert!(LanguageTag::Error.is_sentinel());
        assert!(!LanguageTag::Code("en").is_sentinel());
    }

    #[test]
    fn test_language_stats() {
        let identifier = identifier();
        let texts = [
            "this is clearly english text",
            "the quick brown fox jumps over the lazy dog",
            "ok",
            "12345 67890",
        ];

        let mut stats = LanguageStats::default();
        for text in texts {
            stats.record(identifier.identify(Some(text)));
        }
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count("en"), 2);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.rate("en"), 0.5);
        assert_eq!(stats.top_languages()[0], ("en", 2));
    }
}
