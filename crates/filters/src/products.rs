//! Product vocabulary matching
//!
//! Case-insensitive whole-word matching over a fixed, ordered list of
//! product names. Used in two modes: masking mentions in canonical text and
//! extracting which products a raw comment names.

use crate::text_preprocessing::PRODUCT_TOKEN;
use crate::{Error, Result};
use regex::{NoExpand, Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

/// Product names matched when no vocabulary is configured
pub const DEFAULT_PRODUCTS: [&str; 12] = [
    "photoshop",
    "lightroom",
    "premiere",
    "illustrator",
    "firefly",
    "after effects",
    "indesign",
    "audition",
    "xd",
    "acrobat",
    "animate",
    "bridge",
];

/// Product vocabulary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVocabularyConfig {
    /// Ordered product phrases; order decides masking precedence
    pub phrases: Vec<String>,
}

impl Default for ProductVocabularyConfig {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Compiled product vocabulary
///
/// Built once and shared read-only across records.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    phrases: Vec<String>,
    patterns: Vec<Regex>,
    set: RegexSet,
}

impl ProductMatcher {
    /// Compile a matcher from configuration
    ///
    /// Fails on an empty vocabulary, an empty phrase or a duplicate phrase.
    pub fn new(config: ProductVocabularyConfig) -> Result<Self> {
        if config.phrases.is_empty() {
            return Err(Error::InvalidConfig(
                "At least one product phrase must be specified".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut phrases = Vec::with_capacity(config.phrases.len());

        for (index, raw) in config.phrases.iter().enumerate() {
            let phrase = raw.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "Product phrase #{} is empty",
                    index + 1
                )));
            }
            if !seen.insert(phrase.clone()) {
                return Err(Error::InvalidConfig(format!(
                    "Duplicate product phrase: {}",
                    phrase
                )));
            }
            phrases.push(phrase);
        }

        let sources: Vec<String> = phrases
            .iter()
            .map(|phrase| format!(r"(?i)\b{}\b", regex::escape(phrase)))
            .collect();

        let patterns = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidConfig(format!("Invalid product pattern: {}", e)))?;

        let set = RegexSet::new(&sources)
            .map_err(|e| Error::InvalidConfig(format!("Invalid product pattern: {}", e)))?;

        Ok(Self {
            phrases,
            patterns,
            set,
        })
    }

    /// Compile a matcher from a plain phrase list
    pub fn from_phrases<S: AsRef<str>>(phrases: &[S]) -> Result<Self> {
        Self::new(ProductVocabularyConfig {
            phrases: phrases.iter().map(|p| p.as_ref().to_string()).collect(),
        })
    }

    /// Normalized phrases in vocabulary order
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Replace every whole-word product mention with `[product]`
    ///
    /// Phrases are applied in vocabulary order, so an earlier phrase's
    /// placeholder can stop a later overlapping phrase from matching.
    pub fn mask(&self, text: &str) -> String {
        let mut masked = text.to_string();

        for pattern in &self.patterns {
            let replaced = match pattern.replace_all(&masked, NoExpand(PRODUCT_TOKEN)) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(replaced) => replaced,
            };
            masked = replaced;
        }

        masked
    }

    /// Distinct phrases mentioned in the raw text, in vocabulary order
    ///
    /// Every phrase is tested independently against the lowercased original.
    pub fn extract(&self, raw_text: Option<&str>) -> Vec<String> {
        let Some(text) = raw_text else {
            return Vec::new();
        };

        let lowered = text.to_lowercase();
        self.set
            .matches(&lowered)
            .into_iter()
            .map(|index| self.phrases[index].clone())
            .collect()
    }
}
