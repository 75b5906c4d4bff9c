//! Text filters for comment dataset preparation
//!
//! This crate provides the per-record text transforms: canonicalization,
//! product vocabulary matching and guarded language identification.

pub mod error;
pub mod language;
pub mod products;
pub mod text_preprocessing;

pub use error::{Error, Result};
pub use language::{LanguageIdentifier, LanguageIdentifierConfig, LanguageTag};
pub use products::{ProductMatcher, ProductVocabularyConfig};
pub use text_preprocessing::{canonicalize, normalize_emoji};
