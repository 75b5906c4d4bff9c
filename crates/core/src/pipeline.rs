//! Parallel record enrichment pipeline
//!
//! Maps every record to its enriched form with Rayon. The product matcher
//! and language identifier are built once and shared read-only; output order
//! always matches input order.

use crate::fields::DerivedFields;
use crate::{Error, Result};
use commentprep_filters::language::{language_code, parse_language_code, LanguageStats};
use commentprep_filters::text_preprocessing::canonicalize;
use commentprep_filters::{
    LanguageIdentifier, LanguageIdentifierConfig, ProductMatcher, ProductVocabularyConfig,
};
use commentprep_formats::{read_dataset, write_dataset, Record};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Pipeline statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub total_records: usize,
    pub target_language_records: usize,
    pub records_with_products: usize,
    pub product_mentions: BTreeMap<String, usize>,
    pub languages: LanguageStats,
}

impl PipelineStats {
    fn record(&mut self, derived: &DerivedFields) {
        self.total_records += 1;
        if derived.is_target_language {
            self.target_language_records += 1;
        }
        if !derived.mentioned_products.is_empty() {
            self.records_with_products += 1;
        }
        for product in &derived.mentioned_products {
            *self.product_mentions.entry(product.clone()).or_insert(0) += 1;
        }
        self.languages.record(derived.language);
    }

    /// Percentage of records in the target language
    pub fn target_language_rate(&self) -> f64 {
        if self.total_records > 0 {
            (self.target_language_records as f64 / self.total_records as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage of records mentioning at least one product
    pub fn product_rate(&self) -> f64 {
        if self.total_records > 0 {
            (self.records_with_products as f64 / self.total_records as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Field holding the raw comment text
    pub text_field: String,
    /// Language code records are flagged against
    pub target_language: String,
    pub products: ProductVocabularyConfig,
    pub language: LanguageIdentifierConfig,
    /// Records per parallel batch
    pub chunk_size: usize,
    /// Number of threads (None = auto-detect)
    pub num_threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text_field: "text".to_string(),
            target_language: "en".to_string(),
            products: ProductVocabularyConfig::default(),
            language: LanguageIdentifierConfig::default(),
            chunk_size: 10_000,
            num_threads: None,
        }
    }
}

/// Comment enrichment pipeline
pub struct Pipeline {
    text_field: String,
    target_code: &'static str,
    chunk_size: usize,
    matcher: ProductMatcher,
    identifier: LanguageIdentifier,
    pool: rayon::ThreadPool,
    stats: Mutex<PipelineStats>,
}

impl Pipeline {
    /// Create a new pipeline, validating the whole configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        if config.text_field.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "Text field name must not be empty".to_string(),
            ));
        }
        if config.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        let target_code = language_code(parse_language_code(&config.target_language)?);
        let matcher = ProductMatcher::new(config.products)?;
        let identifier = LanguageIdentifier::new(config.language)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build thread pool: {}", e)))?;

        debug!(
            "Pipeline ready: field={:?} target={} products={} threads={}",
            config.text_field,
            target_code,
            matcher.len(),
            pool.current_num_threads()
        );

        Ok(Self {
            text_field: config.text_field,
            target_code,
            chunk_size: config.chunk_size,
            matcher,
            identifier,
            pool,
            stats: Mutex::new(PipelineStats::default()),
        })
    }

    /// Field holding the raw comment text
    pub fn text_field(&self) -> &str {
        &self.text_field
    }

    /// Normalized target language code
    pub fn target_code(&self) -> &'static str {
        self.target_code
    }

    /// Compute the derived fields for one raw text
    pub fn derive(&self, raw: Option<&str>) -> DerivedFields {
        let cleaned_text = canonicalize(raw);
        let masked_text = self.matcher.mask(&cleaned_text);
        let mentioned_products = self.matcher.extract(raw);
        let language = self.identifier.identify(Some(&cleaned_text));
        let is_target_language =
            !language.is_sentinel() && language.as_str() == self.target_code;

        DerivedFields {
            cleaned_text,
            masked_text,
            mentioned_products,
            language,
            is_target_language,
        }
    }

    /// Enrich a single record, leaving the input untouched
    pub fn enrich_record(&self, record: &Record) -> Result<Record> {
        self.enrich_one(record).map(|(enriched, _)| enriched)
    }

    fn enrich_one(&self, record: &Record) -> Result<(Record, DerivedFields)> {
        let Value::Object(map) = &record.data else {
            return Err(Error::InvalidRecord {
                line: record.source_line,
                reason: "expected a JSON object".to_string(),
            });
        };

        let raw = record.text(&self.text_field);
        let derived = self.derive(raw.as_deref());

        let mut enriched = map.clone();
        derived.apply(&mut enriched);

        Ok((Record::new(Value::Object(enriched), record.source_line), derived))
    }

    /// Enrich every record, in input order
    ///
    /// Any record failure aborts the whole call; no partial result is
    /// returned.
    pub fn enrich(&self, records: &[Record]) -> Result<Vec<Record>> {
        let mut enriched = Vec::with_capacity(records.len());

        for chunk in records.chunks(self.chunk_size) {
            let batch: Vec<(Record, DerivedFields)> = self.pool.install(|| {
                chunk
                    .par_iter()
                    .map(|record| self.enrich_one(record))
                    .collect::<Result<Vec<_>>>()
            })?;

            {
                let mut stats = self.stats.lock().unwrap();
                for (_, derived) in &batch {
                    stats.record(derived);
                }
            }

            enriched.extend(batch.into_iter().map(|(record, _)| record));
        }

        Ok(enriched)
    }

    /// Read, enrich and write a whole table
    ///
    /// Nothing is written unless every record was enriched.
    pub fn enrich_file(&self, input: &Path, output: &Path) -> Result<usize> {
        info!("Enriching {:?} -> {:?}", input, output);

        let records = read_dataset(input)?;
        let enriched = self.enrich(&records)?;
        let written = write_dataset(output, &enriched)?;

        info!("Enriched {} records", written);
        Ok(written)
    }

    /// Get current statistics
    pub fn stats(&self) -> PipelineStats {
        self.stats.lock().unwrap().clone()
    }

    /// Reset statistics
    pub fn reset_stats(&self) {
        let mut stats = self.stats.lock().unwrap();
        *stats = PipelineStats::default();
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn text_field(mut self, field: impl Into<String>) -> Self {
        self.config.text_field = field.into();
        self
    }

    pub fn target_language(mut self, code: impl Into<String>) -> Self {
        self.config.target_language = code.into();
        self
    }

    pub fn products<S: AsRef<str>>(mut self, phrases: &[S]) -> Self {
        self.config.products = ProductVocabularyConfig {
            phrases: phrases.iter().map(|p| p.as_ref().to_string()).collect(),
        };
        self
    }

    pub fn vocabulary(mut self, products: ProductVocabularyConfig) -> Self {
        self.config.products = products;
        self
    }

    pub fn language(mut self, language: LanguageIdentifierConfig) -> Self {
        self.config.language = language;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.config)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
