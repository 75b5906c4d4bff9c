//! Record enrichment for comment datasets
//!
//! This crate maps every record of a comment table to its enriched form:
//! canonical text, product-masked text, mentioned products and language.

pub mod error;
pub mod fields;
pub mod pipeline;

pub use error::{Error, Result};
pub use fields::DerivedFields;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineConfig, PipelineStats};
