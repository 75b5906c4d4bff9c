//! Dataset readers and writers for comment tables
//!
//! This crate provides readers for JSON Lines and delimited (CSV/TSV)
//! files, optionally gzip-compressed, and writers that replace the
//! destination only once the whole table has been written.

pub mod delimited;
pub mod error;
pub mod format;
pub mod jsonl;
pub mod reader;
pub mod record;
pub mod writer;

pub use error::{Error, Result};
pub use format::{DatasetFormat, FormatKind};
pub use reader::{open_dataset, read_dataset, DatasetReader};
pub use record::Record;
pub use writer::write_dataset;
