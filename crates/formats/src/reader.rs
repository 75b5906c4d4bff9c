//! Unified dataset reader abstraction
//!
//! Provides a common interface for reading different dataset formats
//! with automatic format detection based on file extensions.

use crate::{
    delimited::DelimitedReader, jsonl::JsonlReader, DatasetFormat, FormatKind, Record, Result,
};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Trait for dataset readers providing unified interface
pub trait DatasetReader: Iterator<Item = Result<Record>> {
    /// Get total file size in bytes if known
    fn total_bytes(&self) -> Option<u64>;

    /// Get number of bytes processed so far
    fn bytes_processed(&self) -> u64;

    /// Get the number of records processed
    fn records_processed(&self) -> usize;
}

/// JSONL dataset reader wrapper
pub struct JsonlDatasetReader {
    reader: JsonlReader<Box<dyn Read>>,
}

impl Iterator for JsonlDatasetReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

impl DatasetReader for JsonlDatasetReader {
    fn total_bytes(&self) -> Option<u64> {
        self.reader.total_bytes()
    }

    fn bytes_processed(&self) -> u64 {
        self.reader.bytes_processed()
    }

    fn records_processed(&self) -> usize {
        self.reader.records_processed()
    }
}

/// CSV/TSV dataset reader wrapper
pub struct DelimitedDatasetReader {
    reader: DelimitedReader<Box<dyn Read>>,
}

impl Iterator for DelimitedDatasetReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

impl DatasetReader for DelimitedDatasetReader {
    fn total_bytes(&self) -> Option<u64> {
        self.reader.total_bytes()
    }

    fn bytes_processed(&self) -> u64 {
        self.reader.bytes_processed()
    }

    fn records_processed(&self) -> usize {
        self.reader.records_processed()
    }
}

/// Factory function to open a dataset with automatic format detection
///
/// See [`DatasetFormat::from_path`] for the supported extensions.
pub fn open_dataset<P: AsRef<Path>>(path: P) -> Result<Box<dyn DatasetReader>> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;

    info!("Opening dataset: {:?} (format: {:?})", path, format);

    match format.kind {
        FormatKind::Jsonl => {
            let reader = JsonlReader::open(path)?;
            Ok(Box::new(JsonlDatasetReader { reader }))
        }
        FormatKind::Csv | FormatKind::Tsv => {
            let delimiter = format.kind.delimiter().unwrap_or(b',');
            let reader = DelimitedReader::open(path, delimiter)?;
            Ok(Box::new(DelimitedDatasetReader { reader }))
        }
    }
}

/// Read a whole dataset into memory
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    open_dataset(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    #[test]
    fn test_open_jsonl_dataset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let temp_path = temp_dir.path().join("comments.jsonl");

        {
            let mut file = std::fs::File::create(&temp_path).unwrap();
            writeln!(file, r#"{{"text": "hello"}}"#).unwrap();
            writeln!(file, r#"{{"text": "world"}}"#).unwrap();
        }

        let mut reader = open_dataset(&temp_path).unwrap();
        let records: Vec<_> = reader.by_ref().collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data["text"], "hello");
    }

    #[test]
    fn test_open_csv_dataset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let temp_path = temp_dir.path().join("comments.csv");
        std::fs::write(&temp_path, "Comment Text,likes\nnice tool,3\n,0\n").unwrap();

        let records = read_dataset(&temp_path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data["Comment Text"], "nice tool");
        assert!(records[1].data["Comment Text"].is_null());
    }

    #[test]
    fn test_open_dataset_unsupported_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let temp_path = temp_dir.path().join("comments.txt");

        let result = open_dataset(&temp_path);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = open_dataset(temp_dir.path().join("missing.csv"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_dataset_reader_progress() {
        let temp_dir = tempfile::tempdir().unwrap();
        let temp_path = temp_dir.path().join("comments.csv");
        std::fs::write(&temp_path, "text\nhello\nworld\n").unwrap();

        let mut reader = open_dataset(&temp_path).unwrap();

        assert_eq!(reader.records_processed(), 0);
        assert!(reader.total_bytes().is_some());

        let _ = reader.next();
        assert_eq!(reader.records_processed(), 1);
        assert!(reader.bytes_processed() > 0);
    }
}
