//! Dataset format detection from file extensions

use crate::{Error, Result};
use std::path::Path;

/// Table encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// JSON Lines, one object per line
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
    /// Tab-separated values with a header row
    Tsv,
}

impl FormatKind {
    /// Field delimiter for delimited formats
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            FormatKind::Jsonl => None,
            FormatKind::Csv => Some(b','),
            FormatKind::Tsv => Some(b'\t'),
        }
    }
}

/// Detected dataset format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetFormat {
    pub kind: FormatKind,
    /// Whether the file is gzip-compressed
    pub gzip: bool,
}

impl DatasetFormat {
    /// Detect the format of a path
    ///
    /// Supported extensions:
    /// - `.jsonl`, `.json` - JSON Lines
    /// - `.csv` - comma-separated values
    /// - `.tsv` - tab-separated values
    /// - any of the above followed by `.gz`; a bare `.gz` is JSON Lines
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("No file extension found".to_string()))?
            .to_lowercase();

        let (inner, gzip) = if extension == "gz" {
            let inner = path
                .file_stem()
                .map(Path::new)
                .and_then(|stem| stem.extension())
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_else(|| "jsonl".to_string());
            (inner, true)
        } else {
            (extension, false)
        };

        let kind = match inner.as_str() {
            "jsonl" | "json" => FormatKind::Jsonl,
            "csv" => FormatKind::Csv,
            "tsv" => FormatKind::Tsv,
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "Unsupported file extension: {}",
                    other
                )))
            }
        };

        Ok(Self { kind, gzip })
    }
}
