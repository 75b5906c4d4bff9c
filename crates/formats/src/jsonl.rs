//! Streaming JSONL (JSON Lines) reader and writer
//!
//! Reads JSONL files line-by-line with automatic gzip decompression
//! support, and writes records back one object per line.

use crate::{Error, Record, Result};
use flate2::read::GzDecoder;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for JSONL reader
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Skip malformed lines with a warning instead of failing
    pub skip_malformed: bool,
    /// Buffer size for BufReader
    pub buffer_size: usize,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            skip_malformed: false,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

/// Streaming JSONL reader that processes files line-by-line
pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    config: JsonlConfig,
    line_number: usize,
    records_read: usize,
    bytes_read: u64,
    total_bytes: Option<u64>,
}

impl JsonlReader<Box<dyn Read>> {
    /// Open a JSONL file, auto-detecting gzip compression
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let total_bytes = file.metadata()?.len();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("gz") => {
                debug!("Opening gzip-compressed JSONL file: {:?}", path);
                let decoder = GzDecoder::new(file);
                let reader: Box<dyn Read> = Box::new(decoder);
                Ok(Self::new_with_config(reader, JsonlConfig::default(), None))
            }
            _ => {
                debug!("Opening plain JSONL file: {:?}", path);
                let reader: Box<dyn Read> = Box::new(file);
                Ok(Self::new_with_config(reader, JsonlConfig::default(), Some(total_bytes)))
            }
        }
    }
}

impl<R: Read> JsonlReader<R> {
    /// Create a new JSONL reader from any Read source
    pub fn new(reader: R) -> Self {
        Self::new_with_config(reader, JsonlConfig::default(), None)
    }

    /// Create a new JSONL reader with custom configuration
    pub fn new_with_config(reader: R, config: JsonlConfig, total_bytes: Option<u64>) -> Self {
        let buf_reader = BufReader::with_capacity(config.buffer_size, reader);
        Self {
            reader: buf_reader,
            config,
            line_number: 0,
            records_read: 0,
            bytes_read: 0,
            total_bytes,
        }
    }

    /// Skip malformed lines instead of failing on them
    pub fn with_skip_malformed(mut self, skip: bool) -> Self {
        self.config.skip_malformed = skip;
        self
    }

    /// Get the number of lines processed
    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    /// Get the number of records returned
    pub fn records_processed(&self) -> usize {
        self.records_read
    }

    /// Get the number of bytes read
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    /// Get total file size if known
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}

impl<R: Read> Iterator for JsonlReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(n) => {
                    self.bytes_read += n as u64;
                    self.line_number += 1;

                    // Skip empty lines
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<Value>(trimmed) {
                        Ok(value) => {
                            self.records_read += 1;
                            return Some(Ok(Record::new(value, self.line_number)));
                        }
                        Err(e) if self.config.skip_malformed => {
                            warn!(
                                "Failed to parse JSON at line {}: {} - Error: {}",
                                self.line_number, trimmed, e
                            );
                            continue;
                        }
                        Err(e) => {
                            return Some(Err(Error::MalformedLine {
                                line: self.line_number,
                                source: e,
                            }));
                        }
                    }
                }
                Err(e) => {
                    return Some(Err(Error::Io(e)));
                }
            }
        }
    }
}

/// JSONL writer emitting one compact object per line
pub struct JsonlWriter<W: Write> {
    writer: W,
    records_written: usize,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Write a single record
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record.data)?;
        self.writer.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    /// Get the number of records written
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush buffered output
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
