//! Delimited (CSV/TSV) reader and writer
//!
//! The header row names the fields of every record. Empty cells read as
//! JSON null, so a missing comment is distinguishable from an empty key.

use crate::{Error, Record, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Configuration for delimited reader
#[derive(Debug, Clone)]
pub struct DelimitedConfig {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Buffer size for the underlying csv reader
    pub buffer_size: usize,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

/// Streaming delimited reader yielding one record per row
pub struct DelimitedReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    row: StringRecord,
    records_read: usize,
    total_bytes: Option<u64>,
}

impl DelimitedReader<Box<dyn Read>> {
    /// Open a delimited file, auto-detecting gzip compression
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let total_bytes = file.metadata()?.len();
        let config = DelimitedConfig {
            delimiter,
            ..Default::default()
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("gz") => {
                debug!("Opening gzip-compressed delimited file: {:?}", path);
                let reader: Box<dyn Read> = Box::new(GzDecoder::new(file));
                Self::new_with_config(reader, config, None)
            }
            _ => {
                debug!("Opening plain delimited file: {:?}", path);
                let reader: Box<dyn Read> = Box::new(file);
                Self::new_with_config(reader, config, Some(total_bytes))
            }
        }
    }
}

impl<R: Read> DelimitedReader<R> {
    /// Create a new CSV reader from any Read source
    pub fn new(reader: R) -> Result<Self> {
        Self::new_with_config(reader, DelimitedConfig::default(), None)
    }

    /// Create a new reader with custom configuration
    ///
    /// Reads the header row immediately; duplicate column names are rejected.
    pub fn new_with_config(
        reader: R,
        config: DelimitedConfig,
        total_bytes: Option<u64>,
    ) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .buffer_capacity(config.buffer_size)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(Error::InvalidFile(format!(
                    "Duplicate column name: {}",
                    header
                )));
            }
        }

        Ok(Self {
            reader,
            headers,
            row: StringRecord::new(),
            records_read: 0,
            total_bytes,
        })
    }

    /// Column names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get the number of records returned
    pub fn records_processed(&self) -> usize {
        self.records_read
    }

    /// Get the number of bytes read
    pub fn bytes_processed(&self) -> u64 {
        self.reader.position().byte()
    }

    /// Get total file size if known
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    fn row_to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .headers
            .iter()
            .zip(self.row.iter())
            .map(|(header, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (header.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None, // EOF
            Ok(true) => {
                self.records_read += 1;
                let line = self
                    .row
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(self.records_read + 1);
                Some(Ok(Record::new(self.row_to_value(), line)))
            }
            Err(e) => Some(Err(Error::Csv(e))),
        }
    }
}

/// Delimited writer with a fixed column list
pub struct DelimitedWriter<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<String>,
    records_written: usize,
}

impl<W: Write> DelimitedWriter<W> {
    /// Create a writer and emit the header row
    pub fn new(writer: W, columns: Vec<String>, delimiter: u8) -> Result<Self> {
        let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        writer.write_record(&columns)?;
        Ok(Self {
            writer,
            columns,
            records_written: 0,
        })
    }

    /// Write a single record; fields absent from the record become empty cells
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let row: Vec<String> = self
            .columns
            .iter()
            .map(|column| cell_text(record.get(column)))
            .collect();
        self.writer.write_record(&row)?;
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

/// Column names in first-seen order across all records
pub fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for record in records {
        if let Value::Object(map) = &record.data {
            for key in map.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
    }

    columns
}

/// Render a value as a delimited cell
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reader_basic() {
        let data = "id,Comment Text\n1,hello world\n2,\"quoted, with comma\"\n";

        let reader = DelimitedReader::new(data.as_bytes()).unwrap();
        assert_eq!(reader.headers(), &["id", "Comment Text"]);

        let records: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, json!({"id": "1", "Comment Text": "hello world"}));
        assert_eq!(records[1].data["Comment Text"], "quoted, with comma");
        assert_eq!(records[1].source_line, 3);
    }

    #[test]
    fn test_empty_cell_is_null() {
        let data = "id,text\n1,\n";
        let mut reader = DelimitedReader::new(data.as_bytes()).unwrap();
        let record = reader.next().unwrap().unwrap();

        assert_eq!(record.data["text"], Value::Null);
        assert_eq!(record.text("text"), None);
    }

    #[test]
    fn test_multiline_cell() {
        let data = "text\n\"first line\nsecond line\"\nnext\n";
        let records: Vec<_> = DelimitedReader::new(data.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data["text"], "first line\nsecond line");
        assert_eq!(records[1].source_line, 4);
    }

    #[test]
    fn test_ragged_row_is_error() {
        let data = "a,b\n1,2\n3\n";
        let result = DelimitedReader::new(data.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>>>();

        assert!(matches!(result, Err(Error::Csv(_))));
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let data = "text,text\n1,2\n";
        assert!(matches!(
            DelimitedReader::new(data.as_bytes()),
            Err(Error::InvalidFile(_))
        ));
    }

    #[test]
    fn test_tsv_reader() {
        let data = "id\ttext\n1\thello, world\n";
        let config = DelimitedConfig {
            delimiter: b'\t',
            ..Default::default()
        };
        let records: Vec<_> = DelimitedReader::new_with_config(data.as_bytes(), config, None)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(records[0].data["text"], "hello, world");
    }

    #[test]
    fn test_writer_cells() {
        let records = vec![
            Record::new(json!({"text": "a, b", "products": ["x", "y"], "flag": true}), 2),
            Record::new(json!({"text": null, "extra": 5}), 3),
        ];
        let columns = collect_columns(&records);
        assert_eq!(columns, vec!["text", "products", "flag", "extra"]);

        let mut buffer = Vec::new();
        {
            let mut writer = DelimitedWriter::new(&mut buffer, columns, b',').unwrap();
            for record in &records {
                writer.write_record(record).unwrap();
            }
            assert_eq!(writer.records_written(), 2);
            writer.finish().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "text,products,flag,extra\n\"a, b\",\"[\"\"x\"\",\"\"y\"\"]\",true,\n,,,5\n"
        );
    }
}
