//! Whole-table dataset writer
//!
//! Records are written to a temporary file next to the destination, which
//! is renamed over the destination only after every record is flushed. A
//! failed write leaves any existing destination untouched.

use crate::delimited::{collect_columns, DelimitedWriter};
use crate::jsonl::JsonlWriter;
use crate::{DatasetFormat, FormatKind, Record, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Write all records to `path`, format chosen by extension
///
/// Delimited outputs use the union of record keys, in first-seen order, as
/// columns. Returns the number of records written.
pub fn write_dataset<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<usize> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    debug!("Writing {} records to temporary file {:?}", records.len(), temp.path());

    let written = {
        let buffered = BufWriter::new(temp.as_file_mut());
        if format.gzip {
            let mut encoder = GzEncoder::new(buffered, Compression::default());
            let written = encode(&mut encoder, format.kind, records)?;
            encoder.finish()?.flush()?;
            written
        } else {
            let mut buffered = buffered;
            let written = encode(&mut buffered, format.kind, records)?;
            buffered.flush()?;
            written
        }
    };

    temp.as_file().sync_all()?;
    temp.persist(path)?;

    info!("Wrote {} records to {:?} (format: {:?})", written, path, format);
    Ok(written)
}

fn encode<W: Write>(sink: W, kind: FormatKind, records: &[Record]) -> Result<usize> {
    match kind {
        FormatKind::Jsonl => {
            let mut writer = JsonlWriter::new(sink);
            for record in records {
                writer.write_record(record)?;
            }
            let written = writer.records_written();
            writer.finish()?;
            Ok(written)
        }
        FormatKind::Csv | FormatKind::Tsv => {
            let delimiter = kind.delimiter().unwrap_or(b',');
            let mut writer = DelimitedWriter::new(sink, collect_columns(records), delimiter)?;
            for record in records {
                writer.write_record(record)?;
            }
            let written = writer.records_written();
            writer.finish()?;
            Ok(written)
        }
    }
}
