//! Delimited-text loader producing raw booking records
//!
//! Reads a header row and turns each data row into a field-name to raw-value
//! mapping. No typing happens here: every value is kept as text except for
//! missing-value tokens, which become [`RawValue::Missing`].

use crate::app::models::{RawRecord, RawValue};
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw records read from a delimited file
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// One raw record per data row, in file order
    pub records: Vec<RawRecord>,
    /// Column names from the header row
    pub headers: Vec<String>,
    /// Rows that could not be read; kept as empty records so row positions hold
    pub malformed_rows: usize,
}

/// Load raw booking records from a delimited file
pub fn load_records(path: &Path, delimiter: u8) -> Result<LoadResult> {
    if !path.exists() {
        return Err(Error::io(
            format!("Input file not found: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

    let result = read_records(file, &path.display().to_string(), delimiter)?;
    info!(
        "Loaded {} raw records from {}",
        result.records.len(),
        path.display()
    );
    Ok(result)
}

/// Read raw booking records from any reader
pub fn read_records<R: Read>(reader: R, source_name: &str, delimiter: u8) -> Result<LoadResult> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| Error::csv_parsing(source_name, "Failed to read header row", Some(e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::csv_parsing(source_name, "Header row is empty", None));
    }
    debug!("{}: {} columns in header", source_name, headers.len());

    let mut records = Vec::new();
    let mut malformed_rows = 0;
    let mut row = StringRecord::new();

    loop {
        match csv_reader.read_record(&mut row) {
            Ok(true) => records.push(to_raw_record(&headers, &row)),
            Ok(false) => break,
            Err(e) => {
                warn!(
                    "{}: unreadable row {} ({}); it will be rejected during normalization",
                    source_name,
                    records.len(),
                    e
                );
                malformed_rows += 1;
                records.push(RawRecord::new());
            }
        }
    }

    Ok(LoadResult {
        records,
        headers,
        malformed_rows,
    })
}

fn to_raw_record(headers: &[String], row: &StringRecord) -> RawRecord {
    headers
        .iter()
        .zip(row.iter())
        .map(|(header, value)| (header.clone(), RawValue::from_text(value)))
        .collect()
}
