//! Shared CSV utilities for loading annex tables.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::StandardsError;

/// Field delimiter of every annex table.
pub const ANNEX_DELIMITER: u8 = b';';

/// One table row keyed by column header.
pub type TableRow = BTreeMap<String, String>;

/// Parse `;`-delimited CSV bytes into headers and row maps.
///
/// Handles BOM characters in the header and trims whitespace from values.
/// `path` is only used in error messages.
pub fn parse_csv_rows(
    bytes: &[u8],
    path: &Path,
) -> Result<(Vec<String>, Vec<TableRow>), StandardsError> {
    let csv_error = |e: csv::Error| StandardsError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(ANNEX_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = TableRow::new();
        for (idx, key) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("").trim();
            row.insert(key.clone(), value.to_string());
        }
        rows.push(row);
    }
    Ok((headers, rows))
}

/// Get a field value from a row, returning an empty string if not present.
pub fn get_field<'a>(row: &'a TableRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

/// Get an optional field value from a row (None if empty or missing).
pub fn get_optional<'a>(row: &'a TableRow, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
