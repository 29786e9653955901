//! Reading the headerless `;`-separated case file.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::columns::{DELIMITER, INPUT_COLUMNS};
use crate::error::IngestError;

/// One input row exactly as read, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCase {
    /// 1-based line number in the input file.
    pub line: u64,
    pub fields: [String; INPUT_COLUMNS.len()],
}

impl RawCase {
    pub fn id(&self) -> &str {
        &self.fields[0]
    }

    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or_default()
    }
}

/// Read every row of a case file.
///
/// A row with missing columns, or with non-empty cells past the last
/// column, aborts the whole read.
pub fn read_cases(path: &Path) -> Result<Vec<RawCase>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
    read_cases_from(file, path)
}

/// Read rows from any reader; `path` is only used in error messages.
pub fn read_cases_from<R: Read>(reader: R, path: &Path) -> Result<Vec<RawCase>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut cases = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, &e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        // A fully blank line parses as one empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        // Trailing separators after the last column are tolerated.
        let extra_empty = record.iter().skip(INPUT_COLUMNS.len()).all(str::is_empty);
        if record.len() < INPUT_COLUMNS.len() || !extra_empty {
            return Err(IngestError::Malformed {
                line,
                expected: INPUT_COLUMNS.len(),
                found: record.len(),
            });
        }
        let fields = std::array::from_fn(|i| record.get(i).unwrap_or_default().to_string());
        cases.push(RawCase { line, fields });
    }
    debug!(path = %path.display(), rows = cases.len(), "case file read");
    Ok(cases)
}
