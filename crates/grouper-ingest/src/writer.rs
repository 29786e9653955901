//! Writing the `_output.csv` result file.

use std::io::Write;
use std::path::{Path, PathBuf};

use grouper_model::ServiceCode;

use crate::columns::{DELIMITER, ERROR_MARKER, LIST_SEPARATOR, output_columns};
use crate::error::IngestError;
use crate::reader::RawCase;

/// What the grouper produced for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Services(Vec<ServiceCode>),
    Rejected,
}

impl RowOutcome {
    /// Value of the `ms` column.
    pub fn services_field(&self) -> String {
        match self {
            Self::Rejected => ERROR_MARKER.to_string(),
            Self::Services(services) => {
                let separator = LIST_SEPARATOR.to_string();
                services
                    .iter()
                    .map(ServiceCode::as_str)
                    .collect::<Vec<_>>()
                    .join(separator.as_str())
            }
        }
    }
}

/// `cases.csv` becomes `cases_output.csv` next to it.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_output.csv"))
}

/// Write the header and one row per case, input fields unchanged.
pub fn write_results<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = (&'a RawCase, &'a RowOutcome)>,
) -> Result<(), IngestError> {
    let file = std::fs::File::create(path).map_err(|e| IngestError::io(path, e))?;
    write_results_to(std::io::BufWriter::new(file), path, rows)
}

pub fn write_results_to<'a, W: Write>(
    writer: W,
    path: &Path,
    rows: impl IntoIterator<Item = (&'a RawCase, &'a RowOutcome)>,
) -> Result<(), IngestError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);
    csv_writer
        .write_record(output_columns())
        .map_err(|e| IngestError::csv(path, &e))?;
    for (raw, outcome) in rows {
        let services = outcome.services_field();
        csv_writer
            .write_record(
                raw.fields
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(services.as_str())),
            )
            .map_err(|e| IngestError::csv(path, &e))?;
    }
    csv_writer.flush().map_err(|e| IngestError::io(path, e))
}
