//! Case file ingestion and result output.

pub mod columns;
pub mod error;
pub mod prepare;
pub mod reader;
pub mod writer;

pub use columns::{ERROR_MARKER, INPUT_COLUMNS, LIST_SEPARATOR, SERVICES_COLUMN};
pub use error::{FieldError, IngestError};
pub use prepare::{PreparedCase, prepare_case};
pub use reader::{RawCase, read_cases, read_cases_from};
pub use writer::{RowOutcome, output_path_for, write_results, write_results_to};
