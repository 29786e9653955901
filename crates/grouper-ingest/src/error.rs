use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("malformed input at line {line}: expected {expected} columns, found {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, error: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// Why a single field could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field {field} is empty")]
    Missing { field: &'static str },

    #[error("field {field} is not a non-negative integer: {value:?}")]
    NotInteger { field: &'static str, value: String },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::NotInteger { field, .. } => field,
        }
    }
}
