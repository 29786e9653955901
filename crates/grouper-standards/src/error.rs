#![deny(unsafe_code)]

use std::path::PathBuf;

use grouper_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("missing reference table: {table}")]
    MissingTable { table: String },

    #[error("reference table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    #[error("reference table {table}: {source}")]
    UnrecognizedCriterion {
        table: String,
        #[source]
        source: ModelError,
    },

    #[error("reference table {table}: invalid diagnosis scope for group {group}: {source}")]
    InvalidScope {
        table: String,
        group: String,
        #[source]
        source: ModelError,
    },

    #[error("reference table {table}: invalid code range {entry:?}: {message}")]
    InvalidCodeRange {
        table: String,
        entry: String,
        message: String,
    },

    #[error("reference table {table}: unknown diagnosis group {group:?}")]
    UnknownDiagnosisGroup { table: String, group: String },

    #[error("diagnosis group {group}: cannot resolve service {service:?} in {tables}")]
    UnresolvedServiceGroup {
        group: String,
        service: String,
        tables: String,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
