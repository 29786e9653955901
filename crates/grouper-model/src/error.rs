use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unrecognized criterion name in annex {annex}: {name:?}")]
    UnrecognizedCriterion { annex: u8, name: String },
    #[error("invalid diagnosis scope: {0:?}")]
    InvalidScope(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
