//! Options controlling case validation and annex evaluation.

use serde::{Deserialize, Serialize};

/// Which procedure positions may act as the principal procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrincipalMode {
    /// Only position 0, and only when the list is flagged as having a principal.
    #[default]
    PrincipalOnly,
    /// Every position is tried in turn; used when the reported order is not
    /// reliable. Never yields fewer services than `PrincipalOnly`.
    Combinatorial,
}

/// How a row with missing or invalid fields is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Reject the whole row; no annex is evaluated.
    #[default]
    Strict,
    /// Treat the offending field as unknown and evaluate what still can be.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupingOptions {
    pub principal_mode: PrincipalMode,
    pub validation_mode: ValidationMode,
}

impl GroupingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_principal_mode(mut self, mode: PrincipalMode) -> Self {
        self.principal_mode = mode;
        self
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Options matching the insurer's "IZA" mode: every procedure may be the
    /// principal one and incomplete rows are still grouped.
    pub fn iza() -> Self {
        Self {
            principal_mode: PrincipalMode::Combinatorial,
            validation_mode: ValidationMode::Lenient,
        }
    }
}
