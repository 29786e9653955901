//! Medical service codes and the annexes that assign them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Medical service code (`kod_ms`), e.g. `S17-22`.
///
/// Kept exactly as written in the reference tables; never normalized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCode(String);

impl ServiceCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Annex evaluators, in the order their results are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Annex {
    Newborn,
    DrgPolytrauma,
    ProcedureCombination,
    ProcedureDiagnosisGroup,
    DiagnosisPair,
    RadiologyProcedure,
    Procedure,
    PrincipalDiagnosis,
    OrganDonor,
}

impl Annex {
    pub const ALL: [Annex; 9] = [
        Self::Newborn,
        Self::DrgPolytrauma,
        Self::ProcedureCombination,
        Self::ProcedureDiagnosisGroup,
        Self::DiagnosisPair,
        Self::RadiologyProcedure,
        Self::Procedure,
        Self::PrincipalDiagnosis,
        Self::OrganDonor,
    ];

    /// Annex numbers in the rule book this evaluator covers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Newborn => "5",
            Self::DrgPolytrauma => "6",
            Self::ProcedureCombination => "7/8",
            Self::ProcedureDiagnosisGroup => "9",
            Self::DiagnosisPair => "10",
            Self::RadiologyProcedure => "11",
            Self::Procedure => "12/13",
            Self::PrincipalDiagnosis => "14/15",
            Self::OrganDonor => "16",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Newborn => "newborn by DRG and criterion",
            Self::DrgPolytrauma => "DRG with diagnosis criterion",
            Self::ProcedureCombination => "principal with secondary procedure",
            Self::ProcedureDiagnosisGroup => "procedure with diagnosis group",
            Self::DiagnosisPair => "principal with secondary diagnosis",
            Self::RadiologyProcedure => "procedure under radiology",
            Self::Procedure => "procedure",
            Self::PrincipalDiagnosis => "principal diagnosis",
            Self::OrganDonor => "organ donor",
        }
    }
}

impl fmt::Display for Annex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annex {}", self.label())
    }
}
