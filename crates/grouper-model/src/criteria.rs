//! Type-safe enumerations for the named criteria used in the annex tables.
//!
//! The rule book refers to supplementary criteria by their full Slovak
//! names. Each name maps to exactly one variant; a name without a variant is
//! rejected when the rule book is compiled, never while grouping a case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Supplementary criterion of the newborn annex (annex 5, column
/// `doplnujuce_kriterium`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewbornCriterion {
    /// Non-conventional (high-frequency, NO) ventilation procedure reported.
    NonConventionalVentilation,
    /// Controlled hypothermia procedure reported.
    ControlledHypothermia,
    /// Palliative newborn care diagnosis reported.
    PalliativeCare,
    /// Exchange transfusion procedure reported.
    ExchangeTransfusion,
    /// Emergency delivery in a life-threatening situation.
    EmergencyDelivery,
    /// Below the viability threshold (< 24 weeks or < 500 g).
    BelowViabilityThreshold,
    /// Significant operative procedure reported.
    SignificantProcedure,
    /// No significant procedure, ventilation over 95 hours and at least two
    /// severe newborn problems.
    NoSignificantProcedureLongVentilationMultipleProblems,
    /// No significant procedure and not (ventilation over 95 hours with
    /// multiple severe problems).
    NoSignificantProcedureOtherwise,
}

impl NewbornCriterion {
    pub const ALL: [NewbornCriterion; 9] = [
        Self::NonConventionalVentilation,
        Self::ControlledHypothermia,
        Self::PalliativeCare,
        Self::ExchangeTransfusion,
        Self::EmergencyDelivery,
        Self::BelowViabilityThreshold,
        Self::SignificantProcedure,
        Self::NoSignificantProcedureLongVentilationMultipleProblems,
        Self::NoSignificantProcedureOtherwise,
    ];

    /// Name as written in the rule book.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonConventionalVentilation => "Nekonvenčná UPV (vysokofrekvenčná, NO ventilácia)",
            Self::ControlledHypothermia => "Riadená hypotermia",
            Self::PalliativeCare => "Paliatívna starostlivosť u novorodencov",
            Self::ExchangeTransfusion => "Potreba výmennej transfúzie",
            Self::EmergencyDelivery => {
                "Akútny pôrod novorodenca v prípade ohrozenia života bez ohľadu na gestačný vek a hmotnosť"
            }
            Self::BelowViabilityThreshold => {
                "Novorodenec pod hranicou viability (< 24 týždeň alebo < 500 g)"
            }
            Self::SignificantProcedure => "So signifikantným OP výkonom",
            Self::NoSignificantProcedureLongVentilationMultipleProblems => {
                "Bez signifikantného OP výkonu, s UPV > 95 hodín, s viacerými ťažkými problémami"
            }
            Self::NoSignificantProcedureOtherwise => {
                "Bez signifikantného OP výkonu a bez UPV > 95 hodín a viacerých ťažkých problémov"
            }
        }
    }
}

impl fmt::Display for NewbornCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewbornCriterion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|criterion| criterion.as_str() == name)
            .ok_or_else(|| ModelError::UnrecognizedCriterion {
                annex: 5,
                name: name.to_string(),
            })
    }
}

/// Diagnosis-group criterion of the DRG annex (annex 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrgDiagnosisCriterion {
    /// At least one diagnosis in the craniocerebral trauma range S02–S09.
    CraniocerebralTrauma,
    /// No diagnosis in the craniocerebral trauma range.
    WithoutCraniocerebralTrauma,
}

impl DrgDiagnosisCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CraniocerebralTrauma => "Kraniocerebrálna trauma",
            Self::WithoutCraniocerebralTrauma => "bez diagnózy Kraniocerebrálna trauma",
        }
    }
}

impl fmt::Display for DrgDiagnosisCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrgDiagnosisCriterion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Kraniocerebrálna trauma" => Ok(Self::CraniocerebralTrauma),
            "bez diagnózy Kraniocerebrálna trauma" => Ok(Self::WithoutCraniocerebralTrauma),
            other => Err(ModelError::UnrecognizedCriterion {
                annex: 6,
                name: other.to_string(),
            }),
        }
    }
}

/// Which case diagnoses a diagnosis-group row is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiagnosisScope {
    /// Principal diagnosis only (`h`).
    #[default]
    Principal,
    /// Any reported diagnosis (`a`).
    Any,
    /// Secondary diagnoses only (`v`).
    Secondary,
}

impl DiagnosisScope {
    /// Select the diagnoses this scope covers. `diagnoses` must be non-empty.
    pub fn select<'a>(&self, diagnoses: &'a [String]) -> &'a [String] {
        match self {
            Self::Principal => match diagnoses.first() {
                Some(principal) if !principal.is_empty() => &diagnoses[..1],
                _ => &[],
            },
            Self::Any => diagnoses,
            Self::Secondary => diagnoses.get(1..).unwrap_or_default(),
        }
    }
}

impl FromStr for DiagnosisScope {
    type Err = ModelError;

    /// Only the first letter is significant (`hlavná`, `akákoľvek`, `vedľajšia`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|ch| ch.to_ascii_lowercase()) {
            None | Some('h') => Ok(Self::Principal),
            Some('a') => Ok(Self::Any),
            Some('v') => Ok(Self::Secondary),
            Some(_) => Err(ModelError::InvalidScope(s.trim().to_string())),
        }
    }
}
