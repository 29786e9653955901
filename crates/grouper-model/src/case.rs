//! Hospitalization case as seen by the annex evaluators.

use serde::{Deserialize, Serialize};

use crate::options::PrincipalMode;

/// Patients up to and including this age use the children's annex tables.
pub const CHILD_AGE_LIMIT: u32 = 18;

/// Newborn annex applies up to this many days of age (age in years = 0).
pub const NEWBORN_DAY_LIMIT: u32 = 28;

/// Age band selecting between the children's and adults' annex tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Child,
    Adult,
}

impl AgeBand {
    pub fn from_age(age_years: u32) -> Self {
        if age_years <= CHILD_AGE_LIMIT {
            Self::Child
        } else {
            Self::Adult
        }
    }
}

/// Ordered procedure codes reported for a case.
///
/// `has_principal` is false when the reported list started with the list
/// separator, meaning no procedure was flagged as the principal one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcedureList {
    pub codes: Vec<String>,
    pub has_principal: bool,
}

impl ProcedureList {
    pub fn new(codes: Vec<String>) -> Self {
        Self {
            codes,
            has_principal: true,
        }
    }

    pub fn without_principal(codes: Vec<String>) -> Self {
        Self {
            codes,
            has_principal: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Principal procedure, if the list has one.
    pub fn principal(&self) -> Option<&str> {
        if self.has_principal {
            self.codes.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Positions that may act as the principal procedure under `mode`.
    pub fn principal_positions(&self, mode: PrincipalMode) -> std::ops::Range<usize> {
        match mode {
            PrincipalMode::Combinatorial => 0..self.codes.len(),
            PrincipalMode::PrincipalOnly if self.principal().is_some() => 0..1,
            PrincipalMode::PrincipalOnly => 0..0,
        }
    }

    /// Every code except the one at `position`.
    pub fn others(&self, position: usize) -> impl Iterator<Item = &str> {
        self.codes
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != position)
            .map(|(_, code)| code.as_str())
    }
}

/// One hospitalization record after validation and code normalization.
///
/// `None` means the field was absent or, in lenient mode, invalid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HospitalizationCase {
    pub id: String,
    pub age_years: Option<u32>,
    pub age_days: Option<u32>,
    pub weight_grams: Option<i64>,
    pub ventilation_hours: Option<i64>,
    /// Position 0 is the principal diagnosis and stays empty when none was reported.
    pub diagnoses: Option<Vec<String>>,
    pub procedures: Option<ProcedureList>,
    pub specialties: Option<Vec<String>>,
    pub drg: Option<String>,
}

impl HospitalizationCase {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn age_band(&self) -> Option<AgeBand> {
        self.age_years.map(AgeBand::from_age)
    }

    pub fn is_newborn(&self) -> bool {
        self.age_years == Some(0) && self.age_days.is_some_and(|days| days <= NEWBORN_DAY_LIMIT)
    }

    /// Diagnoses, only when at least one was reported.
    pub fn diagnoses(&self) -> Option<&[String]> {
        self.diagnoses.as_deref().filter(|codes| !codes.is_empty())
    }

    /// Procedures, only when at least one was reported.
    pub fn procedures(&self) -> Option<&ProcedureList> {
        self.procedures.as_ref().filter(|list| !list.is_empty())
    }

    pub fn specialties(&self) -> Option<&[String]> {
        self.specialties.as_deref().filter(|codes| !codes.is_empty())
    }

    pub fn drg(&self) -> Option<&str> {
        self.drg.as_deref().filter(|code| !code.is_empty())
    }

    /// Position 0 of the diagnoses; an empty code there means none was reported.
    pub fn principal_diagnosis(&self) -> Option<&str> {
        self.diagnoses()
            .and_then(|codes| codes.first())
            .map(String::as_str)
            .filter(|code| !code.is_empty())
    }

    pub fn secondary_diagnoses(&self) -> &[String] {
        match self.diagnoses() {
            Some(codes) => &codes[1..],
            None => &[],
        }
    }
}
