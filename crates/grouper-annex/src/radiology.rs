//! Annex 11: principal procedure performed at a radiology department.

use grouper_model::{PrincipalMode, ProcedureList, ServiceCode};
use grouper_standards::rulebook::PrincipalProcedureRule;

use crate::procedure;

/// Specialty code of radiology.
pub const RADIOLOGY_SPECIALTY: &str = "023";

pub fn evaluate(
    rules: &[PrincipalProcedureRule],
    procedures: &ProcedureList,
    specialties: &[String],
    mode: PrincipalMode,
) -> Vec<ServiceCode> {
    if !specialties.iter().any(|code| code == RADIOLOGY_SPECIALTY) {
        return Vec::new();
    }
    procedure::evaluate(rules, procedures, mode)
}
