//! Annexes 12 and 13: principal procedure alone.

use grouper_model::{PrincipalMode, ProcedureList, ServiceCode};
use grouper_standards::rulebook::PrincipalProcedureRule;

use crate::matching::has_principal;

pub fn evaluate(
    rules: &[PrincipalProcedureRule],
    procedures: &ProcedureList,
    mode: PrincipalMode,
) -> Vec<ServiceCode> {
    rules
        .iter()
        .filter(|rule| has_principal(procedures, mode, &rule.principal))
        .map(|rule| rule.service.clone())
        .collect()
}
