//! Annexes 7 and 8: principal procedure with a secondary procedure from the
//! row's group.

use grouper_model::{PrincipalMode, ProcedureList, ServiceCode};
use grouper_standards::rulebook::ProcedureCombinationRules;

use crate::matching::principal_positions;

/// The secondary group of a row is the one keyed by the row's service code.
pub fn evaluate(
    rules: &ProcedureCombinationRules,
    procedures: &ProcedureList,
    mode: PrincipalMode,
) -> Vec<ServiceCode> {
    rules
        .rules
        .iter()
        .filter(|rule| {
            let Some(group) = rules.secondary_group(&rule.service) else {
                return false;
            };
            principal_positions(procedures, mode, &rule.principal)
                .any(|pos| procedures.others(pos).any(|code| group.contains(code)))
        })
        .map(|rule| rule.service.clone())
        .collect()
}
