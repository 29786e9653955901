//! Annex 9: principal procedure combined with a diagnosis group or an
//! explicit diagnosis code list.

use grouper_model::{PrincipalMode, ProcedureList, ServiceCode};
use grouper_standards::rulebook::{DiagnosisGroup, DiagnosisGroupRules, DiagnosisListRule};

use crate::matching::{has_principal, starts_with_any};

/// Rows naming a diagnosis group.
pub fn evaluate_groups(
    rules: &DiagnosisGroupRules,
    diagnoses: &[String],
    procedures: &ProcedureList,
    mode: PrincipalMode,
) -> Vec<ServiceCode> {
    rules
        .rules
        .iter()
        .filter(|rule| has_principal(procedures, mode, &rule.principal))
        .filter(|rule| {
            rules
                .group(&rule.group)
                .is_some_and(|group| group_matches(group, diagnoses))
        })
        .map(|rule| rule.service.clone())
        .collect()
}

/// Rows carrying their own diagnosis list; any reported diagnosis may match.
pub fn evaluate_lists(
    rules: &[DiagnosisListRule],
    diagnoses: &[String],
    procedures: &ProcedureList,
    mode: PrincipalMode,
) -> Vec<ServiceCode> {
    rules
        .iter()
        .filter(|rule| has_principal(procedures, mode, &rule.principal))
        .filter(|rule| starts_with_any(diagnoses, &rule.prefixes))
        .map(|rule| rule.service.clone())
        .collect()
}

/// A group matches when any of its rows matches the diagnoses in its scope.
pub fn group_matches(group: &DiagnosisGroup, diagnoses: &[String]) -> bool {
    group
        .entries
        .iter()
        .any(|entry| starts_with_any(entry.scope.select(diagnoses), &entry.prefixes))
}
