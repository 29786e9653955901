//! Annex 6: DRG prefix combined with the craniocerebral trauma test.

use grouper_model::{DrgDiagnosisCriterion, ServiceCode};
use grouper_standards::rulebook::DrgDiagnosisRule;

/// Three-character diagnosis prefixes counted as craniocerebral trauma.
pub const CRANIOCEREBRAL_TRAUMA_PREFIXES: [&str; 8] =
    ["s02", "s03", "s04", "s05", "s06", "s07", "s08", "s09"];

pub fn evaluate(rules: &[DrgDiagnosisRule], drg: &str, diagnoses: &[String]) -> Vec<ServiceCode> {
    let trauma = has_craniocerebral_trauma(diagnoses);
    rules
        .iter()
        .filter(|rule| drg.starts_with(rule.drg_prefix.as_str()))
        .filter(|rule| match rule.criterion {
            None => true,
            Some(DrgDiagnosisCriterion::CraniocerebralTrauma) => trauma,
            Some(DrgDiagnosisCriterion::WithoutCraniocerebralTrauma) => !trauma,
        })
        .map(|rule| rule.service.clone())
        .collect()
}

pub fn has_craniocerebral_trauma(diagnoses: &[String]) -> bool {
    diagnoses.iter().any(|code| {
        code.get(..3)
            .is_some_and(|prefix| CRANIOCEREBRAL_TRAUMA_PREFIXES.contains(&prefix))
    })
}
