//! Annexes 14 and 15: principal diagnosis alone.

use grouper_model::ServiceCode;
use grouper_standards::rulebook::PrincipalDiagnosisRule;

pub fn evaluate(rules: &[PrincipalDiagnosisRule], principal: &str) -> Vec<ServiceCode> {
    rules
        .iter()
        .filter(|rule| rule.principal == principal)
        .map(|rule| rule.service.clone())
        .collect()
}
