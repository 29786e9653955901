//! Annex 10: principal diagnosis paired with a secondary diagnosis.

use grouper_model::ServiceCode;
use grouper_standards::rulebook::DiagnosisPairRule;

/// Exact equality on both codes.
pub fn evaluate(
    rules: &[DiagnosisPairRule],
    principal: &str,
    secondary: &[String],
) -> Vec<ServiceCode> {
    rules
        .iter()
        .filter(|rule| rule.principal == principal)
        .filter(|rule| secondary.contains(&rule.secondary))
        .map(|rule| rule.service.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_must_not_be_the_principal() {
        let rules = vec![DiagnosisPairRule {
            principal: "i210".to_string(),
            secondary: "i210".to_string(),
            service: ServiceCode::new("S10-02"),
        }];
        assert!(evaluate(&rules, "i210", &[]).is_empty());
        assert_eq!(evaluate(&rules, "i210", &["i210".to_string()]).len(), 1);
    }

    #[test]
    fn prefix_is_not_enough() {
        let rules = vec![DiagnosisPairRule {
            principal: "i210".to_string(),
            secondary: "e105".to_string(),
            service: ServiceCode::new("S10-01"),
        }];
        assert!(evaluate(&rules, "i210", &["e1051".to_string()]).is_empty());
    }
}
