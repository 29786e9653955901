//! Annex 5: newborn classification by DRG and supplementary criterion.

use grouper_model::{HospitalizationCase, NewbornCriterion, ServiceCode};
use grouper_standards::rulebook::{NewbornLists, NewbornRule};

use crate::matching::any_in;

/// Procedure reported for an emergency delivery in a life-threatening situation.
pub const EMERGENCY_DELIVERY_PROCEDURE: &str = "93083";

/// Birth weight below which a newborn is under the viability threshold.
pub const VIABILITY_WEIGHT_GRAMS: i64 = 500;

/// Ventilation longer than this counts as long-term ventilation.
pub const LONG_VENTILATION_HOURS: i64 = 95;

/// Severe newborn problems needed for "multiple severe problems".
pub const MULTIPLE_PROBLEMS_MIN: usize = 2;

/// Every row whose DRG prefix and criterion hold contributes its service.
///
/// An empty DRG prefix matches any case, including one without a DRG code.
pub fn evaluate(
    rules: &[NewbornRule],
    lists: &NewbornLists,
    case: &HospitalizationCase,
) -> Vec<ServiceCode> {
    let facts = NewbornFacts::new(case, lists);
    rules
        .iter()
        .filter(|rule| drg_matches(&rule.drg_prefix, case.drg()))
        .filter(|rule| rule.criterion.is_none_or(|criterion| facts.holds(criterion)))
        .map(|rule| rule.service.clone())
        .collect()
}

fn drg_matches(prefix: &str, drg: Option<&str>) -> bool {
    prefix.is_empty() || drg.is_some_and(|drg| drg.starts_with(prefix))
}

struct NewbornFacts<'a> {
    case: &'a HospitalizationCase,
    lists: &'a NewbornLists,
    procedures: &'a [String],
    diagnoses: &'a [String],
}

impl<'a> NewbornFacts<'a> {
    fn new(case: &'a HospitalizationCase, lists: &'a NewbornLists) -> Self {
        Self {
            case,
            lists,
            procedures: case
                .procedures()
                .map(|list| list.codes.as_slice())
                .unwrap_or_default(),
            diagnoses: case.diagnoses().unwrap_or_default(),
        }
    }

    fn holds(&self, criterion: NewbornCriterion) -> bool {
        match criterion {
            NewbornCriterion::NonConventionalVentilation => {
                any_in(self.procedures, &self.lists.non_conventional_ventilation)
            }
            NewbornCriterion::ControlledHypothermia => {
                any_in(self.procedures, &self.lists.controlled_hypothermia)
            }
            NewbornCriterion::PalliativeCare => any_in(self.diagnoses, &self.lists.palliative_care),
            NewbornCriterion::ExchangeTransfusion => {
                any_in(self.procedures, &self.lists.exchange_transfusion)
            }
            NewbornCriterion::EmergencyDelivery => self
                .case
                .procedures()
                .is_some_and(|list| list.contains(EMERGENCY_DELIVERY_PROCEDURE)),
            NewbornCriterion::BelowViabilityThreshold => {
                self.case
                    .weight_grams
                    .is_some_and(|weight| weight < VIABILITY_WEIGHT_GRAMS)
                    || any_in(self.procedures, &self.lists.viability)
            }
            NewbornCriterion::SignificantProcedure => self.significant_procedure(),
            NewbornCriterion::NoSignificantProcedureLongVentilationMultipleProblems => {
                !self.significant_procedure() && self.long_ventilation_with_multiple_problems()
            }
            NewbornCriterion::NoSignificantProcedureOtherwise => {
                !self.significant_procedure() && !self.long_ventilation_with_multiple_problems()
            }
        }
    }

    fn significant_procedure(&self) -> bool {
        any_in(self.procedures, &self.lists.significant_procedures)
    }

    /// Unknown ventilation never counts as long ventilation.
    fn long_ventilation_with_multiple_problems(&self) -> bool {
        let long_ventilation = self
            .case
            .ventilation_hours
            .is_some_and(|hours| hours > LONG_VENTILATION_HOURS);
        let problems = self
            .diagnoses
            .iter()
            .filter(|code| self.lists.severe_problems.contains(code.as_str()))
            .count();
        long_ventilation && problems >= MULTIPLE_PROBLEMS_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouper_model::ProcedureList;

    fn rule(drg: &str, criterion: Option<NewbornCriterion>, service: &str) -> NewbornRule {
        NewbornRule {
            drg_prefix: drg.to_string(),
            criterion,
            service: ServiceCode::new(service),
        }
    }

    fn lists() -> NewbornLists {
        NewbornLists {
            significant_procedures: ["5t061".to_string()].into(),
            severe_problems: ["p220".to_string(), "p291".to_string()].into(),
            ..NewbornLists::default()
        }
    }

    fn newborn() -> HospitalizationCase {
        HospitalizationCase {
            age_years: Some(0),
            age_days: Some(10),
            ..HospitalizationCase::new("N1")
        }
    }

    #[test]
    fn drg_prefix_requires_drg() {
        let rules = [rule("p67", None, "S05-01")];
        assert!(evaluate(&rules, &lists(), &newborn()).is_empty());

        let case = HospitalizationCase {
            drg: Some("p67d".to_string()),
            ..newborn()
        };
        assert_eq!(evaluate(&rules, &lists(), &case), vec![ServiceCode::new("S05-01")]);
    }

    #[test]
    fn viability_by_weight_only() {
        let rules = [rule("", Some(NewbornCriterion::BelowViabilityThreshold), "S05-03")];
        let light = HospitalizationCase {
            weight_grams: Some(450),
            ..newborn()
        };
        assert_eq!(evaluate(&rules, &lists(), &light).len(), 1);

        let heavy = HospitalizationCase {
            weight_grams: Some(2000),
            ..newborn()
        };
        assert!(evaluate(&rules, &lists(), &heavy).is_empty());

        let unknown = newborn();
        assert!(evaluate(&rules, &lists(), &unknown).is_empty());
    }

    #[test]
    fn long_ventilation_split_is_exhaustive_without_significant_procedure() {
        let rules = [
            rule(
                "",
                Some(NewbornCriterion::NoSignificantProcedureLongVentilationMultipleProblems),
                "LONG",
            ),
            rule("", Some(NewbornCriterion::NoSignificantProcedureOtherwise), "OTHER"),
        ];
        let long = HospitalizationCase {
            ventilation_hours: Some(96),
            diagnoses: Some(vec!["p220".to_string(), "p291".to_string()]),
            ..newborn()
        };
        assert_eq!(evaluate(&rules, &lists(), &long), vec![ServiceCode::new("LONG")]);

        let short = HospitalizationCase {
            ventilation_hours: Some(95),
            ..long.clone()
        };
        assert_eq!(evaluate(&rules, &lists(), &short), vec![ServiceCode::new("OTHER")]);

        let operated = HospitalizationCase {
            procedures: Some(ProcedureList::new(vec!["5t061".to_string()])),
            ..long
        };
        assert!(evaluate(&rules, &lists(), &operated).is_empty());
    }

    #[test]
    fn emergency_delivery_sentinel() {
        let rules = [rule("", Some(NewbornCriterion::EmergencyDelivery), "S05-08")];
        let case = HospitalizationCase {
            procedures: Some(ProcedureList::without_principal(vec!["93083".to_string()])),
            ..newborn()
        };
        assert_eq!(evaluate(&rules, &lists(), &case).len(), 1);
    }
}
