//! Runs every applicable annex evaluator for one case.

use std::collections::HashSet;

use grouper_model::{Annex, HospitalizationCase, PrincipalMode, ServiceCode};
use grouper_standards::RuleBook;
use tracing::trace;

use crate::{
    combination, diagnosis_group, diagnosis_pair, newborn, organ_donor, polytrauma,
    principal_diagnosis, procedure, radiology,
};

/// Services produced by one annex for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnexContribution {
    pub annex: Annex,
    pub services: Vec<ServiceCode>,
}

/// Result of grouping one case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Deduplicated services in order of first production.
    pub services: Vec<ServiceCode>,
    /// Raw output of every annex that produced something, in annex order.
    pub contributions: Vec<AnnexContribution>,
}

impl Assignment {
    fn push(&mut self, annex: Annex, services: Vec<ServiceCode>) {
        if services.is_empty() {
            return;
        }
        trace!(annex = annex.label(), count = services.len(), "annex matched");
        match self.contributions.last_mut() {
            Some(last) if last.annex == annex => last.services.extend(services),
            _ => self.contributions.push(AnnexContribution { annex, services }),
        }
    }

    fn finish(mut self) -> Self {
        let mut seen = HashSet::new();
        self.services = self
            .contributions
            .iter()
            .flat_map(|contribution| contribution.services.iter())
            .filter(|service| seen.insert(service.as_str()))
            .cloned()
            .collect();
        self
    }
}

/// Evaluate every annex whose required fields are present.
///
/// Annex order: 5, 6, 7/8, 9, 10, 11, 12/13, 14/15, 16.
pub fn assign_services(
    case: &HospitalizationCase,
    book: &RuleBook,
    mode: PrincipalMode,
) -> Assignment {
    let mut assignment = Assignment::default();
    let band = case.age_band();
    let diagnoses = case.diagnoses();
    let procedures = case.procedures();

    if case.is_newborn() {
        assignment.push(
            Annex::Newborn,
            newborn::evaluate(&book.newborn, &book.newborn_lists, case),
        );
    }

    if let (Some(drg), Some(band), Some(diagnoses)) = (case.drg(), band, diagnoses) {
        assignment.push(
            Annex::DrgPolytrauma,
            polytrauma::evaluate(book.drg_diagnosis.get(band), drg, diagnoses),
        );
    }

    if let (Some(band), Some(procedures)) = (band, procedures) {
        assignment.push(
            Annex::ProcedureCombination,
            combination::evaluate(book.procedure_combination.get(band), procedures, mode),
        );
    }

    if let (Some(band), Some(diagnoses), Some(procedures)) = (band, diagnoses, procedures) {
        assignment.push(
            Annex::ProcedureDiagnosisGroup,
            diagnosis_group::evaluate_groups(
                book.diagnosis_group.get(band),
                diagnoses,
                procedures,
                mode,
            ),
        );
        assignment.push(
            Annex::ProcedureDiagnosisGroup,
            diagnosis_group::evaluate_lists(
                book.diagnosis_list.get(band),
                diagnoses,
                procedures,
                mode,
            ),
        );
    }

    if let Some(principal) = case.principal_diagnosis() {
        assignment.push(
            Annex::DiagnosisPair,
            diagnosis_pair::evaluate(
                &book.diagnosis_pair,
                principal,
                case.secondary_diagnoses(),
            ),
        );
    }

    if let (Some(band), Some(procedures), Some(specialties)) =
        (band, procedures, case.specialties())
    {
        assignment.push(
            Annex::RadiologyProcedure,
            radiology::evaluate(book.radiology.get(band), procedures, specialties, mode),
        );
    }

    if let (Some(band), Some(procedures)) = (band, procedures) {
        assignment.push(
            Annex::Procedure,
            procedure::evaluate(book.procedure.get(band), procedures, mode),
        );
    }

    if let (Some(band), Some(principal)) = (band, case.principal_diagnosis()) {
        assignment.push(
            Annex::PrincipalDiagnosis,
            principal_diagnosis::evaluate(book.principal_diagnosis.get(band), principal),
        );
    }

    if let Some(diagnoses) = diagnoses {
        assignment.push(
            Annex::OrganDonor,
            organ_donor::evaluate(&book.organ_donor, diagnoses),
        );
    }

    assignment.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouper_standards::rulebook::PrincipalDiagnosisRule;

    #[test]
    fn duplicates_keep_first_position() {
        let mut book = RuleBook::default();
        book.principal_diagnosis.adult = vec![PrincipalDiagnosisRule {
            principal: "i210".to_string(),
            service: ServiceCode::new("S15-01"),
        }];
        book.diagnosis_pair = vec![grouper_standards::rulebook::DiagnosisPairRule {
            principal: "i210".to_string(),
            secondary: "e105".to_string(),
            service: ServiceCode::new("S15-01"),
        }];
        let case = HospitalizationCase {
            age_years: Some(60),
            diagnoses: Some(vec!["i210".to_string(), "e105".to_string()]),
            ..HospitalizationCase::new("A1")
        };

        let assignment = assign_services(&case, &book, PrincipalMode::PrincipalOnly);
        assert_eq!(assignment.services, vec![ServiceCode::new("S15-01")]);
        let annexes: Vec<Annex> = assignment.contributions.iter().map(|c| c.annex).collect();
        assert_eq!(annexes, vec![Annex::DiagnosisPair, Annex::PrincipalDiagnosis]);
    }

    #[test]
    fn secondary_diagnosis_never_acts_as_principal() {
        let mut book = RuleBook::default();
        book.principal_diagnosis.adult = vec![PrincipalDiagnosisRule {
            principal: "i210".to_string(),
            service: ServiceCode::new("S15-01"),
        }];
        book.diagnosis_pair = vec![grouper_standards::rulebook::DiagnosisPairRule {
            principal: "i210".to_string(),
            secondary: "i210".to_string(),
            service: ServiceCode::new("S10-01"),
        }];
        let case = HospitalizationCase {
            age_years: Some(45),
            diagnoses: Some(vec![String::new(), "i210".to_string(), "i210".to_string()]),
            ..HospitalizationCase::new("P1")
        };

        let assignment = assign_services(&case, &book, PrincipalMode::PrincipalOnly);
        assert!(assignment.services.is_empty());
    }

    #[test]
    fn empty_case_produces_nothing() {
        let assignment = assign_services(
            &HospitalizationCase::new("E"),
            &RuleBook::default(),
            PrincipalMode::Combinatorial,
        );
        assert!(assignment.services.is_empty());
        assert!(assignment.contributions.is_empty());
    }
}
