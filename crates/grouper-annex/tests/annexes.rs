mod common;

use grouper_annex::assign_services;
use grouper_model::{Annex, HospitalizationCase, PrincipalMode, ProcedureList, ServiceCode};
use proptest::prelude::*;

use common::{adult, codes, sample_rule_book};

fn services(raw: &[&str]) -> Vec<ServiceCode> {
    raw.iter().map(|code| ServiceCode::new(*code)).collect()
}

#[test]
fn newborn_below_viability_without_drg() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        age_years: Some(0),
        age_days: Some(5),
        weight_grams: Some(450),
        ventilation_hours: Some(0),
        diagnoses: Some(codes(&["S02.1", "S02.2"])),
        ..HospitalizationCase::new("id1")
    };

    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S05-03"]));
}

#[test]
fn heavy_newborn_without_procedures_gets_nothing() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        age_years: Some(0),
        age_days: Some(10),
        weight_grams: Some(2000),
        diagnoses: Some(codes(&["P59.9"])),
        ..HospitalizationCase::new("id2")
    };
    assert!(assign_services(&case, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());
}

#[test]
fn newborn_with_drg_gets_drg_and_criterion_rows() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        age_years: Some(0),
        age_days: Some(3),
        weight_grams: Some(3100),
        ventilation_hours: Some(120),
        diagnoses: Some(codes(&["P22.0", "P29.1"])),
        drg: Some("p62a".to_string()),
        ..HospitalizationCase::new("id3")
    };
    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S05-10"]));
}

#[test]
fn older_infant_skips_newborn_annex() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        age_years: Some(0),
        age_days: Some(40),
        weight_grams: Some(450),
        drg: Some("p67d".to_string()),
        ..HospitalizationCase::new("id4")
    };
    assert!(assign_services(&case, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());
}

#[test]
fn adult_procedure_with_diagnosis_group() {
    let book = sample_rule_book();
    let case = adult(&["C15.1"], &["5T06.1", "5T07.0"]);

    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S08-01", "S09-11", "S13-01"]));
}

#[test]
fn swapped_procedures_lose_annex_9_in_default_mode() {
    let book = sample_rule_book();
    let case = adult(&["C15.1"], &["5T07.0", "5T06.1"]);

    let default = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert!(default.services.is_empty());

    let combinatorial = assign_services(&case, book, PrincipalMode::Combinatorial);
    assert_eq!(
        combinatorial.services,
        services(&["S08-01", "S09-11", "S13-01"])
    );
}

#[test]
fn unflagged_principal_needs_combinatorial_mode() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        procedures: Some(ProcedureList::without_principal(codes(&["5T06.1"]))),
        ..adult(&["C15.1"], &[])
    };
    assert!(assign_services(&case, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());
    assert_eq!(
        assign_services(&case, book, PrincipalMode::Combinatorial).services,
        services(&["S09-11", "S13-01"])
    );
}

#[test]
fn service_indirection_group_uses_annex_15_diagnoses() {
    let book = sample_rule_book();
    let case = adult(&["I21.1"], &["5T08.0"]);
    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S09-13", "S15-01"]));
}

#[test]
fn explicit_diagnosis_list_expands_ranges() {
    let book = sample_rule_book();
    let inside = adult(&["I10", "C20"], &["5T09.0"]);
    assert_eq!(
        assign_services(&inside, book, PrincipalMode::PrincipalOnly).services,
        services(&["S09-21"])
    );
    let outside = adult(&["C27"], &["5T09.0"]);
    assert!(assign_services(&outside, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());
}

#[test]
fn polytrauma_requires_drg() {
    let book = sample_rule_book();
    let mut case = adult(&["S06.4"], &[]);
    case.procedures = None;
    assert!(assign_services(&case, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());

    case.drg = Some("w01b".to_string());
    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S02-11"]));
    assert_eq!(assignment.contributions[0].annex, Annex::DrgPolytrauma);
}

#[test]
fn child_tables_are_used_up_to_eighteen() {
    let book = sample_rule_book();
    let mut case = adult(&["Q20.1"], &["5A10.10", "5A20.20"]);
    case.age_years = Some(18);
    let assignment = assign_services(&case, book, PrincipalMode::PrincipalOnly);
    assert_eq!(assignment.services, services(&["S07-01", "S09-01", "S12-01"]));
}

#[test]
fn radiology_requires_specialty() {
    let book = sample_rule_book();
    let mut case = adult(&["I10"], &["3A20.20"]);
    assert!(assign_services(&case, book, PrincipalMode::PrincipalOnly)
        .services
        .is_empty());
    case.specialties = Some(vec!["023".to_string()]);
    assert_eq!(
        assign_services(&case, book, PrincipalMode::PrincipalOnly).services,
        services(&["S11-11"])
    );
}

#[test]
fn diagnosis_pair_and_principal_diagnosis() {
    let book = sample_rule_book();
    let mut case = adult(&["I21.0", "E10.5"], &[]);
    case.procedures = None;
    assert_eq!(
        assign_services(&case, book, PrincipalMode::PrincipalOnly).services,
        services(&["S10-01", "S15-01"])
    );
}

#[test]
fn organ_donor_without_age() {
    let book = sample_rule_book();
    let case = HospitalizationCase {
        diagnoses: Some(codes(&["I61.0", "R40.2", "G93.6"])),
        ..HospitalizationCase::new("donor")
    };
    assert_eq!(
        assign_services(&case, book, PrincipalMode::PrincipalOnly).services,
        services(&["S17-22"])
    );
}

const PROCEDURE_POOL: &[&str] = &[
    "5T06.1", "5T06.2", "5T07.0", "5T07.1", "5T08.0", "5T09.0", "5A10.10", "5A20.20", "3A20.20",
    "3A10.10", "1X00.0",
];
const DIAGNOSIS_POOL: &[&str] = &["C15.1", "C20", "I21.0", "I21.1", "I25.9", "E10.5", "Q20.1"];

proptest! {
    #[test]
    fn combinatorial_mode_never_loses_services(
        age in 0u32..90,
        procedure_idx in prop::collection::vec(0..PROCEDURE_POOL.len(), 0..5),
        diagnosis_idx in prop::collection::vec(0..DIAGNOSIS_POOL.len(), 0..4),
        has_principal in any::<bool>(),
    ) {
        let book = sample_rule_book();
        let procedures: Vec<&str> = procedure_idx.iter().map(|&i| PROCEDURE_POOL[i]).collect();
        let diagnoses: Vec<&str> = diagnosis_idx.iter().map(|&i| DIAGNOSIS_POOL[i]).collect();
        let list = if has_principal {
            ProcedureList::new(codes(&procedures))
        } else {
            ProcedureList::without_principal(codes(&procedures))
        };
        let case = HospitalizationCase {
            age_years: Some(age),
            diagnoses: Some(codes(&diagnoses)),
            procedures: Some(list),
            specialties: Some(vec!["023".to_string()]),
            ..HospitalizationCase::new("P")
        };

        let default = assign_services(&case, book, PrincipalMode::PrincipalOnly);
        let combinatorial = assign_services(&case, book, PrincipalMode::Combinatorial);
        for service in &default.services {
            prop_assert!(combinatorial.services.contains(service));
        }
    }

    #[test]
    fn output_has_no_duplicates(
        procedure_idx in prop::collection::vec(0..PROCEDURE_POOL.len(), 0..6),
        diagnosis_idx in prop::collection::vec(0..DIAGNOSIS_POOL.len(), 0..5),
    ) {
        let book = sample_rule_book();
        let procedures: Vec<&str> = procedure_idx.iter().map(|&i| PROCEDURE_POOL[i]).collect();
        let diagnoses: Vec<&str> = diagnosis_idx.iter().map(|&i| DIAGNOSIS_POOL[i]).collect();
        let case = adult(&diagnoses, &procedures);
        let services = assign_services(&case, book, PrincipalMode::Combinatorial).services;
        let mut unique = services.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), services.len());
    }
}
