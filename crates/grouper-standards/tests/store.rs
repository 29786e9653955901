use std::fs;
use std::path::{Path, PathBuf};

use grouper_model::{AgeBand, DiagnosisScope, NewbornCriterion, ServiceCode};
use grouper_standards::hash::sha256_hex;
use grouper_standards::{ReferenceStore, RuleBook, StandardsError};

fn annex_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata/annexes")
}

/// Copy the sample rule book into a fresh temp dir so tests can mutate it.
fn copy_fixture(dir: &Path) {
    for entry in fs::read_dir(annex_fixture()).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, dir.join(path.file_name().unwrap())).unwrap();
    }
}

#[test]
fn loads_and_normalizes_sample_rule_book() {
    let store = ReferenceStore::load_dir(&annex_fixture()).expect("load annexes");

    let p13 = store.table("p13").expect("p13 table");
    let codes: Vec<&str> = p13.column_values("kod_hlavneho_vykonu").collect();
    assert_eq!(codes, vec!["5t061"]);
    // Service codes are kept as written.
    let services: Vec<&str> = p13.column_values("kod_ms").collect();
    assert_eq!(services, vec!["S13-01"]);

    assert_eq!(
        store.list("p5_signifikantne_OP_vykony").unwrap(),
        ["5t061".to_string(), "5a1010".to_string()]
    );
    assert_eq!(store.list("p16_koma_diagnozy").unwrap(), ["r402".to_string()]);
    assert!(store.rule_book_pin().is_none());
}

#[test]
fn unrecognized_tables_stay_reachable_by_name() {
    let store = ReferenceStore::load_dir(&annex_fixture()).unwrap();
    let p17 = store.table("p17").expect("generic table");
    // Not a known table, so nothing is normalized.
    assert_eq!(p17.column_values("kod_hlavneho_vykonu").next(), Some("5X99.0"));
}

#[test]
fn fingerprints_every_loaded_file() {
    let store = ReferenceStore::load_dir(&annex_fixture()).unwrap();
    let source = store.source("p10_DD").expect("p10_DD source");
    let bytes = fs::read(&source.path).unwrap();
    assert_eq!(source.sha256, sha256_hex(&bytes));
}

#[test]
fn missing_required_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::remove_file(dir.path().join("p10_DD.csv")).unwrap();

    let err = ReferenceStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::MissingTable { ref table } if table == "p10_DD"));
}

#[test]
fn missing_optional_table_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::remove_file(dir.path().join("p9_VD_zoznam_dospeli.csv")).unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    let book = RuleBook::compile(&store).unwrap();
    assert!(book.diagnosis_list.adult.is_empty());
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::write(dir.path().join("p12.csv"), "vykon;kod_ms\n5A10.10;S12-01\n").unwrap();

    let err = ReferenceStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        StandardsError::MissingColumn { ref table, ref column }
            if table == "p12" && column == "kod_hlavneho_vykonu"
    ));
}

#[test]
fn manifest_pins_are_verified() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    let p12 = fs::read(dir.path().join("p12.csv")).unwrap();
    let manifest = format!(
        r#"[manifest]
schema = "grouper.annex-manifest"
schema_version = 1

[pins]
rule_book = "531/2023 Z. z."

[[files]]
path = "p12.csv"
sha256 = "{}"
"#,
        sha256_hex(&p12)
    );
    fs::write(dir.path().join("manifest.toml"), manifest).unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.rule_book_pin(), Some("531/2023 Z. z."));

    fs::write(dir.path().join("p12.csv"), "kod_hlavneho_vykonu;kod_ms\n1;S\n").unwrap();
    let err = ReferenceStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::Sha256Mismatch { .. }));
}

#[test]
fn rule_book_parses_criteria_and_groups() {
    let store = ReferenceStore::load_dir(&annex_fixture()).unwrap();
    let book = RuleBook::compile(&store).expect("compile rule book");

    let viability = &book.newborn[2];
    assert_eq!(viability.drg_prefix, "");
    assert_eq!(
        viability.criterion,
        Some(NewbornCriterion::BelowViabilityThreshold)
    );
    assert_eq!(viability.service, ServiceCode::new("S05-03"));
    assert!(book.newborn_lists.viability.contains("93082"));

    let groups = &book.procedure_combination.get(AgeBand::Adult).secondary_groups;
    let s08 = groups.get(&ServiceCode::new("S08-01")).unwrap();
    assert!(s08.contains("5t070") && s08.contains("5t071"));

    let list = &book.diagnosis_list.adult[0];
    assert_eq!(list.prefixes.len(), 13);
    assert_eq!(list.prefixes.last().map(String::as_str), Some("d371"));
}

#[test]
fn service_name_indirection_is_resolved_per_age_band() {
    let store = ReferenceStore::load_dir(&annex_fixture()).unwrap();
    let book = RuleBook::compile(&store).unwrap();

    let adult = book.diagnosis_group.adult.group("D4").unwrap();
    assert_eq!(adult.entries[0].scope, DiagnosisScope::Principal);
    assert_eq!(adult.entries[0].prefixes, vec!["i210", "i211"]);
    assert_eq!(adult.entries[1].scope, DiagnosisScope::Secondary);

    // S15-01 only exists in the adult table.
    let child = book.diagnosis_group.child.group("D4").unwrap();
    assert!(child.entries[0].prefixes.is_empty());
}

#[test]
fn unknown_criterion_name_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::write(
        dir.path().join("p5_NOV.csv"),
        "drg;doplnujuce_kriterium;kod_ms\nP60;Neznáme kritérium;S05-99\n",
    )
    .unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    let err = RuleBook::compile(&store).unwrap_err();
    assert!(matches!(err, StandardsError::UnrecognizedCriterion { .. }));
}

#[test]
fn unresolvable_service_reference_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::write(
        dir.path().join("p9_skupiny_diagnoz.csv"),
        "skupina_diagnoz;rozsah;kod_diagnozy;popis\nD1;h;Q20;x\nD2;h;C15;x\nD3;a;I25;x\nD4;h;Vz;podľa „S99-99“\n",
    )
    .unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    let err = RuleBook::compile(&store).unwrap_err();
    assert!(matches!(err, StandardsError::UnresolvedServiceGroup { .. }));
}

#[test]
fn malformed_code_range_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::write(
        dir.path().join("p9_VD_zoznam_dospeli.csv"),
        "kod_hlavneho_vykonu;zoznam_diagnoz;kod_ms\n5T09.0;C26-15;S09-21\n",
    )
    .unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    let err = RuleBook::compile(&store).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidCodeRange { .. }));
}

#[test]
fn oversized_code_range_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture(dir.path());
    fs::write(
        dir.path().join("p9_VD_zoznam_dospeli.csv"),
        "kod_hlavneho_vykonu;zoznam_diagnoz;kod_ms\n5T09.0;C0000000-9999999;S09-21\n",
    )
    .unwrap();

    let store = ReferenceStore::load_dir(dir.path()).unwrap();
    let err = RuleBook::compile(&store).unwrap_err();
    assert!(matches!(
        err,
        StandardsError::InvalidCodeRange { ref entry, .. } if entry == "c0000000-9999999"
    ));
}

#[test]
fn table_listing_snapshot() {
    let store = ReferenceStore::load_dir(&annex_fixture()).unwrap();
    let listing: Vec<String> = store
        .tables()
        .map(|table| format!("{} {}", table.name(), table.len()))
        .collect();
    insta::assert_snapshot!(listing.join("\n"), @r"
    p10_DD 1
    p11_deti 1
    p11_dospeli 1
    p12 1
    p13 1
    p14 1
    p15 2
    p16_koma 1
    p16_opuch_mozgu 1
    p16_vybrane_ochorenia 1
    p17 1
    p5_NOV 11
    p5_kriterium_hranica_viability 1
    p5_kriterium_nekonvencna_upv 1
    p5_kriterium_paliativna_starostlivost 1
    p5_kriterium_potreba_vymennej_transfuzie 1
    p5_kriterium_riadena_hypotermia 1
    p5_signifikantne_OP 2
    p5_tazke_problemy_u_novorodencov 3
    p6_DRGD_deti 3
    p6_DRGD_dospeli 3
    p7_VV_deti 1
    p7_vedlajsie_vykony 1
    p8_VV_dospeli 2
    p8_vedlajsie_vykony 3
    p9_VD_deti 1
    p9_VD_dospeli 3
    p9_VD_zoznam_dospeli 1
    p9_skupiny_diagnoz 6
    ");
}
