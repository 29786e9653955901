use std::path::PathBuf;
use std::sync::OnceLock;

use grouper_model::{HospitalizationCase, ProcedureList, normalize_code};
use grouper_standards::{ReferenceStore, RuleBook};

pub fn sample_rule_book() -> &'static RuleBook {
    static BOOK: OnceLock<RuleBook> = OnceLock::new();
    BOOK.get_or_init(|| {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata/annexes");
        let store = ReferenceStore::load_dir(&dir).expect("load sample annexes");
        RuleBook::compile(&store).expect("compile sample rule book")
    })
}

pub fn codes(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|code| normalize_code(code)).collect()
}

pub fn adult(diagnoses: &[&str], procedures: &[&str]) -> HospitalizationCase {
    HospitalizationCase {
        age_years: Some(25),
        diagnoses: Some(codes(diagnoses)),
        procedures: Some(ProcedureList::new(codes(procedures))),
        ..HospitalizationCase::new("A")
    }
}
