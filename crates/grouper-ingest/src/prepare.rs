//! Turning raw rows into prepared cases.

use std::str::FromStr;

use grouper_model::{
    HospitalizationCase, ProcedureList, ValidationMode, normalize_code, strip_qualifier,
};
use uuid::Uuid;

use crate::columns::LIST_SEPARATOR;
use crate::error::FieldError;
use crate::reader::RawCase;

const ID: usize = 0;
const AGE: usize = 1;
const AGE_DAYS: usize = 2;
const WEIGHT: usize = 3;
const VENTILATION: usize = 4;
const DIAGNOSES: usize = 5;
const PROCEDURES: usize = 6;
const SPECIALTIES: usize = 7;
const DRG: usize = 8;

/// A case ready for grouping plus the fields lenient validation had to drop.
#[derive(Debug, Clone)]
pub struct PreparedCase {
    pub case: HospitalizationCase,
    pub issues: Vec<FieldError>,
    /// Set when the identifier was empty and one was generated.
    pub generated_id: bool,
}

/// Validate a raw row and build its case.
///
/// Strict validation rejects the row on the first unusable required field.
/// Lenient validation replaces an empty identifier with a random one and
/// unusable fields with `None`, reporting each in [`PreparedCase::issues`].
pub fn prepare_case(raw: &RawCase, mode: ValidationMode) -> Result<PreparedCase, FieldError> {
    let mut issues = Vec::new();
    let mut tolerate = |error: FieldError| match mode {
        ValidationMode::Strict => Err(error),
        ValidationMode::Lenient => {
            issues.push(error);
            Ok(())
        }
    };

    let mut generated_id = false;
    let id = match raw.field(ID).trim() {
        "" => {
            tolerate(FieldError::Missing { field: "id" })?;
            generated_id = true;
            Uuid::new_v4().simple().to_string()
        }
        id => id.to_string(),
    };

    let age_years = required_int::<u32>(raw, AGE, &mut tolerate)?;
    let age_days = match raw.field(AGE_DAYS).trim() {
        "" => None,
        _ => required_int::<u32>(raw, AGE_DAYS, &mut tolerate)?,
    };
    let weight_grams = required_int::<i64>(raw, WEIGHT, &mut tolerate)?;
    let ventilation_hours = required_int::<i64>(raw, VENTILATION, &mut tolerate)?;

    let diagnoses = split_positional(raw.field(DIAGNOSES), normalize_code);
    let diagnoses = if diagnoses.iter().all(String::is_empty) {
        tolerate(FieldError::Missing { field: "diagnozy" })?;
        None
    } else {
        Some(diagnoses)
    };

    let case = HospitalizationCase {
        age_years,
        age_days,
        weight_grams,
        ventilation_hours,
        diagnoses,
        procedures: prepare_procedures(raw.field(PROCEDURES)),
        specialties: Some(split_codes(raw.field(SPECIALTIES), normalize_code)),
        drg: Some(normalize_code(raw.field(DRG))),
        ..HospitalizationCase::new(id)
    };
    Ok(PreparedCase {
        case,
        issues,
        generated_id,
    })
}

fn required_int<T: FromStr>(
    raw: &RawCase,
    index: usize,
    tolerate: &mut impl FnMut(FieldError) -> Result<(), FieldError>,
) -> Result<Option<T>, FieldError> {
    let field = crate::columns::INPUT_COLUMNS[index];
    let value = raw.field(index).trim();
    let error = if value.is_empty() {
        FieldError::Missing { field }
    } else {
        match value.parse::<T>() {
            Ok(parsed) => return Ok(Some(parsed)),
            Err(_) => FieldError::NotInteger {
                field,
                value: value.to_string(),
            },
        }
    };
    tolerate(error)?;
    Ok(None)
}

/// `~`-separated procedures; an empty first entry means no principal was reported.
fn prepare_procedures(raw: &str) -> Option<ProcedureList> {
    let mut codes = split_positional(raw, |code| normalize_code(strip_qualifier(code)));
    if codes.first().is_some_and(String::is_empty) {
        codes.remove(0);
        Some(ProcedureList::without_principal(codes))
    } else {
        Some(ProcedureList::new(codes))
    }
}

/// Like [`split_codes`], but position 0 is kept even when empty.
fn split_positional(raw: &str, normalize: impl Fn(&str) -> String) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(normalize)
        .enumerate()
        .filter(|(position, code)| *position == 0 || !code.is_empty())
        .map(|(_, code)| code)
        .collect()
}

fn split_codes(raw: &str, normalize: impl Fn(&str) -> String) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(normalize)
        .filter(|code| !code.is_empty())
        .collect()
}
