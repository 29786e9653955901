//! Code normalization shared by case preparation and reference-table loading.
//!
//! Diagnosis, procedure and DRG codes arrive in many spellings (`S02.1`,
//! `s021`, `5T06.1&B`). Every comparison in the engine happens on the
//! normalized form: ASCII letters and digits only, lower case.

/// Separator between a procedure code and its qualifier (`5t061&b`).
pub const QUALIFIER_SEPARATOR: char = '&';

/// Canonicalize a raw code string.
///
/// Removes every character that is not an ASCII letter or digit and
/// lower-cases the rest. Idempotent; empty input yields an empty string.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Drop a trailing `&qualifier` from a reported procedure code.
pub fn strip_qualifier(raw: &str) -> &str {
    raw.split(QUALIFIER_SEPARATOR).next().unwrap_or_default()
}

/// Normalize a comma-separated code list, keeping range dashes.
///
/// `"C15 - 26, D1.0"` becomes `["c15-26", "d10"]`. Empty entries are dropped.
pub fn normalize_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| {
            entry
                .split('-')
                .map(normalize_code)
                .collect::<Vec<_>>()
                .join("-")
        })
        .filter(|entry| !entry.is_empty() && entry != "-")
        .collect()
}
