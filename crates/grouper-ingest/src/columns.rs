//! Column layout of the case files.

/// Input columns in file order. The input file has no header row.
pub const INPUT_COLUMNS: [&str; 9] = [
    "id",
    "vek",
    "vek_dni",
    "hmotnost",
    "umela_plucna_ventilacia",
    "diagnozy",
    "vykony",
    "odbornosti",
    "drg",
];

/// Output-only column holding the assigned services.
pub const SERVICES_COLUMN: &str = "ms";

pub const DELIMITER: u8 = b';';

/// Separator inside the diagnosis, procedure, specialty and service lists.
pub const LIST_SEPARATOR: char = '~';

/// Value of the services column for a rejected row.
pub const ERROR_MARKER: &str = "ERROR";

pub fn output_columns() -> impl Iterator<Item = &'static str> {
    INPUT_COLUMNS
        .into_iter()
        .chain(std::iter::once(SERVICES_COLUMN))
}
