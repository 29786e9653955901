#![deny(unsafe_code)]

pub mod codes;
pub mod csv_utils;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod rulebook;
pub mod schema;
pub mod store;

pub use crate::error::StandardsError;
pub use crate::paths::{ANNEX_DIR_ENV_VAR, DEFAULT_ANNEX_DIR, annex_root};
pub use crate::rulebook::{AgeBanded, ORGAN_DONOR_SERVICE, RuleBook};
pub use crate::store::{ReferenceStore, ReferenceTable, TableSource};
