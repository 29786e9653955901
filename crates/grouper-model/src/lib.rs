pub mod case;
pub mod code;
pub mod criteria;
pub mod error;
pub mod options;
pub mod service;

pub use case::{AgeBand, HospitalizationCase, ProcedureList};
pub use code::{normalize_code, normalize_code_list, strip_qualifier};
pub use criteria::{DiagnosisScope, DrgDiagnosisCriterion, NewbornCriterion};
pub use error::{ModelError, Result};
pub use options::{GroupingOptions, PrincipalMode, ValidationMode};
pub use service::{Annex, ServiceCode};
