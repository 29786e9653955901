//! Annex evaluators.
//!
//! Each evaluator is a pure function of the case fields it needs and the
//! compiled [`RuleBook`](grouper_standards::RuleBook). The aggregator decides
//! which evaluators apply to a case and merges their output.

pub mod aggregator;
pub mod combination;
pub mod diagnosis_group;
pub mod diagnosis_pair;
pub mod matching;
pub mod newborn;
pub mod organ_donor;
pub mod polytrauma;
pub mod principal_diagnosis;
pub mod procedure;
pub mod radiology;

pub use aggregator::{AnnexContribution, Assignment, assign_services};
