use std::collections::BTreeSet;
use std::path::PathBuf;

use grouper_annex::Assignment;
use grouper_ingest::{FieldError, RowOutcome};
use grouper_model::{Annex, ServiceCode};
use serde::Serialize;

/// What the pipeline produced for one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowResult {
    Grouped {
        assignment: Assignment,
        /// Fields lenient validation replaced with "unknown".
        defaulted_fields: usize,
    },
    Rejected(FieldError),
}

impl RowResult {
    pub fn outcome(&self) -> RowOutcome {
        match self {
            Self::Grouped { assignment, .. } => RowOutcome::Services(assignment.services.clone()),
            Self::Rejected(_) => RowOutcome::Rejected,
        }
    }
}

/// Cases and services contributed by one annex over a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnexHits {
    pub annex: Annex,
    pub label: &'static str,
    pub description: &'static str,
    pub cases: usize,
    pub services: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub rejected_rows: usize,
    pub rows_with_services: usize,
    pub defaulted_fields: usize,
    pub distinct_services: usize,
    pub annexes: Vec<AnnexHits>,
}

impl GroupSummary {
    pub fn from_results(input: PathBuf, output: PathBuf, results: &[RowResult]) -> Self {
        let mut annexes: Vec<AnnexHits> = Annex::ALL
            .iter()
            .map(|annex| AnnexHits {
                annex: *annex,
                label: annex.label(),
                description: annex.description(),
                cases: 0,
                services: 0,
            })
            .collect();
        let mut distinct = BTreeSet::new();
        let mut rejected_rows = 0;
        let mut rows_with_services = 0;
        let mut defaulted = 0;

        for result in results {
            let (assignment, defaulted_fields) = match result {
                RowResult::Rejected(_) => {
                    rejected_rows += 1;
                    continue;
                }
                RowResult::Grouped {
                    assignment,
                    defaulted_fields,
                } => (assignment, defaulted_fields),
            };
            defaulted += defaulted_fields;
            if !assignment.services.is_empty() {
                rows_with_services += 1;
            }
            distinct.extend(assignment.services.iter().map(ServiceCode::as_str));
            for contribution in &assignment.contributions {
                if let Some(hits) = annexes.iter_mut().find(|h| h.annex == contribution.annex) {
                    hits.cases += 1;
                    hits.services += contribution.services.len();
                }
            }
        }

        Self {
            input,
            output,
            rows: results.len(),
            rejected_rows,
            rows_with_services,
            defaulted_fields: defaulted,
            distinct_services: distinct.len(),
            annexes,
        }
    }
}
