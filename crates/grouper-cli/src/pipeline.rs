//! Stages of a grouping run: load annexes, read rows, group them on a
//! worker pool, write the result file.

use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result, bail};
use grouper_annex::assign_services;
use grouper_ingest::{RawCase, prepare_case, read_cases, write_results};
use grouper_model::GroupingOptions;
use grouper_standards::{ReferenceStore, RuleBook};
use tracing::{debug, warn};

use crate::logging::redact_value;
use crate::types::RowResult;

/// Load the annex tables and compile them.
pub fn load_rule_book(annex_dir: &Path) -> Result<(ReferenceStore, RuleBook)> {
    let store = ReferenceStore::load_dir(annex_dir)
        .with_context(|| format!("load annex tables from {}", annex_dir.display()))?;
    let book = RuleBook::compile(&store).context("compile annex rules")?;
    Ok((store, book))
}

pub fn read_input(path: &Path) -> Result<Vec<RawCase>> {
    read_cases(path).with_context(|| format!("read cases from {}", path.display()))
}

pub fn default_jobs() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Validate, prepare and group a single row.
pub fn group_row(raw: &RawCase, book: &RuleBook, options: GroupingOptions) -> RowResult {
    let prepared = match prepare_case(raw, options.validation_mode) {
        Ok(prepared) => prepared,
        Err(error) => {
            warn!(line = raw.line, id = redact_value(raw.id()), %error, "row rejected");
            return RowResult::Rejected(error);
        }
    };
    let id = redact_value(&prepared.case.id);
    if prepared.generated_id {
        warn!(line = raw.line, id, "empty identifier replaced");
    }
    for issue in &prepared.issues {
        if issue.field() == "id" {
            continue;
        }
        warn!(line = raw.line, id, %issue, "field treated as unknown");
    }
    let assignment = assign_services(&prepared.case, book, options.principal_mode);
    debug!(line = raw.line, id, services = assignment.services.len(), "row grouped");
    RowResult::Grouped {
        assignment,
        defaulted_fields: prepared.issues.len(),
    }
}

/// Group every row on `jobs` worker threads; results come back in input order.
pub fn group_rows(
    rows: &[RawCase],
    book: &RuleBook,
    options: GroupingOptions,
    jobs: NonZeroUsize,
) -> Result<Vec<RowResult>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let workers = jobs.get().min(rows.len());
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, RowResult)>();
    for index in 0..rows.len() {
        job_tx.send(index).context("queue row")?;
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for index in job_rx {
                    let result = group_row(&rows[index], book, options);
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<RowResult>> = Vec::new();
    slots.resize_with(rows.len(), || None);
    for (index, result) in result_rx {
        slots[index] = Some(result);
    }
    let results: Vec<RowResult> = slots.into_iter().flatten().collect();
    if results.len() != rows.len() {
        bail!(
            "grouped {} of {} rows; a worker stopped early",
            results.len(),
            rows.len()
        );
    }
    Ok(results)
}

pub fn write_output(path: &Path, rows: &[RawCase], results: &[RowResult]) -> Result<()> {
    let outcomes: Vec<_> = results.iter().map(RowResult::outcome).collect();
    write_results(path, rows.iter().zip(&outcomes))
        .with_context(|| format!("write results to {}", path.display()))
}
