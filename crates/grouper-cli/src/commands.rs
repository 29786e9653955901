use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use grouper_cli::pipeline::{default_jobs, group_rows, load_rule_book, read_input, write_output};
use grouper_cli::types::GroupSummary;
use grouper_ingest::output_path_for;
use grouper_standards::annex_root;

use crate::cli::{GroupArgs, TablesArgs};
use crate::summary::apply_table_style;

/// Hex digits of a table digest shown by `tables`.
const DIGEST_PREFIX_LEN: usize = 12;

pub fn run_group(args: &GroupArgs) -> Result<GroupSummary> {
    let input = &args.input;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(input));
    let options = args.grouping_options();
    let jobs = args.jobs.unwrap_or_else(default_jobs);
    let run_span = info_span!("group", input = %input.display());
    let _run_guard = run_span.enter();

    let annex_dir = annex_root(args.annex_dir.as_deref());
    let load_span = info_span!("load_annexes", dir = %annex_dir.display());
    let load_start = Instant::now();
    let (store, book) = load_span.in_scope(|| load_rule_book(&annex_dir))?;
    info!(
        tables = store.tables().count(),
        rules = book.rule_count(),
        rule_book = store.rule_book_pin().unwrap_or("-"),
        duration_ms = load_start.elapsed().as_millis(),
        "annex tables loaded"
    );

    let read_start = Instant::now();
    let rows = info_span!("read").in_scope(|| read_input(input))?;
    info!(
        rows = rows.len(),
        duration_ms = read_start.elapsed().as_millis(),
        "cases read"
    );

    let group_start = Instant::now();
    let results = info_span!("evaluate", jobs = jobs.get())
        .in_scope(|| group_rows(&rows, &book, options, jobs))?;
    info!(
        rows = results.len(),
        principal_mode = ?options.principal_mode,
        validation_mode = ?options.validation_mode,
        duration_ms = group_start.elapsed().as_millis(),
        "cases grouped"
    );

    let write_start = Instant::now();
    info_span!("write", output = %output.display())
        .in_scope(|| write_output(&output, &rows, &results))?;
    info!(
        duration_ms = write_start.elapsed().as_millis(),
        "results written"
    );

    let summary = GroupSummary::from_results(input.clone(), output, &results);
    if let Some(path) = &args.report {
        write_report(path, &summary)?;
    }
    Ok(summary)
}

fn write_report(path: &Path, summary: &GroupSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    info!(path = %path.display(), "run report written");
    Ok(())
}

pub fn run_tables(args: &TablesArgs) -> Result<()> {
    let annex_dir = annex_root(args.annex_dir.as_deref());
    let (store, book) = load_rule_book(&annex_dir)?;

    println!("Annexes: {}", annex_dir.display());
    if let Some(pin) = store.rule_book_pin() {
        println!("Rule book: {pin}");
    }
    println!("Compiled rules: {}", book.rule_count());

    let mut tables = Table::new();
    tables.set_header(vec!["Table", "Rows", "Columns", "SHA-256"]);
    apply_table_style(&mut tables);
    for table in store.tables() {
        let digest = store
            .source(table.name())
            .map(|source| source.sha256.chars().take(DIGEST_PREFIX_LEN).collect::<String>())
            .unwrap_or_else(|| "-".to_string());
        tables.add_row(vec![
            table.name().to_string(),
            table.len().to_string(),
            table.columns().join(", "),
            digest,
        ]);
    }
    println!("{tables}");

    let mut lists = Table::new();
    lists.set_header(vec!["Derived list", "Codes"]);
    apply_table_style(&mut lists);
    for (name, codes) in store.lists() {
        lists.add_row(vec![name.to_string(), codes.len().to_string()]);
    }
    println!("{lists}");
    Ok(())
}
