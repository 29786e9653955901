use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use grouper_cli::types::{AnnexHits, GroupSummary};

pub fn print_summary(summary: &GroupSummary) {
    println!("Input: {}", summary.input.display());
    println!("Output: {}", summary.output.display());

    let mut totals = Table::new();
    totals.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_summary_table_style(&mut totals);
    align_column(&mut totals, 1, CellAlignment::Right);
    totals.add_row(vec![Cell::new("Cases"), Cell::new(summary.rows)]);
    totals.add_row(vec![
        Cell::new("Rejected"),
        count_cell(summary.rejected_rows, Color::Red),
    ]);
    totals.add_row(vec![
        Cell::new("Fields treated as unknown"),
        count_cell(summary.defaulted_fields, Color::Yellow),
    ]);
    totals.add_row(vec![
        Cell::new("With services"),
        Cell::new(summary.rows_with_services),
    ]);
    totals.add_row(vec![
        Cell::new("Distinct services"),
        Cell::new(summary.distinct_services),
    ]);
    println!("{totals}");

    println!("{}", annex_table(&summary.annexes));
}

fn annex_table(annexes: &[AnnexHits]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Annex"),
        header_cell("Rule"),
        header_cell("Cases"),
        header_cell("Services"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for hits in annexes {
        table.add_row(vec![
            Cell::new(hits.label).fg(Color::Cyan),
            Cell::new(hits.description),
            count_cell(hits.cases, Color::Green),
            count_cell(hits.services, Color::Green),
        ]);
    }
    let cases: usize = annexes.iter().map(|hits| hits.cases).sum();
    let services: usize = annexes.iter().map(|hits| hits.services).sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(cases).add_attribute(Attribute::Bold),
        Cell::new(services).add_attribute(Attribute::Bold),
    ]);
    table
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
