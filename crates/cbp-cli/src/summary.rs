//! Console summary of a validation run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cbp_model::{Finding, Severity};
use cbp_report::{FileSummary, RunSummary};

pub fn print_summary(findings: &[Finding], show_info: bool) {
    let summary = RunSummary::from_findings(findings);
    println!("{}", summary_table(&summary));
    let listing = findings_listing(findings, show_info);
    if !listing.is_empty() {
        println!();
        print!("{listing}");
    }
    println!();
    println!("Validation status: {}", summary.status);
}

/// Per-file counts with a TOTAL row.
pub fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Infos"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..=3 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for file in &summary.files {
        table.add_row(file_row(file));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(summary.totals.errors, Color::Red).add_attribute(Attribute::Bold),
        count_cell(summary.totals.warnings, Color::Yellow).add_attribute(Attribute::Bold),
        Cell::new(summary.totals.infos).add_attribute(Attribute::Bold),
    ]);
    table
}

/// One line per WARNING and ERROR finding; INFO lines too when `show_info`.
pub fn findings_listing(findings: &[Finding], show_info: bool) -> String {
    let threshold = if show_info {
        Severity::Info
    } else {
        Severity::Warning
    };
    let mut out = String::new();
    for finding in findings.iter().filter(|f| f.severity >= threshold) {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    out
}

fn file_row(file: &FileSummary) -> Vec<Cell> {
    vec![
        Cell::new(&file.file).fg(Color::Blue),
        count_cell(file.counts.errors, Color::Red),
        count_cell(file.counts.warnings, Color::Yellow),
        dim_cell(file.counts.infos),
    ]
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
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
