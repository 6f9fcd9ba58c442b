use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use censo_model::Coordination;

use crate::types::{CensusOverview, ReportResult, SpecialtySummary};

pub fn print_report_summary(result: &ReportResult) {
    println!("Report: {}", result.kind);
    println!("Date: {}", result.report_date);
    println!("Output: {}", result.output.display());
    let mut table = specialty_table(&result.specialties);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} sheet(s)", result.sheets))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_overview(overview: &CensusOverview) {
    println!("Patients detected: {}", overview.patients);
    let skipped = &overview.skipped;
    if skipped.dropped() > 0 {
        println!(
            "Rows skipped: {} noise, {} short, {} without valid registry",
            skipped.noise, skipped.short, skipped.inadmissible
        );
    }
    if overview.specialties.is_empty() {
        println!("No specialties found.");
        return;
    }
    let table = specialty_table(&overview.specialties);
    println!("{table}");
}

fn specialty_table(specialties: &[SpecialtySummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Coordination"),
        header_cell("Specialty"),
        header_cell("Patients"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut previous: Option<Coordination> = None;
    for summary in specialties {
        let coordination_cell = if previous == Some(summary.coordination) {
            dim_cell("")
        } else {
            coordination_cell(summary.coordination)
        };
        previous = Some(summary.coordination);
        table.add_row(vec![
            coordination_cell,
            Cell::new(&summary.specialty),
            Cell::new(summary.patients),
        ]);
    }
    table
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn coordination_cell(coordination: Coordination) -> Cell {
    let cell = Cell::new(coordination.title()).add_attribute(Attribute::Bold);
    if coordination.is_therapy() {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
