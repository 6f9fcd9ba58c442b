//! Workbook rendering with `rust_xlsxwriter`.

use censo_standards::{ReportRules, SuppliesRules};
use chrono::NaiveDate;
use rust_xlsxwriter::{
    Format, FormatAlign, FormatBorder, Table, TableColumn, TableStyle, Workbook, Worksheet,
};
use tracing::debug;

use crate::assemble::{CENSUS_COLUMNS, CensusReport};
use crate::error::Result;
use crate::length_of_stay::LengthOfStay;
use crate::supplies::{SUPPLY_COLUMNS, SuppliesReport, SupplySheet};

const CENSUS_MAX_WIDTH: usize = 50;
const CENSUS_WIDTH_PADDING: usize = 2;
const SUPPLY_MAX_WIDTH: usize = 40;
const SUPPLY_WIDTH_PADDING: usize = 4;
const FOOTER_ROW_HEIGHT: f64 = 55.0;

/// `Censo_Epidemio_DDMMYYYY.xlsx`
pub fn census_file_name(report_date: NaiveDate) -> String {
    format!("Censo_Epidemio_{}.xlsx", report_date.format("%d%m%Y"))
}

/// `Insumos_DD-MM-YYYY.xlsx`
pub fn supplies_file_name(report_date: NaiveDate) -> String {
    format!("Insumos_{}.xlsx", report_date.format("%d-%m-%Y"))
}

/// Render the general census as a single-sheet workbook with one table.
pub fn write_census_workbook(report: &CensusReport, rules: &ReportRules) -> Result<Vec<u8>> {
    let columns: &[&str] = if rules.include_length_of_stay {
        &CENSUS_COLUMNS
    } else {
        &CENSUS_COLUMNS[..CENSUS_COLUMNS.len() - 1]
    };
    let report_date = report.report_date_text();
    let grid: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                report_date.clone(),
                row.specialty.clone(),
                row.bed.clone(),
                row.registry_id.clone(),
                row.name.clone(),
                row.sex.clone(),
                row.age.clone(),
                row.diagnosis.clone(),
                row.admission_date.clone(),
            ];
            if rules.include_length_of_stay {
                cells.push(row.length_of_stay.display_with(&rules.needs_review).into_owned());
            }
            cells
        })
        .collect();

    let cell_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&rules.sheet_name)?;

    for (row_index, (cells, row)) in grid.iter().zip(&report.rows).enumerate() {
        let excel_row = row_num(row_index + 1);
        for (col, value) in (0u16..).zip(cells) {
            match (col, row.length_of_stay) {
                (9, LengthOfStay::Days(days)) => {
                    worksheet.write_number_with_format(excel_row, col, days as f64, &cell_format)?;
                }
                _ => {
                    worksheet.write_string_with_format(excel_row, col, value, &cell_format)?;
                }
            }
        }
    }

    let table_columns: Vec<TableColumn> = columns
        .iter()
        .map(|header| TableColumn::new().set_header(*header))
        .collect();
    let table = Table::new()
        .set_name(&rules.table_name)
        .set_style(TableStyle::Medium9)
        .set_columns(&table_columns);
    let last_col = col_num(columns.len() - 1);
    worksheet.add_table(0, 0, row_num(grid.len()), last_col, &table)?;

    set_widths(worksheet, columns, &grid, CENSUS_WIDTH_PADDING, CENSUS_MAX_WIDTH)?;

    let bytes = workbook.save_to_buffer()?;
    debug!(rows = grid.len(), bytes = bytes.len(), "census workbook written");
    Ok(bytes)
}

/// Render the supplies report, one worksheet per specialty.
pub fn write_supplies_workbook(report: &SuppliesReport, rules: &SuppliesRules) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    for sheet in &report.sheets {
        let worksheet = workbook.add_worksheet();
        write_supply_sheet(worksheet, sheet, rules)?;
    }
    let bytes = workbook.save_to_buffer()?;
    debug!(
        sheets = report.sheets.len(),
        bytes = bytes.len(),
        "supplies workbook written"
    );
    Ok(bytes)
}

fn write_supply_sheet(worksheet: &mut Worksheet, sheet: &SupplySheet, rules: &SuppliesRules) -> Result<()> {
    let title_format = Format::new()
        .set_bold()
        .set_font_size(11)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let footer_format = Format::new()
        .set_italic()
        .set_font_size(9)
        .set_text_wrap()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let sign_off_format = Format::new().set_bold();

    worksheet.set_name(&sheet.sheet_name)?;
    let last_col = col_num(SUPPLY_COLUMNS.len() - 1);

    worksheet.merge_range(0, 0, 0, last_col, &sheet.title, &title_format)?;
    for (col, header) in (0u16..).zip(SUPPLY_COLUMNS) {
        worksheet.write_string_with_format(1, col, header, &header_format)?;
    }

    let grid: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .map(|row| {
            vec![
                row.bed.clone(),
                row.registry_id.clone(),
                row.name.clone(),
                row.sex.clone(),
                row.age.clone(),
                row.admission_date.clone(),
                row.precaution.clone(),
                row.supply_item.clone(),
            ]
        })
        .collect();
    for (row_index, cells) in grid.iter().enumerate() {
        let excel_row = row_num(row_index + 2);
        for (col, value) in (0u16..).zip(cells) {
            worksheet.write_string_with_format(excel_row, col, value, &cell_format)?;
        }
    }

    let footer_row = row_num(grid.len() + 2);
    worksheet.merge_range(footer_row, 0, footer_row, last_col, &rules.footer, &footer_format)?;
    worksheet.set_row_height(footer_row, FOOTER_ROW_HEIGHT)?;
    worksheet.write_string_with_format(
        footer_row.saturating_add(2),
        0,
        &rules.sign_off,
        &sign_off_format,
    )?;

    set_widths(worksheet, &SUPPLY_COLUMNS, &grid, SUPPLY_WIDTH_PADDING, SUPPLY_MAX_WIDTH)?;
    Ok(())
}

/// Width per column: longest header or value plus padding, capped.
pub fn column_widths(headers: &[&str], grid: &[Vec<String>], padding: usize, max: usize) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = grid
                .iter()
                .filter_map(|row| row.get(col))
                .map(|value| value.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (longest + padding).min(max)
        })
        .collect()
}

fn set_widths(
    worksheet: &mut Worksheet,
    headers: &[&str],
    grid: &[Vec<String>],
    padding: usize,
    max: usize,
) -> Result<()> {
    for (col, width) in (0u16..).zip(column_widths(headers, grid, padding, max)) {
        worksheet.set_column_width(col, width as f64)?;
    }
    Ok(())
}

/// Out-of-range rows saturate and are rejected by the writer.
fn row_num(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn col_num(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}
