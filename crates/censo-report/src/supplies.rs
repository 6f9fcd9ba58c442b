//! Supplies (insumos) report assembly.
//!
//! One sheet per specialty listing its patients with the precaution type and
//! supply item for the ward, under a title carrying the validity window.

use std::collections::{BTreeSet, HashSet};

use censo_model::PatientRecord;
use censo_standards::{RuleSet, SuppliesRules, ValidityPolicy};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::assemble::{BedKey, specialty_rank};
use crate::error::{ReportError, Result};
use crate::length_of_stay::CENSUS_DATE_FORMAT;

/// Column headers of each supplies sheet.
pub const SUPPLY_COLUMNS: [&str; 8] = [
    "CAMA",
    "REGISTRO",
    "PACIENTE",
    "SEXO",
    "EDAD",
    "FECHA DE INGRESO",
    "TIPO DE PRECAUCIONES",
    "INSUMO",
];

/// Excel caps sheet names at 31 characters; the export keeps one spare.
const MAX_SHEET_NAME: usize = 30;

/// Dates a supplies report is valid for, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ValidityWindow {
    pub fn start_text(&self) -> String {
        self.start.format(CENSUS_DATE_FORMAT).to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format(CENSUS_DATE_FORMAT).to_string()
    }
}

/// Compute the validity window for a report date.
///
/// `UpcomingWeek` starts on the report date when it is a Monday, otherwise on
/// the following Monday, and ends on the Sunday six days later. `Rolling`
/// runs from the report date to `rolling_days` days after it.
pub fn validity_window(
    report_date: NaiveDate,
    policy: ValidityPolicy,
    rolling_days: u32,
) -> ValidityWindow {
    match policy {
        ValidityPolicy::UpcomingWeek => {
            let offset = (7 - report_date.weekday().num_days_from_monday()) % 7;
            let start = add_days(report_date, u64::from(offset));
            ValidityWindow {
                start,
                end: add_days(start, 6),
            }
        }
        ValidityPolicy::Rolling => ValidityWindow {
            start: report_date,
            end: add_days(report_date, u64::from(rolling_days)),
        },
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// One patient row on a supplies sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyRow {
    pub bed: String,
    pub registry_id: String,
    pub name: String,
    pub sex: String,
    pub age: String,
    pub admission_date: String,
    pub precaution: String,
    pub supply_item: String,
}

/// One worksheet of the supplies report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplySheet {
    /// Worksheet name, sanitized and unique within the workbook.
    pub sheet_name: String,
    pub specialty: String,
    pub title: String,
    pub rows: Vec<SupplyRow>,
}

/// The assembled supplies report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppliesReport {
    pub report_date: NaiveDate,
    pub window: ValidityWindow,
    pub sheets: Vec<SupplySheet>,
}

impl SuppliesReport {
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows.len()).sum()
    }
}

/// Observed specialties matching the configured supply filter.
pub fn default_supply_selection(
    observed: &BTreeSet<String>,
    rules: &SuppliesRules,
) -> BTreeSet<String> {
    observed
        .iter()
        .filter(|specialty| {
            rules
                .filter
                .iter()
                .any(|needle| specialty.contains(needle.as_str()))
        })
        .cloned()
        .collect()
}

/// Precaution type for a specialty's patients.
pub fn precaution_for<'r>(specialty: &str, rules: &'r SuppliesRules) -> &'r str {
    if rules
        .protective_markers
        .iter()
        .any(|marker| specialty.contains(marker.as_str()))
    {
        &rules.protective_precaution
    } else {
        &rules.standard_precaution
    }
}

/// Sheet title for a specialty.
pub fn supplies_title(specialty: &str, window: &ValidityWindow, suffix: &str) -> String {
    format!(
        "{specialty} DEL {} AL {} {suffix}",
        window.start_text(),
        window.end_text()
    )
    .trim_end()
    .to_string()
}

/// Make a specialty usable as a worksheet name.
///
/// `/` becomes `-`, the other characters Excel rejects are removed, and the
/// result is cut to 30 characters. Excel also rejects names that start or end
/// with an apostrophe, so those are trimmed after the cut.
pub fn sanitize_sheet_name(specialty: &str) -> String {
    let cleaned: String = specialty
        .chars()
        .filter_map(|ch| match ch {
            '/' => Some('-'),
            '[' | ']' | ':' | '*' | '?' | '\\' => None,
            other => Some(other),
        })
        .collect();
    let truncated: String = trim_sheet_edges(&cleaned)
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let name = trim_sheet_edges(&truncated);
    if name.is_empty() {
        "HOJA".to_string()
    } else {
        name.to_string()
    }
}

fn trim_sheet_edges(name: &str) -> &str {
    name.trim_matches(|ch: char| ch == '\'' || ch.is_whitespace())
}

/// Sheet-name allocator enforcing Excel's case-insensitive uniqueness.
#[derive(Debug, Default)]
pub struct SheetNames {
    used: HashSet<String>,
}

impl SheetNames {
    pub fn allocate(&mut self, specialty: &str) -> String {
        let base = sanitize_sheet_name(specialty);
        if self.used.insert(base.to_uppercase()) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{suffix}", trim_sheet_edges(&stem));
            if self.used.insert(candidate.to_uppercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Build the supplies report for the selected specialties.
///
/// Sheets follow report order (therapy priority, then name); rows within a
/// sheet are ordered by bed.
///
/// # Errors
///
/// [`ReportError::EmptySelection`] when `selected` is empty and
/// [`ReportError::EmptyResultSet`] when no record matches it.
pub fn assemble_supplies(
    records: &[PatientRecord],
    selected: &BTreeSet<String>,
    report_date: NaiveDate,
    rules: &RuleSet,
) -> Result<SuppliesReport> {
    if selected.is_empty() {
        return Err(ReportError::EmptySelection);
    }
    let supplies = &rules.supplies;
    let window = validity_window(report_date, supplies.validity, supplies.rolling_days);

    let mut specialties: Vec<&String> = selected.iter().collect();
    specialties.sort_by(|a, b| {
        specialty_rank(a, rules)
            .cmp(&specialty_rank(b, rules))
            .then_with(|| a.cmp(b))
    });

    let mut names = SheetNames::default();
    let mut sheets = Vec::new();
    for specialty in specialties {
        let mut patients: Vec<&PatientRecord> = records
            .iter()
            .filter(|record| &record.specialty == specialty)
            .collect();
        if patients.is_empty() {
            continue;
        }
        patients.sort_by(|a, b| BedKey::of(&a.bed).cmp(&BedKey::of(&b.bed)));

        let precaution = precaution_for(specialty, supplies);
        let rows = patients
            .into_iter()
            .map(|record| SupplyRow {
                bed: record.bed.clone(),
                registry_id: record.registry_id.clone(),
                name: record.name.clone(),
                sex: record.sex.clone(),
                age: record.age.clone(),
                admission_date: record.admission_date.clone(),
                precaution: precaution.to_string(),
                supply_item: supplies.supply_item.clone(),
            })
            .collect();
        sheets.push(SupplySheet {
            sheet_name: names.allocate(specialty),
            specialty: specialty.clone(),
            title: supplies_title(specialty, &window, &supplies.title_suffix),
            rows,
        });
    }

    if sheets.is_empty() {
        return Err(ReportError::EmptyResultSet);
    }

    let report = SuppliesReport {
        report_date,
        window,
        sheets,
    };
    info!(
        sheets = report.sheets.len(),
        rows = report.row_count(),
        start = %window.start,
        end = %window.end,
        "supplies assembled"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn upcoming_week_starts_next_monday() {
        // 2024-03-06 is a Wednesday.
        let window = validity_window(date(2024, 3, 6), ValidityPolicy::UpcomingWeek, 7);
        assert_eq!(window.start, date(2024, 3, 11));
        assert_eq!(window.end, date(2024, 3, 17));
    }

    #[test]
    fn upcoming_week_on_monday_starts_same_day() {
        let window = validity_window(date(2024, 3, 11), ValidityPolicy::UpcomingWeek, 7);
        assert_eq!(window.start.weekday(), Weekday::Mon);
        assert_eq!(window.start, date(2024, 3, 11));
        assert_eq!(window.end, date(2024, 3, 17));
    }

    #[test]
    fn upcoming_week_on_sunday_starts_tomorrow() {
        let window = validity_window(date(2024, 3, 10), ValidityPolicy::UpcomingWeek, 7);
        assert_eq!(window.start, date(2024, 3, 11));
    }

    #[test]
    fn rolling_window_adds_days() {
        let window = validity_window(date(2024, 12, 28), ValidityPolicy::Rolling, 7);
        assert_eq!(window.start, date(2024, 12, 28));
        assert_eq!(window.end, date(2025, 1, 4));
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(
            sanitize_sheet_name("CIRUGIA PLASTICA/RECONSTRUCTIVA"),
            "CIRUGIA PLASTICA-RECONSTRUCTIV"
        );
        assert_eq!(sanitize_sheet_name("U.C.I.N.*"), "U.C.I.N.");
        assert_eq!(sanitize_sheet_name("[?]"), "HOJA");
        assert_eq!(sanitize_sheet_name("A:B"), "AB");
        assert_eq!(sanitize_sheet_name("'PEDIATRIA'"), "PEDIATRIA");
    }

    #[test]
    fn truncation_never_leaves_an_edge_apostrophe() {
        let name = format!("{}'B", "A".repeat(29));
        let sanitized = sanitize_sheet_name(&name);
        assert_eq!(sanitized, "A".repeat(29));
        assert!(!sanitized.ends_with('\''));

        let mut names = SheetNames::default();
        names.allocate(&name);
        let second = names.allocate(&format!("{}'C", "A".repeat(29)));
        assert_eq!(second, format!("{} (2)", "A".repeat(26)));

        let mut names = SheetNames::default();
        let quoted = format!("{}' X", "B".repeat(25));
        names.allocate(&quoted);
        let again = names.allocate(&quoted);
        assert_eq!(again, format!("{} (2)", "B".repeat(25)));
        assert!(!again.contains("' "));
    }

    #[test]
    fn edge_apostrophe_names_are_accepted_by_the_writer() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        let name = sanitize_sheet_name(&format!("{}'B", "A".repeat(29)));
        assert!(worksheet.set_name(&name).is_ok());
    }

    #[test]
    fn duplicate_sheet_names_get_suffixes() {
        let mut names = SheetNames::default();
        let long = "ONCOLOGIA MEDICA HOSPITALIZACION ADULTOS";
        let first = names.allocate(long);
        let second = names.allocate(&format!("{long} B"));
        assert_eq!(first, "ONCOLOGIA MEDICA HOSPITALIZACI");
        assert_eq!(second, "ONCOLOGIA MEDICA HOSPITALI (2)");
        assert!(second.chars().count() <= 30);
        assert_eq!(
            names.allocate("oncologia medica hospitalizaci"),
            "oncologia medica hospitali (3)"
        );
    }
}
