//! General census report assembly.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use censo_classify::numeric_bed;
use censo_model::PatientRecord;
use censo_standards::RuleSet;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ReportError, Result};
use crate::length_of_stay::{CENSUS_DATE_FORMAT, LengthOfStay, length_of_stay_from_str};

/// Column headers of the general census sheet.
pub const CENSUS_COLUMNS: [&str; 10] = [
    "FECHA_REPORTE",
    "ESPECIALIDAD",
    "CAMA",
    "REGISTRO",
    "PACIENTE",
    "SEXO",
    "EDAD",
    "DIAGNOSTICO",
    "FECHA_INGRESO",
    "DIAS_ESTANCIA",
];

/// One output row of the general census.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CensusRow {
    pub specialty: String,
    pub bed: String,
    pub registry_id: String,
    pub name: String,
    pub sex: String,
    pub age: String,
    pub diagnosis: String,
    pub admission_date: String,
    pub length_of_stay: LengthOfStay,
}

/// The assembled general census.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CensusReport {
    pub report_date: NaiveDate,
    pub rows: Vec<CensusRow>,
}

impl CensusReport {
    /// Report date as written in the `FECHA_REPORTE` column.
    pub fn report_date_text(&self) -> String {
        self.report_date.format(CENSUS_DATE_FORMAT).to_string()
    }

    pub fn needs_review_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.length_of_stay == LengthOfStay::NeedsReview)
            .count()
    }
}

/// Sort key for a bed: numeric beds first by value, then text beds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BedKey<'a> {
    Numeric(u64),
    Text(&'a str),
}

impl<'a> BedKey<'a> {
    pub fn of(bed: &'a str) -> Self {
        let bed = bed.trim();
        numeric_bed(bed).map_or(BedKey::Text(bed), BedKey::Numeric)
    }
}

/// Therapy-priority rank; non-therapy specialties sort after every unit.
pub fn specialty_rank(specialty: &str, rules: &RuleSet) -> usize {
    rules.therapy_priority(specialty).unwrap_or(usize::MAX)
}

/// Report ordering: therapy priority, then specialty name, then bed.
pub fn report_order(
    a_specialty: &str,
    a_bed: &str,
    b_specialty: &str,
    b_bed: &str,
    rules: &RuleSet,
) -> Ordering {
    specialty_rank(a_specialty, rules)
        .cmp(&specialty_rank(b_specialty, rules))
        .then_with(|| a_specialty.cmp(b_specialty))
        .then_with(|| BedKey::of(a_bed).cmp(&BedKey::of(b_bed)))
}

/// Build the general census for the selected specialties.
///
/// # Errors
///
/// [`ReportError::EmptySelection`] when `selected` is empty and
/// [`ReportError::EmptyResultSet`] when no record matches it.
pub fn assemble(
    records: &[PatientRecord],
    selected: &BTreeSet<String>,
    report_date: NaiveDate,
    rules: &RuleSet,
) -> Result<CensusReport> {
    if selected.is_empty() {
        return Err(ReportError::EmptySelection);
    }

    let mut rows: Vec<CensusRow> = records
        .iter()
        .filter(|record| selected.contains(&record.specialty))
        .map(|record| census_row(record, report_date))
        .collect();
    if rows.is_empty() {
        return Err(ReportError::EmptyResultSet);
    }

    rows.sort_by(|a, b| report_order(&a.specialty, &a.bed, &b.specialty, &b.bed, rules));

    let report = CensusReport { report_date, rows };
    info!(
        rows = report.rows.len(),
        specialties = selected.len(),
        needs_review = report.needs_review_count(),
        "census assembled"
    );
    Ok(report)
}

fn census_row(record: &PatientRecord, report_date: NaiveDate) -> CensusRow {
    let length_of_stay = length_of_stay_from_str(&record.admission_date, report_date);
    if length_of_stay == LengthOfStay::NeedsReview {
        warn!(bed = %record.bed, specialty = %record.specialty, "admission date needs review");
    }
    CensusRow {
        specialty: record.specialty.clone(),
        bed: record.bed.clone(),
        registry_id: record.registry_id.clone(),
        name: record.name.clone(),
        sex: record.sex.clone(),
        age: record.age.clone(),
        diagnosis: record.diagnosis.clone(),
        admission_date: record.admission_date.clone(),
        length_of_stay,
    }
}
