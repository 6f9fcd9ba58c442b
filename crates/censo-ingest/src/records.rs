//! Patient record building from the census grid.
//!
//! Rows are walked in document order. An `ESPECIALIDAD:` header row updates
//! the current header text and produces no record. Every other row is
//! checked, in order, against the noise deny-list, the column contract and
//! the registry admissibility test before it becomes a [`PatientRecord`].

use std::collections::BTreeSet;

use censo_classify::resolve_specialty;
use censo_model::{Extraction, PatientRecord, SkipCounts, UNCLASSIFIED_SPECIALTY};
use censo_standards::{RecordRules, RuleSet};
use tracing::{debug, info};

use crate::html_table::{CensusTable, RawRow};

/// Census export column positions.
mod column {
    pub const BED: usize = 0;
    pub const REGISTRY: usize = 1;
    pub const NAME: usize = 2;
    pub const SEX: usize = 3;
    pub const AGE: usize = 4;
    pub const DIAGNOSIS: usize = 6;
    pub const ADMISSION_DATE: usize = 9;
}

/// What a single row turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowKind {
    Header,
    Noise,
    Short,
    Inadmissible,
    Patient,
}

/// Build patient records from a census grid.
///
/// Pure over its inputs: the same table and rules always produce the same
/// records, observed specialties and skip counts.
pub fn build_records(table: &CensusTable, rules: &RuleSet) -> Extraction {
    let mut header_text = UNCLASSIFIED_SPECIALTY.to_string();
    let mut records = Vec::new();
    let mut observed = BTreeSet::new();
    let mut skipped = SkipCounts::default();

    for row in &table.rows {
        match classify_row(row, &rules.records) {
            RowKind::Header => {
                header_text = row.cell(column::BED).to_string();
                skipped.headers += 1;
            }
            RowKind::Noise => skipped.noise += 1,
            RowKind::Short => skipped.short += 1,
            RowKind::Inadmissible => skipped.inadmissible += 1,
            RowKind::Patient => {
                let record = patient_record(row, &header_text, rules);
                observed.insert(record.specialty.clone());
                records.push(record);
            }
        }
    }

    debug!(
        headers = skipped.headers,
        noise = skipped.noise,
        short = skipped.short,
        inadmissible = skipped.inadmissible,
        "rows skipped"
    );
    info!(
        patients = records.len(),
        specialties = observed.len(),
        "census records built"
    );

    Extraction {
        records,
        observed,
        skipped,
    }
}

fn classify_row(row: &RawRow, rules: &RecordRules) -> RowKind {
    let bed = row.cell(column::BED).to_uppercase();
    if bed.contains(rules.header_marker.as_str()) {
        return RowKind::Header;
    }
    if rules.noise.iter().any(|noise| bed.contains(noise.as_str())) {
        return RowKind::Noise;
    }
    if row.len() < rules.min_columns {
        return RowKind::Short;
    }
    if !is_admissible_registry(row.cell(column::REGISTRY), rules.min_registry_len) {
        return RowKind::Inadmissible;
    }
    RowKind::Patient
}

/// A registry id is admissible when it is long enough and carries a digit.
pub fn is_admissible_registry(registry: &str, min_len: usize) -> bool {
    let registry = registry.trim();
    registry.chars().count() >= min_len && registry.chars().any(|ch| ch.is_ascii_digit())
}

fn patient_record(row: &RawRow, header_text: &str, rules: &RuleSet) -> PatientRecord {
    let bed = row.cell(column::BED).trim().to_string();
    let specialty = resolve_specialty(&bed, header_text, rules);
    PatientRecord {
        registry_id: row.cell(column::REGISTRY).trim().to_string(),
        name: row.cell(column::NAME).trim().to_string(),
        sex: row.cell(column::SEX).trim().to_string(),
        age: row
            .cell(column::AGE)
            .chars()
            .filter(char::is_ascii_digit)
            .collect(),
        diagnosis: row.cell(column::DIAGNOSIS).trim().to_string(),
        admission_date: row.cell(column::ADMISSION_DATE).trim().to_string(),
        bed,
        specialty,
    }
}
