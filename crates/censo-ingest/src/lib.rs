//! Census document ingestion.
//!
//! Turns the hospital's HTML census export into [`PatientRecord`]s:
//! [`extract_census_table`] finds and cleans the census table, then
//! [`build_records`] walks it and resolves each patient's specialty.
//!
//! [`PatientRecord`]: censo_model::PatientRecord

#![deny(unsafe_code)]

pub mod error;
pub mod html_table;
pub mod records;

use std::path::Path;

use censo_model::Extraction;
use censo_standards::RuleSet;
use tracing::info_span;

pub use error::{IngestError, Result};
pub use html_table::{CensusTable, RawRow, extract_census_table, normalize_cell, read_census_file};
pub use records::{build_records, is_admissible_registry};

/// Extract patient records from an HTML census document.
pub fn extract_patients(html: &str, rules: &RuleSet) -> Result<Extraction> {
    let span = info_span!("extract", bytes = html.len());
    let _guard = span.enter();
    let table = extract_census_table(html)?;
    Ok(build_records(&table, rules))
}

/// Read a census file and extract its patient records.
pub fn extract_patients_from_path(path: &Path, rules: &RuleSet) -> Result<Extraction> {
    let html = read_census_file(path)?;
    extract_patients(&html, rules)
}
