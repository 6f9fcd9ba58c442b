use std::path::PathBuf;

use censo_core::ReportKind;
use censo_model::{Coordination, SkipCounts};

/// Outcome of a report command.
#[derive(Debug)]
pub struct ReportResult {
    pub kind: ReportKind,
    pub output: PathBuf,
    pub report_date: String,
    pub rows: usize,
    pub sheets: usize,
    pub specialties: Vec<SpecialtySummary>,
}

/// One specialty line in a summary table.
#[derive(Debug, Clone)]
pub struct SpecialtySummary {
    pub coordination: Coordination,
    pub specialty: String,
    pub patients: usize,
}

/// Outcome of the `specialties` command.
#[derive(Debug)]
pub struct CensusOverview {
    pub patients: usize,
    pub skipped: SkipCounts,
    pub specialties: Vec<SpecialtySummary>,
}
