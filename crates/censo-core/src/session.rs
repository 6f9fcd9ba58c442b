//! One operator session over one uploaded census.
//!
//! A session owns its extraction, buckets and selection. The rule catalog is
//! the only thing shared between sessions, behind an `Arc`.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use censo_classify::{Buckets, SelectionEvent, SelectionState, resolve_selection};
use censo_ingest::{extract_patients, read_census_file};
use censo_model::Extraction;
use censo_report::{
    ReportError, assemble, assemble_supplies, census_file_name, default_supply_selection,
    supplies_file_name, write_census_workbook, write_supplies_workbook,
};
use censo_standards::RuleSet;
use chrono::NaiveDate;
use tracing::{info, info_span};

use crate::error::SessionError;
use crate::kind::ReportKind;

/// A generated workbook ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Patient rows written.
    pub rows: usize,
    /// Worksheets written.
    pub sheets: usize,
    /// Specialties the report was built from.
    pub specialties: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct CensusSession {
    rules: Arc<RuleSet>,
    extraction: Extraction,
    buckets: Buckets,
    selection: SelectionState,
}

impl CensusSession {
    /// Extract a census document and start with an empty selection.
    pub fn open(html: &str, rules: Arc<RuleSet>) -> Result<Self, SessionError> {
        let extraction = extract_patients(html, &rules)?;
        let buckets = Buckets::from_observed(&extraction.observed, &rules);
        info!(
            patients = extraction.patient_count(),
            specialties = extraction.observed.len(),
            coordinations = buckets.coordinations().count(),
            "session opened"
        );
        Ok(Self {
            rules,
            extraction,
            buckets,
            selection: SelectionState::new(),
        })
    }

    pub fn open_path(path: &Path, rules: Arc<RuleSet>) -> Result<Self, SessionError> {
        let html = read_census_file(path)?;
        Self::open(&html, rules)
    }

    /// Replace the document. On failure the session is left untouched.
    ///
    /// Selection flags survive for specialties present in the new document.
    pub fn reload(&mut self, html: &str) -> Result<(), SessionError> {
        let extraction = extract_patients(html, &self.rules)?;
        let buckets = Buckets::from_observed(&extraction.observed, &self.rules);
        self.selection.retain_present(&buckets);
        self.extraction = extraction;
        self.buckets = buckets;
        info!(
            patients = self.extraction.patient_count(),
            "session reloaded"
        );
        Ok(())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn apply(&mut self, event: SelectionEvent) {
        self.selection.apply(event, &self.buckets);
    }

    /// Final specialty set for the current selection.
    pub fn selected_specialties(&self) -> BTreeSet<String> {
        resolve_selection(&self.selection, &self.buckets, &self.rules.linkage())
    }

    /// Specialties a report of `kind` would include.
    ///
    /// The supplies report only covers specialties matching the configured
    /// supply filter: the selection is narrowed to them, and an empty
    /// selection means every matching specialty in the upload.
    pub fn specialties_for(&self, kind: ReportKind) -> BTreeSet<String> {
        let selected = self.selected_specialties();
        match kind {
            ReportKind::Census => selected,
            ReportKind::Supplies => {
                let eligible =
                    default_supply_selection(&self.extraction.observed, &self.rules.supplies);
                if selected.is_empty() {
                    eligible
                } else {
                    selected.intersection(&eligible).cloned().collect()
                }
            }
        }
    }

    /// Assemble and render a workbook for the current selection.
    pub fn generate(
        &self,
        kind: ReportKind,
        report_date: NaiveDate,
    ) -> Result<GeneratedReport, SessionError> {
        let span = info_span!("generate", %kind, %report_date);
        let _guard = span.enter();

        let specialties = self.specialties_for(kind);
        let records = &self.extraction.records;
        let generated = match kind {
            ReportKind::Census => {
                let report = assemble(records, &specialties, report_date, &self.rules)?;
                GeneratedReport {
                    kind,
                    file_name: census_file_name(report_date),
                    bytes: write_census_workbook(&report, &self.rules.report)?,
                    rows: report.rows.len(),
                    sheets: 1,
                    specialties,
                }
            }
            ReportKind::Supplies => {
                if specialties.is_empty() && !self.selected_specialties().is_empty() {
                    return Err(ReportError::EmptyResultSet.into());
                }
                let report = assemble_supplies(records, &specialties, report_date, &self.rules)?;
                GeneratedReport {
                    kind,
                    file_name: supplies_file_name(report_date),
                    bytes: write_supplies_workbook(&report, &self.rules.supplies)?,
                    rows: report.row_count(),
                    sheets: report.sheets.len(),
                    specialties,
                }
            }
        };
        info!(
            file = %generated.file_name,
            rows = generated.rows,
            sheets = generated.sheets,
            bytes = generated.bytes.len(),
            "report generated"
        );
        Ok(generated)
    }
}
