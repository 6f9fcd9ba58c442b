use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Walk-state value before any `ESPECIALIDAD:` header has been seen.
pub const UNCLASSIFIED_SPECIALTY: &str = "SIN_ESPECIALIDAD";

/// One admitted patient, as read from the census table.
///
/// Built once by the record builder; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub bed: String,
    pub registry_id: String,
    pub name: String,
    pub sex: String,
    /// Digits only.
    pub age: String,
    pub diagnosis: String,
    /// Raw admission date text, expected as `DD/MM/YYYY`.
    pub admission_date: String,
    /// Canonical specialty resolved from bed and header text.
    pub specialty: String,
}

/// Aggregate counts of rows that did not produce a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// `ESPECIALIDAD:` header rows.
    pub headers: usize,
    /// Rows whose bed field hit the noise deny-list.
    pub noise: usize,
    /// Rows narrower than the census column contract.
    pub short: usize,
    /// Rows whose registry id failed the admissibility test.
    pub inadmissible: usize,
}

impl SkipCounts {
    /// Non-header rows that were dropped.
    pub fn dropped(&self) -> usize {
        self.noise + self.short + self.inadmissible
    }
}

/// Output of one extraction pass over a census document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Patient records in document order.
    pub records: Vec<PatientRecord>,
    /// Every specialty resolved during this pass.
    pub observed: BTreeSet<String>,
    pub skipped: SkipCounts,
}

impl Extraction {
    pub fn patient_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose specialty is in `specialties`, in document order.
    pub fn records_in<'a>(
        &'a self,
        specialties: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a PatientRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| specialties.contains(&record.specialty))
    }
}
