//! Rule catalog types.
//!
//! One [`RuleSet`] drives every classification step: the specialty resolver,
//! the coordination classifier, the selection linkage and the report texts.
//! It is deserialized from TOML, normalized to upper case and validated once,
//! then shared read-only.

use std::collections::{BTreeMap, BTreeSet};

use censo_model::Coordination;
use serde::{Deserialize, Serialize};

use crate::error::StandardsError;

/// Schema identifier expected in the `[rules]` header.
pub const RULES_SCHEMA: &str = "censo.rules";

/// Highest schema version this build understands.
pub const RULES_SCHEMA_VERSION: u32 = 1;

/// Column index of the admission date; rows must be at least this wide + 1.
const ADMISSION_DATE_COLUMN: usize = 9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub rules: RulesHeader,
    pub records: RecordRules,
    pub resolver: ResolverRules,
    /// Therapy units in report priority order.
    pub therapy_units: Vec<TherapyUnit>,
    pub classifier: ClassifierRules,
    pub report: ReportRules,
    pub supplies: SuppliesRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesHeader {
    pub schema: String,
    pub schema_version: u32,
}

/// Row admissibility rules used by the record builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordRules {
    /// Marker text identifying a specialty header row.
    pub header_marker: String,
    /// Bed-field substrings that identify noise rows.
    pub noise: Vec<String>,
    pub min_registry_len: usize,
    pub min_columns: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverRules {
    /// Literal fragments removed from header text before it is used.
    pub strip: Vec<String>,
    #[serde(default)]
    pub bed_prefix: Vec<BedPrefixRule>,
    #[serde(default)]
    pub bed_range: Vec<BedRangeRule>,
    #[serde(default)]
    pub text_override: Vec<TextOverrideRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedPrefixRule {
    pub prefix: String,
    pub specialty: String,
}

/// Inclusive numeric bed range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedRangeRule {
    pub start: u64,
    pub end: u64,
    pub specialty: String,
}

impl BedRangeRule {
    pub fn contains(&self, bed: u64) -> bool {
        (self.start..=self.end).contains(&bed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextOverrideRule {
    /// Any of these substrings triggers the override.
    pub contains: Vec<String>,
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TherapyUnit {
    pub name: String,
    /// Coordination whose select-all silently includes this unit.
    pub home: Coordination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierRules {
    /// Checked before the keyword catalog.
    pub pediatric_markers: Vec<String>,
    /// Scanned in declaration order; first match wins.
    pub catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub coordination: Coordination,
    pub keywords: Vec<String>,
}

/// General census sheet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportRules {
    pub sheet_name: String,
    pub table_name: String,
    pub include_length_of_stay: bool,
    /// Length-of-stay text used when the admission date cannot be read.
    pub needs_review: String,
}

/// Supplies (insumos) report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuppliesRules {
    /// Default selection: specialties containing any of these substrings.
    pub filter: Vec<String>,
    pub supply_item: String,
    pub protective_markers: Vec<String>,
    pub protective_precaution: String,
    pub standard_precaution: String,
    pub title_suffix: String,
    pub footer: String,
    pub sign_off: String,
    pub validity: ValidityPolicy,
    pub rolling_days: u32,
}

/// How the supplies report validity window is derived from the report date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidityPolicy {
    /// Monday through Sunday of the upcoming week.
    #[default]
    UpcomingWeek,
    /// Report date through report date + `rolling_days`.
    Rolling,
}

impl RuleSet {
    /// Upper-case and trim every matchable string.
    pub fn normalize(&mut self) {
        fn norm(value: &mut String) {
            *value = value.trim().to_uppercase();
        }
        fn norm_all(values: &mut [String]) {
            values.iter_mut().for_each(norm);
        }

        norm(&mut self.records.header_marker);
        norm_all(&mut self.records.noise);
        norm_all(&mut self.resolver.strip);
        for rule in &mut self.resolver.bed_prefix {
            norm(&mut rule.prefix);
            norm(&mut rule.specialty);
        }
        for rule in &mut self.resolver.bed_range {
            norm(&mut rule.specialty);
        }
        for rule in &mut self.resolver.text_override {
            norm_all(&mut rule.contains);
            norm(&mut rule.specialty);
        }
        for unit in &mut self.therapy_units {
            norm(&mut unit.name);
        }
        norm_all(&mut self.classifier.pediatric_markers);
        for entry in &mut self.classifier.catalog {
            norm_all(&mut entry.keywords);
        }
        norm_all(&mut self.supplies.filter);
        norm_all(&mut self.supplies.protective_markers);
    }

    /// Check structural invariants the classifier relies on.
    pub fn validate(&self) -> Result<(), StandardsError> {
        if self.rules.schema != RULES_SCHEMA || self.rules.schema_version > RULES_SCHEMA_VERSION {
            return Err(StandardsError::UnsupportedSchema {
                schema: self.rules.schema.clone(),
                version: self.rules.schema_version,
            });
        }
        if self.records.header_marker.is_empty() {
            return Err(StandardsError::invalid("records.header_marker is empty"));
        }
        if self.records.min_registry_len == 0 {
            return Err(StandardsError::invalid("records.min_registry_len must be > 0"));
        }
        if self.records.min_columns <= ADMISSION_DATE_COLUMN {
            return Err(StandardsError::invalid(format!(
                "records.min_columns must be at least {}",
                ADMISSION_DATE_COLUMN + 1
            )));
        }
        if self.resolver.bed_prefix.iter().any(|rule| rule.prefix.is_empty()) {
            return Err(StandardsError::invalid("empty bed prefix"));
        }
        for range in &self.resolver.bed_range {
            if range.start > range.end {
                return Err(StandardsError::invalid(format!(
                    "bed range {}..{} is reversed",
                    range.start, range.end
                )));
            }
        }
        if self.therapy_units.is_empty() {
            return Err(StandardsError::invalid("no therapy units defined"));
        }
        let mut seen = BTreeSet::new();
        for unit in &self.therapy_units {
            if unit.home.is_therapy() || unit.home == Coordination::Otras {
                return Err(StandardsError::invalid(format!(
                    "therapy unit {} needs a catalog coordination as home, got {}",
                    unit.name, unit.home
                )));
            }
            if !seen.insert(unit.name.as_str()) {
                return Err(StandardsError::DuplicateTherapyUnit {
                    name: unit.name.clone(),
                });
            }
        }
        if self.classifier.catalog.is_empty() {
            return Err(StandardsError::invalid("classifier.catalog is empty"));
        }
        for entry in &self.classifier.catalog {
            if entry.coordination.is_therapy() || entry.coordination == Coordination::Otras {
                return Err(StandardsError::invalid(format!(
                    "{} cannot appear in the keyword catalog",
                    entry.coordination
                )));
            }
            if entry.keywords.iter().any(String::is_empty) {
                return Err(StandardsError::invalid(format!(
                    "empty keyword under {}",
                    entry.coordination
                )));
            }
        }
        Ok(())
    }

    /// Position of a therapy unit in the report priority list.
    pub fn therapy_priority(&self, specialty: &str) -> Option<usize> {
        self.therapy_units
            .iter()
            .position(|unit| unit.name == specialty)
    }

    pub fn is_therapy_unit(&self, specialty: &str) -> bool {
        self.therapy_priority(specialty).is_some()
    }

    /// Administrative home of a therapy unit.
    pub fn therapy_home(&self, specialty: &str) -> Option<Coordination> {
        self.therapy_units
            .iter()
            .find(|unit| unit.name == specialty)
            .map(|unit| unit.home)
    }

    /// Home coordination → therapy units auto-included by its select-all.
    pub fn linkage(&self) -> BTreeMap<Coordination, Vec<String>> {
        let mut linkage: BTreeMap<Coordination, Vec<String>> = BTreeMap::new();
        for unit in &self.therapy_units {
            linkage.entry(unit.home).or_default().push(unit.name.clone());
        }
        linkage
    }
}
