#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod rules;

pub use crate::error::StandardsError;
pub use crate::loader::{
    DEFAULT_RULES, RULES_ENV_VAR, load_default_rules, load_rules, load_rules_from_path,
    parse_rules, rules_path,
};
pub use crate::rules::{
    BedPrefixRule, BedRangeRule, CatalogEntry, ClassifierRules, RecordRules, ReportRules,
    ResolverRules, RuleSet, SuppliesRules, TextOverrideRule, TherapyUnit, ValidityPolicy,
};
