//! Rule catalog loading and path resolution.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StandardsError;
use crate::rules::RuleSet;

/// Environment variable for overriding the rule catalog.
pub const RULES_ENV_VAR: &str = "CENSO_RULES";

/// The canonical catalog shipped with the binary.
pub const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

const EMBEDDED_ORIGIN: &str = "<embedded default.toml>";

/// Resolve which rules file to read, if any.
///
/// Resolution order:
/// 1. explicit path (CLI `--rules`)
/// 2. `CENSO_RULES` environment variable
/// 3. `None`: use the embedded default
pub fn rules_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    std::env::var_os(RULES_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Load the effective rule catalog.
///
/// # Errors
///
/// Returns an error if an override file cannot be read, parsed or validated.
pub fn load_rules(explicit: Option<&Path>) -> Result<RuleSet, StandardsError> {
    match rules_path(explicit) {
        Some(path) => load_rules_from_path(&path),
        None => load_default_rules(),
    }
}

/// Parse the embedded default catalog.
pub fn load_default_rules() -> Result<RuleSet, StandardsError> {
    let rules = parse_rules(DEFAULT_RULES, Path::new(EMBEDDED_ORIGIN))?;
    debug!(
        therapy_units = rules.therapy_units.len(),
        catalog_entries = rules.classifier.catalog.len(),
        "loaded embedded rules"
    );
    Ok(rules)
}

/// Read and parse a rules file from disk.
pub fn load_rules_from_path(path: &Path) -> Result<RuleSet, StandardsError> {
    let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    let rules = parse_rules(&text, path)?;
    info!(path = %path.display(), "loaded rules override");
    Ok(rules)
}

/// Parse, normalize and validate a TOML rules document.
pub fn parse_rules(text: &str, origin: &Path) -> Result<RuleSet, StandardsError> {
    let mut rules: RuleSet = toml::from_str(text).map_err(|source| StandardsError::Toml {
        path: origin.to_path_buf(),
        source,
    })?;
    rules.normalize();
    rules.validate()?;
    Ok(rules)
}
