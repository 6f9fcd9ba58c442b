//! Specialty resolution from bed number and header text.
//!
//! The census export labels each block of beds with a free-text
//! `ESPECIALIDAD:` header, but high-acuity units are often filed under the
//! wrong header. The bed number is more reliable, so it is checked first:
//!
//! 1. bed-prefix overrides (e.g. `64xx` → UNIDAD CORONARIA)
//! 2. numeric bed ranges (e.g. `7401..=7409` → TERAPIA POSQUIRURGICA)
//! 3. text overrides on the cleaned header
//! 4. the cleaned header itself
//!
//! Resolution depends only on its inputs and the rule catalog, so the same
//! document always yields the same specialties.

use censo_model::UNCLASSIFIED_SPECIALTY;
use censo_standards::RuleSet;

/// Resolve the canonical specialty for a bed under the given header text.
pub fn resolve_specialty(bed: &str, header_text: &str, rules: &RuleSet) -> String {
    let bed = bed.trim().to_uppercase();

    if let Some(specialty) = bed_override(&bed, rules) {
        return specialty.to_string();
    }

    let header = clean_header_text(header_text, rules);
    if let Some(specialty) = text_override(&header, rules) {
        return specialty.to_string();
    }
    if header.is_empty() {
        return UNCLASSIFIED_SPECIALTY.to_string();
    }
    header
}

/// Strip the header marker and export artifacts, collapse whitespace, upper-case.
pub fn clean_header_text(header_text: &str, rules: &RuleSet) -> String {
    let mut text = header_text.to_uppercase();
    for fragment in &rules.resolver.strip {
        text = text.replace(fragment.as_str(), " ");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Steps 1 and 2: overrides keyed on the bed identifier alone.
fn bed_override<'r>(bed: &str, rules: &'r RuleSet) -> Option<&'r str> {
    if let Some(rule) = rules
        .resolver
        .bed_prefix
        .iter()
        .find(|rule| bed.starts_with(rule.prefix.as_str()))
    {
        return Some(rule.specialty.as_str());
    }
    let number = numeric_bed(bed)?;
    rules
        .resolver
        .bed_range
        .iter()
        .find(|rule| rule.contains(number))
        .map(|rule| rule.specialty.as_str())
}

/// Bed value when it is made of ASCII digits only.
pub fn numeric_bed(bed: &str) -> Option<u64> {
    if bed.is_empty() || !bed.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    bed.parse().ok()
}

fn text_override<'r>(header: &str, rules: &'r RuleSet) -> Option<&'r str> {
    rules
        .resolver
        .text_override
        .iter()
        .find(|rule| rule.contains.iter().any(|needle| header.contains(needle.as_str())))
        .map(|rule| rule.specialty.as_str())
}
