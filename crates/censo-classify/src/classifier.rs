//! Coordination classification.

use censo_model::Coordination;
use censo_standards::RuleSet;

/// Place a canonical specialty into its display coordination.
///
/// Total: every input maps to exactly one coordination. Therapy units are
/// checked first, then pediatric markers, then the keyword catalog in
/// declaration order. Anything left over lands in [`Coordination::Otras`].
pub fn classify(specialty: &str, rules: &RuleSet) -> Coordination {
    let text = specialty.trim().to_uppercase();

    if rules.is_therapy_unit(&text) {
        return Coordination::Terapias;
    }
    if rules
        .classifier
        .pediatric_markers
        .iter()
        .any(|marker| text.contains(marker.as_str()))
    {
        return Coordination::Pediatria;
    }
    rules
        .classifier
        .catalog
        .iter()
        .find(|entry| {
            entry
                .keywords
                .iter()
                .any(|keyword| text.contains(keyword.as_str()))
        })
        .map_or(Coordination::Otras, |entry| entry.coordination)
}

/// Administrative home of a therapy unit, as declared in the rule catalog.
///
/// `None` for specialties that are not therapy units.
pub fn home_coordination(specialty: &str, rules: &RuleSet) -> Option<Coordination> {
    rules.therapy_home(&specialty.trim().to_uppercase())
}
