//! Translating command-line choices into session inputs.

use censo_classify::{Buckets, SelectionEvent};
use censo_model::Coordination;
use chrono::NaiveDate;
use tracing::warn;

/// Parse a report date given as `DD/MM/YYYY` or `YYYY-MM-DD`.
pub fn parse_report_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{value}', expected DD/MM/YYYY"))
}

/// Selection events for the given flags, in application order.
///
/// `all` selects every coordination present in the upload. Specialty names
/// are matched case-insensitively; names absent from the upload are skipped
/// with a warning.
pub fn selection_events(
    all: bool,
    coordinations: &[Coordination],
    specialties: &[String],
    buckets: &Buckets,
) -> Vec<SelectionEvent> {
    let mut events = Vec::new();
    let chosen: Vec<Coordination> = if all {
        buckets.coordinations().collect()
    } else {
        coordinations.to_vec()
    };
    for coordination in chosen {
        if buckets.get(coordination).is_none() {
            warn!(%coordination, "coordination has no specialties in this census");
        }
        events.push(SelectionEvent::ToggleAll {
            coordination,
            selected: true,
        });
    }
    for specialty in specialties {
        let specialty = specialty.trim().to_uppercase();
        if !buckets.contains(&specialty) {
            warn!(%specialty, "specialty not present in this census, ignoring");
            continue;
        }
        events.push(SelectionEvent::ToggleSpecialty {
            specialty,
            selected: true,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use censo_standards::load_default_rules;

    use super::*;

    fn buckets(names: &[&str]) -> Buckets {
        let rules = load_default_rules().expect("default rules");
        let observed: BTreeSet<String> = names.iter().map(|name| (*name).to_string()).collect();
        Buckets::from_observed(&observed, &rules)
    }

    #[test]
    fn parses_both_date_styles() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(parse_report_date("05/03/2024"), Ok(expected));
        assert_eq!(parse_report_date(" 2024-03-05 "), Ok(expected));
        assert!(parse_report_date("31/02/2024").is_err());
    }

    #[test]
    fn all_selects_every_present_coordination() {
        let buckets = buckets(&["CARDIOLOGIA", "UCIA"]);
        let events = selection_events(true, &[], &[], &buckets);
        assert_eq!(
            events,
            vec![
                SelectionEvent::ToggleAll {
                    coordination: Coordination::Terapias,
                    selected: true
                },
                SelectionEvent::ToggleAll {
                    coordination: Coordination::Modulares,
                    selected: true
                },
            ]
        );
    }

    #[test]
    fn unknown_specialties_are_skipped() {
        let buckets = buckets(&["CARDIOLOGIA"]);
        let events = selection_events(
            false,
            &[],
            &["cardiologia".to_string(), "NEUROLOGIA".to_string()],
            &buckets,
        );
        assert_eq!(
            events,
            vec![SelectionEvent::ToggleSpecialty {
                specialty: "CARDIOLOGIA".to_string(),
                selected: true
            }]
        );
    }
}
