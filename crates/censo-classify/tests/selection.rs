//! Selection behavior across buckets and therapy-unit linkage.

use std::collections::BTreeSet;

use censo_classify::{Buckets, SelectionEvent, SelectionState, resolve_selection};
use censo_model::Coordination;
use censo_standards::{RuleSet, load_default_rules};

fn rules() -> RuleSet {
    load_default_rules().expect("default rules")
}

fn observed(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn names(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

#[test]
fn medicina_select_all_pulls_in_linked_therapy_units() {
    let rules = rules();
    let buckets = Buckets::from_observed(
        &observed(&[
            "MEDICINA INTERNA",
            "REUMATOLOGIA",
            "UCIA",
            "TERAPIA POSQUIRURGICA",
            "UNIDAD CORONARIA",
            "CARDIOLOGIA",
        ]),
        &rules,
    );
    // The therapy units display under TERAPIAS, not MEDICINA.
    assert_eq!(buckets.coordination_of("UCIA"), Some(Coordination::Terapias));

    let state = SelectionState::new().update(
        SelectionEvent::ToggleAll {
            coordination: Coordination::Medicina,
            selected: true,
        },
        &buckets,
    );
    let selected = resolve_selection(&state, &buckets, &rules.linkage());

    assert_eq!(
        names(&selected),
        vec![
            "MEDICINA INTERNA",
            "REUMATOLOGIA",
            "TERAPIA POSQUIRURGICA",
            "UCIA"
        ]
    );
}

#[test]
fn linked_units_missing_from_upload_are_not_added() {
    let rules = rules();
    let buckets = Buckets::from_observed(&observed(&["MEDICINA INTERNA", "UCIA"]), &rules);
    let state = SelectionState::new().update(
        SelectionEvent::ToggleAll {
            coordination: Coordination::Medicina,
            selected: true,
        },
        &buckets,
    );
    let selected = resolve_selection(&state, &buckets, &rules.linkage());
    assert_eq!(names(&selected), vec!["MEDICINA INTERNA", "UCIA"]);
}

#[test]
fn select_all_cascades_to_children_but_not_upward() {
    let rules = rules();
    let buckets = Buckets::from_observed(&observed(&["CARDIOLOGIA", "HEMATOLOGIA"]), &rules);

    let mut state = SelectionState::new();
    state.apply(
        SelectionEvent::ToggleAll {
            coordination: Coordination::Modulares,
            selected: true,
        },
        &buckets,
    );
    assert!(state.is_all_selected(Coordination::Modulares));
    assert!(state.is_included("CARDIOLOGIA"));
    assert!(state.is_included("HEMATOLOGIA"));

    state.apply(
        SelectionEvent::ToggleSpecialty {
            specialty: "HEMATOLOGIA".to_string(),
            selected: false,
        },
        &buckets,
    );
    // Clearing a child leaves the master flag untouched.
    assert!(state.is_all_selected(Coordination::Modulares));
    assert!(!state.is_included("HEMATOLOGIA"));

    state.apply(
        SelectionEvent::ToggleAll {
            coordination: Coordination::Modulares,
            selected: false,
        },
        &buckets,
    );
    assert!(!state.is_included("CARDIOLOGIA"));
    assert!(state.is_empty());
}

#[test]
fn individual_specialty_selection() {
    let rules = rules();
    let buckets = Buckets::from_observed(&observed(&["CARDIOLOGIA", "UROLOGIA"]), &rules);
    let state = SelectionState::new().update(
        SelectionEvent::ToggleSpecialty {
            specialty: "UROLOGIA".to_string(),
            selected: true,
        },
        &buckets,
    );
    let selected = resolve_selection(&state, &buckets, &rules.linkage());
    assert_eq!(names(&selected), vec!["UROLOGIA"]);
}

#[test]
fn flags_for_absent_specialties_are_ignored() {
    let rules = rules();
    let buckets = Buckets::from_observed(&observed(&["CARDIOLOGIA"]), &rules);
    let mut state = SelectionState::new().update(
        SelectionEvent::ToggleSpecialty {
            specialty: "NEUROLOGIA".to_string(),
            selected: true,
        },
        &buckets,
    );
    assert!(resolve_selection(&state, &buckets, &rules.linkage()).is_empty());

    state.retain_present(&buckets);
    assert!(!state.is_included("NEUROLOGIA"));
}

#[test]
fn clear_drops_every_flag() {
    let rules = rules();
    let buckets = Buckets::from_observed(&observed(&["CARDIOLOGIA"]), &rules);
    let state = SelectionState::new()
        .update(
            SelectionEvent::ToggleAll {
                coordination: Coordination::Modulares,
                selected: true,
            },
            &buckets,
        )
        .update(SelectionEvent::Clear, &buckets);
    assert_eq!(state, SelectionState::new());
}
