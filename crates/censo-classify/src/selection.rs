//! Selection state for choosing which specialties go into a report.
//!
//! The state holds two layers of flags: a select-all flag per coordination
//! and an inclusion flag per specialty. Toggling a coordination writes its
//! own flag first, then cascades to every specialty in its bucket, so the
//! children never lag behind the parent.
//!
//! The final specialty set is computed by [`resolve_selection`], which also
//! pulls in therapy units linked to a selected home coordination.

use std::collections::{BTreeMap, BTreeSet};

use censo_model::Coordination;
use serde::Serialize;
use tracing::debug;

use crate::buckets::Buckets;

/// A user action on the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Select or clear a whole coordination.
    ToggleAll {
        coordination: Coordination,
        selected: bool,
    },
    /// Select or clear a single specialty.
    ToggleSpecialty { specialty: String, selected: bool },
    /// Drop every flag.
    Clear,
}

/// Per-coordination and per-specialty selection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    select_all: BTreeMap<Coordination, bool>,
    included: BTreeMap<String, bool>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event, returning the next state.
    #[must_use]
    pub fn update(mut self, event: SelectionEvent, buckets: &Buckets) -> Self {
        self.apply(event, buckets);
        self
    }

    /// Apply an event in place.
    pub fn apply(&mut self, event: SelectionEvent, buckets: &Buckets) {
        match event {
            SelectionEvent::ToggleAll {
                coordination,
                selected,
            } => {
                self.select_all.insert(coordination, selected);
                for specialty in buckets.specialties(coordination) {
                    self.included.insert(specialty.to_string(), selected);
                }
                debug!(%coordination, selected, "coordination toggled");
            }
            SelectionEvent::ToggleSpecialty {
                specialty,
                selected,
            } => {
                self.included.insert(specialty, selected);
            }
            SelectionEvent::Clear => {
                self.select_all.clear();
                self.included.clear();
            }
        }
    }

    pub fn is_all_selected(&self, coordination: Coordination) -> bool {
        self.select_all.get(&coordination).copied().unwrap_or(false)
    }

    pub fn is_included(&self, specialty: &str) -> bool {
        self.included.get(specialty).copied().unwrap_or(false)
    }

    /// Coordinations whose select-all flag is set.
    pub fn selected_coordinations(&self) -> impl Iterator<Item = Coordination> + '_ {
        self.select_all
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(coordination, _)| *coordination)
    }

    /// Specialties whose inclusion flag is set.
    pub fn included_specialties(&self) -> impl Iterator<Item = &str> {
        self.included
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(specialty, _)| specialty.as_str())
    }

    /// Forget flags for specialties that are not in `buckets`.
    ///
    /// Used after a reload so stale selections cannot leak into a report.
    pub fn retain_present(&mut self, buckets: &Buckets) {
        self.included.retain(|specialty, _| buckets.contains(specialty));
        self.select_all
            .retain(|coordination, _| buckets.get(*coordination).is_some());
    }

    pub fn is_empty(&self) -> bool {
        self.select_all.values().all(|selected| !selected)
            && self.included.values().all(|selected| !selected)
    }
}

/// Compute the final specialty set for a report.
///
/// The union of:
/// - specialties whose inclusion flag is set and that were observed,
/// - every specialty in a coordination whose select-all flag is set,
/// - therapy units linked to a selected coordination, when observed.
///
/// Flags naming specialties that are not in `buckets` are ignored.
pub fn resolve_selection(
    state: &SelectionState,
    buckets: &Buckets,
    linkage: &BTreeMap<Coordination, Vec<String>>,
) -> BTreeSet<String> {
    let mut selected: BTreeSet<String> = state
        .included_specialties()
        .filter(|specialty| buckets.contains(specialty))
        .map(str::to_string)
        .collect();

    for coordination in state.selected_coordinations() {
        selected.extend(buckets.specialties(coordination).map(str::to_string));
        if let Some(linked) = linkage.get(&coordination) {
            selected.extend(
                linked
                    .iter()
                    .filter(|unit| buckets.contains(unit))
                    .cloned(),
            );
        }
    }

    debug!(count = selected.len(), "selection resolved");
    selected
}
