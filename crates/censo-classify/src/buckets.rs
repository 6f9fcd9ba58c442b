//! Coordination buckets for one upload.

use std::collections::{BTreeMap, BTreeSet};

use censo_model::Coordination;
use censo_standards::RuleSet;
use serde::Serialize;

use crate::classifier::classify;

/// Observed specialties grouped by display coordination.
///
/// Every observed specialty appears in exactly one bucket. Coordinations
/// with no observed specialty are absent, and iteration follows display
/// order ([`Coordination`]'s `Ord`) with specialties sorted alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Buckets {
    groups: BTreeMap<Coordination, BTreeSet<String>>,
}

impl Buckets {
    pub fn from_observed<'a, I>(observed: I, rules: &RuleSet) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut groups: BTreeMap<Coordination, BTreeSet<String>> = BTreeMap::new();
        for specialty in observed {
            groups
                .entry(classify(specialty, rules))
                .or_default()
                .insert(specialty.clone());
        }
        Self { groups }
    }

    pub fn get(&self, coordination: Coordination) -> Option<&BTreeSet<String>> {
        self.groups.get(&coordination)
    }

    /// Specialties in one bucket; empty when the bucket is absent.
    pub fn specialties(&self, coordination: Coordination) -> impl Iterator<Item = &str> {
        self.groups
            .get(&coordination)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordination, &BTreeSet<String>)> {
        self.groups.iter().map(|(coordination, set)| (*coordination, set))
    }

    pub fn coordinations(&self) -> impl Iterator<Item = Coordination> + '_ {
        self.groups.keys().copied()
    }

    pub fn coordination_of(&self, specialty: &str) -> Option<Coordination> {
        self.groups
            .iter()
            .find(|(_, set)| set.contains(specialty))
            .map(|(coordination, _)| *coordination)
    }

    pub fn contains(&self, specialty: &str) -> bool {
        self.groups.values().any(|set| set.contains(specialty))
    }

    /// Total number of specialties across all buckets.
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
