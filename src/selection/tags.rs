//! Multi-select tag fields and nested preference maps.
//!
//! # Responsibilities
//! - Independent tag sets (water_source, garden, shed_details, ...)
//! - District → mandal and mandal → village preference maps
//! - Cross-field invariant: every village entry's parent mandal must still
//!   exist in the flattened mandal selection; orphans are cascade-deleted
//!   on every mandal-level mutation
//!
//! # Design Decisions
//! - Insertion order is preserved for display, so the maps are ordered
//!   pair lists rather than hash maps. The collections are tiny.

use crate::selection::types::{SelectionError, SelectionResult};
use serde::Serialize;

/// Insertion-ordered set of string tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagField {
    values: Vec<String>,
}

impl TagField {
    /// Remove the option if present, append it otherwise.
    pub fn toggle(&mut self, option: &str) {
        if let Some(position) = self.values.iter().position(|v| v == option) {
            self.values.remove(position);
        } else {
            self.values.push(option.to_string());
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        self.values.iter().any(|v| v == option)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Nested district → mandal → village preference selection.
#[derive(Debug, Clone, Default)]
pub struct PreferenceTree {
    districts: TagField,
    mandals: Vec<(String, Vec<String>)>,
    villages: Vec<(String, Vec<String>)>,
}

impl PreferenceTree {
    /// Toggle a preferred district. Deselecting one drops its mandal list
    /// and every village list orphaned by that.
    pub fn toggle_district(&mut self, district: &str) {
        let was_selected = self.districts.contains(district);
        self.districts.toggle(district);

        if was_selected {
            self.mandals.retain(|(parent, _)| parent != district);
            self.purge_orphan_villages();
        }
    }

    /// Toggle a mandal under a selected district.
    pub fn toggle_mandal(&mut self, district: &str, mandal: &str) -> SelectionResult<()> {
        if !self.districts.contains(district) {
            return Err(SelectionError::UnknownParent {
                field: "preferred_mandals",
                parent: district.to_string(),
            });
        }

        toggle_in(&mut self.mandals, district, mandal);
        self.purge_orphan_villages();
        Ok(())
    }

    /// Toggle a village under a selected mandal.
    pub fn toggle_village(&mut self, mandal: &str, village: &str) -> SelectionResult<()> {
        if !self.flattened_mandals().iter().any(|&m| m == mandal) {
            return Err(SelectionError::UnknownParent {
                field: "preferred_villages",
                parent: mandal.to_string(),
            });
        }

        toggle_in(&mut self.villages, mandal, village);
        Ok(())
    }

    /// Every selected mandal, across all districts, in insertion order.
    pub fn flattened_mandals(&self) -> Vec<&str> {
        self.mandals
            .iter()
            .flat_map(|(_, mandals)| mandals.iter().map(String::as_str))
            .collect()
    }

    pub fn districts(&self) -> &[String] {
        self.districts.values()
    }

    pub fn mandals(&self) -> &[(String, Vec<String>)] {
        &self.mandals
    }

    pub fn villages(&self) -> &[(String, Vec<String>)] {
        &self.villages
    }

    /// Invariant check: village parents exist among selected mandals, and
    /// mandal parents among selected districts.
    pub fn is_consistent(&self) -> bool {
        let mandal_set = self.flattened_mandals();
        self.villages
            .iter()
            .all(|(mandal, _)| mandal_set.iter().any(|m| m == mandal))
            && self
                .mandals
                .iter()
                .all(|(district, _)| self.districts.contains(district))
    }

    fn purge_orphan_villages(&mut self) {
        let keep: Vec<String> = self
            .flattened_mandals()
            .iter()
            .map(|m| m.to_string())
            .collect();
        self.villages.retain(|(mandal, _)| keep.contains(mandal));
    }
}

/// Toggle `value` inside the list keyed by `parent`, dropping the key when
/// its list empties.
fn toggle_in(pairs: &mut Vec<(String, Vec<String>)>, parent: &str, value: &str) {
    match pairs.iter_mut().find(|(key, _)| key == parent) {
        Some((_, values)) => {
            if let Some(position) = values.iter().position(|v| v == value) {
                values.remove(position);
            } else {
                values.push(value.to_string());
            }
        }
        None => {
            pairs.push((parent.to_string(), vec![value.to_string()]));
        }
    }
    pairs.retain(|(_, values)| !values.is_empty());
}
