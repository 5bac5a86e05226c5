//! Selection groups and their toggle primitives
//!
//! The primitives never fail: an intent that cannot apply leaves the group
//! untouched and reports `false`.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{GroupShape, OptionGroup};

/// Toggle a single-choice slot
///
/// Selecting the active value clears the slot; anything else replaces it.
#[inline]
pub fn toggle_single(slot: &mut Option<String>, id: &str) -> bool {
    if slot.as_deref() == Some(id) {
        *slot = None;
    } else {
        *slot = Some(id.to_string());
    }
    true
}

/// Toggle membership in a multi-choice set
///
/// Removal always applies. Insertion is a no-op once `max` is reached.
#[inline]
pub fn toggle_multi(set: &mut BTreeSet<String>, id: &str, max: Option<usize>) -> bool {
    if set.remove(id) {
        return true;
    }
    if max.is_some_and(|max| set.len() >= max) {
        return false;
    }
    set.insert(id.to_string())
}

/// Apply `delta` to a counted acquisition
///
/// Counts never go below zero; a decrement past zero is a no-op. Zero
/// counts are dropped from the map.
pub fn adjust_count<K: Ord + Clone>(counts: &mut BTreeMap<K, u32>, key: &K, delta: i32) -> bool {
    let current = counts.get(key).copied().unwrap_or(0);
    let next = i64::from(current) + i64::from(delta);
    if delta == 0 || next < 0 || next > i64::from(u32::MAX) {
        return false;
    }
    if next == 0 {
        counts.remove(key);
    } else {
        counts.insert(key.clone(), next as u32);
    }
    true
}

/// Chosen identifiers for every option group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    singles: BTreeMap<OptionGroup, String>,
    multis: BTreeMap<OptionGroup, BTreeSet<String>>,
}

impl SelectionStore {
    /// Active value of a single-choice group
    pub fn single(&self, group: OptionGroup) -> Option<&str> {
        self.singles.get(&group).map(String::as_str)
    }

    /// Members of a multi-choice group
    pub fn multi(&self, group: OptionGroup) -> impl Iterator<Item = &str> {
        self.multis.get(&group).into_iter().flatten().map(String::as_str)
    }

    pub fn multi_len(&self, group: OptionGroup) -> usize {
        self.multis.get(&group).map_or(0, BTreeSet::len)
    }

    pub fn contains(&self, group: OptionGroup, id: &str) -> bool {
        match group.shape() {
            GroupShape::Single => self.single(group) == Some(id),
            GroupShape::Multi { .. } => self.multis.get(&group).is_some_and(|s| s.contains(id)),
        }
    }

    /// Every selected identifier in every group, in group order
    pub fn iter(&self) -> impl Iterator<Item = (OptionGroup, &str)> {
        let singles = self.singles.iter().map(|(g, id)| (*g, id.as_str()));
        let multis = self
            .multis
            .iter()
            .flat_map(|(g, set)| set.iter().map(move |id| (*g, id.as_str())));
        singles.chain(multis)
    }

    pub fn toggle_single(&mut self, group: OptionGroup, id: &str) -> bool {
        debug_assert!(group.is_single());
        let mut slot = self.singles.remove(&group);
        let changed = toggle_single(&mut slot, id);
        if let Some(value) = slot {
            self.singles.insert(group, value);
        }
        changed
    }

    /// Assign a single-choice group directly; returns whether it changed
    pub fn set_single(&mut self, group: OptionGroup, id: Option<&str>) -> bool {
        debug_assert!(group.is_single());
        if self.single(group) == id {
            return false;
        }
        match id {
            Some(id) => {
                self.singles.insert(group, id.to_string());
            }
            None => {
                self.singles.remove(&group);
            }
        }
        true
    }

    pub fn toggle_multi(&mut self, group: OptionGroup, id: &str) -> bool {
        let GroupShape::Multi { max } = group.shape() else {
            return false;
        };
        let set = self.multis.entry(group).or_default();
        let changed = toggle_multi(set, id, max);
        if set.is_empty() {
            self.multis.remove(&group);
        }
        changed
    }

    pub fn clear_multi(&mut self, group: OptionGroup) -> bool {
        self.multis.remove(&group).is_some()
    }
}
