//! Sigil holdings and the derived capacity ledger

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Index, IndexMut};

use crate::catalog::{Catalog, SigilKind};

/// Acquired sigil sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigilHoldings {
    /// Units bought directly, by kind
    pub purchased: BTreeMap<SigilKind, u32>,
    /// Chosen sub-options; each grants one unit of its owning kind
    pub sub_options: BTreeSet<String>,
    /// Job acquisitions by job id; each count grants one unit
    pub jobs: BTreeMap<String, u32>,
}

/// One signed counter per sigil kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigilCounts([i32; SigilKind::COUNT]);

impl SigilCounts {
    pub fn iter(&self) -> impl Iterator<Item = (SigilKind, i32)> + '_ {
        SigilKind::ALL.into_iter().map(move |kind| (kind, self[kind]))
    }
}

impl Index<SigilKind> for SigilCounts {
    type Output = i32;

    #[inline]
    fn index(&self, kind: SigilKind) -> &i32 {
        &self.0[kind.index()]
    }
}

impl IndexMut<SigilKind> for SigilCounts {
    #[inline]
    fn index_mut(&mut self, kind: SigilKind) -> &mut i32 {
        &mut self.0[kind.index()]
    }
}

/// Owned versus consumed units per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigilLedger {
    pub total: SigilCounts,
    pub used: SigilCounts,
}

impl SigilLedger {
    #[inline]
    pub fn total(&self, kind: SigilKind) -> i32 {
        self.total[kind]
    }

    #[inline]
    pub fn used(&self, kind: SigilKind) -> i32 {
        self.used[kind]
    }

    #[inline]
    pub fn available(&self, kind: SigilKind) -> i32 {
        self.total[kind] - self.used[kind]
    }

    /// First kind whose usage exceeds its total
    pub fn overdrawn(&self) -> Option<SigilKind> {
        SigilKind::ALL
            .into_iter()
            .find(|&kind| self.available(kind) < 0)
    }
}

/// Recompute the ledger from holdings and everything that consumes units
///
/// `tier` is the index of the held tier; every tier up to and including it
/// consumes one unit of its own kind. `trees` maps tree ids to their active
/// node ids and `boosts` maps boosted categories to the kind they consume.
pub fn compute_ledger(
    catalog: &Catalog,
    holdings: &SigilHoldings,
    tier: Option<usize>,
    trees: &BTreeMap<String, BTreeSet<String>>,
    boosts: &BTreeMap<String, SigilKind>,
) -> SigilLedger {
    let mut ledger = SigilLedger::default();

    for (&kind, &count) in &holdings.purchased {
        ledger.total[kind] += count as i32;
    }
    for id in &holdings.sub_options {
        if let Some(kind) = catalog.acquisition_owner(id) {
            ledger.total[kind] += 1;
        }
    }
    for (id, &count) in &holdings.jobs {
        if let Some(kind) = catalog.acquisition_owner(id) {
            ledger.total[kind] += count as i32;
        }
    }

    for (tree_id, active) in trees {
        let Some(tree) = catalog.tree(tree_id) else {
            continue;
        };
        for node in active.iter().filter_map(|id| tree.node(id)) {
            ledger.used[node.sigil] += 1;
        }
    }

    if let Some(held) = tier {
        for config in catalog.good_tidings().tiers.iter().take(held + 1) {
            ledger.used[config.sigil] += 1;
        }
    }

    for &kind in boosts.values() {
        ledger.used[kind] += 1;
    }

    ledger
}
