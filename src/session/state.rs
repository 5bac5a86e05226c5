//! Session state and its derived values

use std::collections::{BTreeMap, BTreeSet};

use crate::balance::{compute_balances, Balances};
use crate::catalog::{Catalog, CustomSpell, SigilKind};
use crate::selection::SelectionStore;
use crate::sigil::{compute_ledger, SigilHoldings, SigilLedger};
use crate::tree::category_budgets;

/// Everything the user has chosen
///
/// Only the session's write intents mutate this; derived values are
/// recomputed from it after every accepted intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildState {
    pub selections: SelectionStore,
    pub parents: u32,
    pub siblings: u32,
    pub holdings: SigilHoldings,
    /// Index of the held Good Tidings tier
    pub tier: Option<usize>,
    /// Active node ids per tree id
    pub trees: BTreeMap<String, BTreeSet<String>>,
    /// Selected power ids per category id
    pub powers: BTreeMap<String, BTreeSet<String>>,
    /// Boosted category ids and the sigil kind each consumes
    pub boosts: BTreeMap<String, SigilKind>,
    pub custom_spells: BTreeMap<CustomSpell, String>,
}

impl BuildState {
    /// Fresh state populated from the catalog defaults
    pub fn from_defaults(catalog: &Catalog) -> Self {
        let defaults = catalog.defaults();
        let mut state = Self {
            parents: defaults.parents,
            siblings: defaults.siblings,
            ..Self::default()
        };
        for (group, id) in &defaults.singles {
            state.selections.set_single(*group, Some(id.as_str()));
        }
        state
    }

    pub fn active_nodes(&self, tree: &str) -> Option<&BTreeSet<String>> {
        self.trees.get(tree)
    }

    pub fn selected_powers(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.powers.get(category)
    }
}

/// Values recomputed from a [`BuildState`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    pub ledger: SigilLedger,
    /// Pick budget per category id
    pub budgets: BTreeMap<String, u32>,
    pub balances: Balances,
}

/// Recompute every derived value from scratch
///
/// Pure: the same state always yields the same result.
pub fn derive(catalog: &Catalog, state: &BuildState) -> Derived {
    let ledger = compute_ledger(
        catalog,
        &state.holdings,
        state.tier,
        &state.trees,
        &state.boosts,
    );
    let budgets = category_budgets(catalog, state.tier, &state.trees);
    let balances = compute_balances(
        catalog,
        &state.selections,
        &state.holdings,
        state.parents,
        state.siblings,
    );

    Derived {
        ledger,
        budgets,
        balances,
    }
}
