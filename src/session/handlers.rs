//! Write intents
//!
//! Every intent either applies fully and returns `true`, or is absorbed
//! as a no-op and returns `false`. Absorbed intents are logged at debug
//! level with the reason. Accepted intents settle dependent state and then
//! recompute every derived value.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::balance::{MAX_PARENTS, MAX_SIBLINGS};
use crate::catalog::{
    Acquisition, CategorySource, CustomSpell, OptionGroup, SigilConfig, SigilKind,
};
use crate::selection::adjust_count;
use crate::session::{derive, BuildSession};
use crate::sigil::compute_ledger;
use crate::tree::{category_budgets, power_supported, prune_powers, resolve_tier_move};

/// Log an absorbed intent and report it as not applied
fn absorb(intent: &str, target: &str, reason: impl Display) -> bool {
    log::debug!("{} {}: absorbed, {}", intent, target, reason);
    false
}

impl BuildSession {
    // ------------------------------------------------------------------------
    // Option groups
    // ------------------------------------------------------------------------

    /// Toggle `id` in a single-choice group
    pub fn toggle_single(&mut self, group: OptionGroup, id: &str) -> bool {
        if let Err(reason) = self.check_single(group, Some(id)) {
            return absorb("toggle_single", id, reason);
        }

        let was_multiplayer = self.is_multiplayer();
        self.state.selections.toggle_single(group, id);
        self.after_single_change(group, was_multiplayer);
        true
    }

    /// Assign a single-choice group directly; `None` clears it
    pub fn set_single(&mut self, group: OptionGroup, id: Option<&str>) -> bool {
        if let Err(reason) = self.check_single(group, id) {
            return absorb("set_single", id.unwrap_or("-"), reason);
        }

        let was_multiplayer = self.is_multiplayer();
        if self.state.selections.set_single(group, id) {
            self.after_single_change(group, was_multiplayer);
        }
        true
    }

    fn check_single(&self, group: OptionGroup, id: Option<&str>) -> Result<(), String> {
        if !group.is_single() {
            return Err(format!("{} is not a single-choice group", group.key()));
        }
        if let Some(id) = id {
            if self.catalog.option(group, id).is_none() {
                return Err(format!("not an option of {}", group.key()));
            }
        }
        if group == OptionGroup::Headmaster && self.is_multiplayer() {
            return Err("headmaster is locked in multiplayer".to_string());
        }
        Ok(())
    }

    fn after_single_change(&mut self, group: OptionGroup, was_multiplayer: bool) {
        if group == OptionGroup::BuildType && !was_multiplayer && self.is_multiplayer() {
            self.enter_multiplayer();
        }
        self.commit();
    }

    /// Lock the headmaster and drop classmates and colleagues
    pub(super) fn enter_multiplayer(&mut self) {
        let Some(rule) = self.catalog.multiplayer() else {
            return;
        };
        log::debug!("entering multiplayer: headmaster locked to {}", rule.headmaster);
        self.state
            .selections
            .set_single(OptionGroup::Headmaster, Some(rule.headmaster.as_str()));
        self.state.selections.clear_multi(OptionGroup::Classmates);
        self.state.selections.clear_multi(OptionGroup::Colleagues);
        self.commit();
    }

    /// Toggle `id` in a multi-choice group, respecting the group cap
    pub fn toggle_multi(&mut self, group: OptionGroup, id: &str) -> bool {
        if group.is_single() {
            return absorb("toggle_multi", id, format!("{} is single-choice", group.key()));
        }
        if self.catalog.option(group, id).is_none() {
            return absorb("toggle_multi", id, format!("not an option of {}", group.key()));
        }
        if !self.state.selections.toggle_multi(group, id) {
            return absorb("toggle_multi", id, format!("{} is full", group.key()));
        }
        self.commit();
        true
    }

    pub fn set_parents(&mut self, parents: u32) -> bool {
        if parents > MAX_PARENTS {
            return absorb("set_parents", &parents.to_string(), "out of range");
        }
        self.state.parents = parents;
        self.commit();
        true
    }

    pub fn set_siblings(&mut self, siblings: u32) -> bool {
        if siblings > MAX_SIBLINGS {
            return absorb("set_siblings", &siblings.to_string(), "out of range");
        }
        self.state.siblings = siblings;
        self.commit();
        true
    }

    /// Set a custom spell name; empty text clears it
    pub fn set_custom_spell(&mut self, spell: CustomSpell, text: &str) -> bool {
        if text.is_empty() {
            self.state.custom_spells.remove(&spell);
        } else {
            self.state.custom_spells.insert(spell, text.to_string());
        }
        true
    }

    // ------------------------------------------------------------------------
    // Sigil acquisitions
    // ------------------------------------------------------------------------

    pub fn buy_sigil(&mut self, kind: SigilKind) -> bool {
        if !self.is_purchasable(kind) {
            return absorb("buy_sigil", kind.key(), "not purchasable");
        }
        if !adjust_count(&mut self.state.holdings.purchased, &kind, 1) {
            return absorb("buy_sigil", kind.key(), "count limit reached");
        }
        self.commit();
        true
    }

    pub fn sell_sigil(&mut self, kind: SigilKind) -> bool {
        if !self.is_purchasable(kind) {
            return absorb("sell_sigil", kind.key(), "not purchasable");
        }
        if self.available(kind) <= 0 {
            return absorb("sell_sigil", kind.key(), "no unused unit to sell");
        }
        if !adjust_count(&mut self.state.holdings.purchased, &kind, -1) {
            return absorb("sell_sigil", kind.key(), "none owned");
        }
        self.commit();
        true
    }

    fn is_purchasable(&self, kind: SigilKind) -> bool {
        self.catalog
            .sigil(kind)
            .is_some_and(|s| matches!(s.acquisition, Acquisition::Purchase))
    }

    /// Owning kind of `id` if its sigil is acquired the way `accepts` expects
    fn acquisition_kind(&self, id: &str, accepts: fn(&SigilConfig) -> bool) -> Option<SigilKind> {
        let kind = self.catalog.acquisition_owner(id)?;
        self.catalog.sigil(kind).filter(|s| accepts(s)).map(|_| kind)
    }

    /// Toggle a sub-option pick that grants one unit of its sigil
    pub fn toggle_sigil_choice(&mut self, id: &str) -> bool {
        let Some(kind) =
            self.acquisition_kind(id, |s| matches!(s.acquisition, Acquisition::SubOption(_)))
        else {
            return absorb("toggle_sigil_choice", id, "not a sigil sub-option");
        };

        if self.state.holdings.sub_options.contains(id) {
            if self.available(kind) <= 0 {
                return absorb("toggle_sigil_choice", id, "its unit is in use");
            }
            self.state.holdings.sub_options.remove(id);
        } else {
            self.state.holdings.sub_options.insert(id.to_string());
        }
        self.commit();
        true
    }

    pub fn buy_job(&mut self, id: &str) -> bool {
        if self.job_kind(id).is_none() {
            return absorb("buy_job", id, "not a job");
        }
        if !adjust_count(&mut self.state.holdings.jobs, &id.to_string(), 1) {
            return absorb("buy_job", id, "count limit reached");
        }
        self.commit();
        true
    }

    pub fn sell_job(&mut self, id: &str) -> bool {
        let Some(kind) = self.job_kind(id) else {
            return absorb("sell_job", id, "not a job");
        };
        if self.available(kind) <= 0 {
            return absorb("sell_job", id, "no unused unit to release");
        }
        if !adjust_count(&mut self.state.holdings.jobs, &id.to_string(), -1) {
            return absorb("sell_job", id, "none held");
        }
        self.commit();
        true
    }

    fn job_kind(&self, id: &str) -> Option<SigilKind> {
        self.acquisition_kind(id, |s| matches!(s.acquisition, Acquisition::Job(_)))
    }

    // ------------------------------------------------------------------------
    // Boosts
    // ------------------------------------------------------------------------

    /// Toggle a boost using the first of its sigil kinds with capacity
    pub fn toggle_boost(&mut self, category: &str) -> bool {
        if self.state.boosts.remove(category).is_some() {
            self.commit();
            return true;
        }

        let kinds = match self.boost_kinds(category) {
            Ok(kinds) => kinds,
            Err(reason) => return absorb("toggle_boost", category, reason),
        };
        let Some(kind) = kinds.into_iter().find(|&k| self.available(k) > 0) else {
            return absorb("toggle_boost", category, "no sigil available");
        };
        self.state.boosts.insert(category.to_string(), kind);
        self.commit();
        true
    }

    /// Toggle a boost paying with a chosen sigil kind
    pub fn toggle_boost_with(&mut self, category: &str, kind: SigilKind) -> bool {
        if self.state.boosts.remove(category).is_some() {
            self.commit();
            return true;
        }

        let kinds = match self.boost_kinds(category) {
            Ok(kinds) => kinds,
            Err(reason) => return absorb("toggle_boost_with", category, reason),
        };
        if !kinds.contains(&kind) {
            return absorb("toggle_boost_with", category, format!("cannot use {}", kind.key()));
        }
        if self.available(kind) <= 0 {
            return absorb("toggle_boost_with", category, format!("no {} available", kind.key()));
        }
        self.state.boosts.insert(category.to_string(), kind);
        self.commit();
        true
    }

    fn boost_kinds(&self, category: &str) -> Result<Vec<SigilKind>, &'static str> {
        let (config, _) = self.catalog.category(category).ok_or("unknown category")?;
        if config.boost.is_empty() {
            return Err("category has no boost");
        }
        if self.budget(category) == 0 {
            return Err("category has no picks");
        }
        Ok(config.boost.to_vec())
    }

    // ------------------------------------------------------------------------
    // Tiers
    // ------------------------------------------------------------------------

    /// Move along the Good Tidings track; `None` drops every tier
    pub fn select_tier(&mut self, id: Option<&str>) -> bool {
        let Some(id) = id else {
            if self.state.tier.is_none() {
                return absorb("select_tier", "-", "no tier held");
            }
            self.state.tier = None;
            self.commit();
            return true;
        };

        let track = self.catalog.good_tidings();
        let Some(requested) = track.position(id) else {
            return absorb("select_tier", id, "unknown tier");
        };
        match resolve_tier_move(track, self.state.tier, requested, &self.derived.ledger) {
            Ok(next) => {
                self.state.tier = next;
                self.commit();
                true
            }
            Err(reason) => absorb("select_tier", id, reason),
        }
    }

    // ------------------------------------------------------------------------
    // Tree nodes
    // ------------------------------------------------------------------------

    /// Select `node` if inactive, otherwise deselect it with its cascade
    pub fn toggle_node(&mut self, tree: &str, node: &str) -> bool {
        if self.is_node_active(tree, node) {
            self.deselect_node(tree, node)
        } else {
            self.select_node(tree, node)
        }
    }

    pub fn select_node(&mut self, tree_id: &str, node: &str) -> bool {
        let Some(tree) = self.catalog.tree(tree_id) else {
            return absorb("select_node", node, "unknown tree");
        };

        let mut active = self.state.trees.remove(tree_id).unwrap_or_default();
        let result = crate::tree::select_node(tree, &mut active, node, &self.derived.ledger);
        if !active.is_empty() {
            self.state.trees.insert(tree_id.to_string(), active);
        }

        match result {
            Ok(()) => {
                self.commit();
                true
            }
            Err(reason) => absorb("select_node", node, reason),
        }
    }

    /// Deselect `node`, everything depending on it, and orphaned powers
    pub fn deselect_node(&mut self, tree_id: &str, node: &str) -> bool {
        let Some(tree) = self.catalog.tree(tree_id) else {
            return absorb("deselect_node", node, "unknown tree");
        };
        let Some(active) = self.state.trees.get_mut(tree_id) else {
            return absorb("deselect_node", node, "not active");
        };
        let Some(removed) = crate::tree::deselect_node(tree, active, node) else {
            return absorb("deselect_node", node, "not active");
        };
        if removed.len() > 1 {
            log::debug!("cascade from {} removed {:?}", node, removed);
        }

        let active = active.clone();
        if active.is_empty() {
            self.state.trees.remove(tree_id);
        }
        for category in &tree.categories {
            let Some(selected) = self.state.powers.get_mut(&category.id) else {
                continue;
            };
            let pruned = prune_powers(category, &active, selected);
            if !pruned.is_empty() {
                log::debug!("pruned {:?} from {}", pruned, category.id);
            }
            if selected.is_empty() {
                self.state.powers.remove(&category.id);
            }
        }

        self.commit();
        true
    }

    // ------------------------------------------------------------------------
    // Powers
    // ------------------------------------------------------------------------

    /// Toggle a leaf power within its category's pick budget
    pub fn toggle_power(&mut self, category_id: &str, power_id: &str) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some((category, source)) = catalog.category(category_id) else {
            return absorb("toggle_power", power_id, "unknown category");
        };
        let Some(power) = category.power(power_id) else {
            return absorb("toggle_power", power_id, "not in category");
        };

        if let Some(selected) = self.state.powers.get_mut(category_id) {
            if selected.remove(power_id) {
                if selected.is_empty() {
                    self.state.powers.remove(category_id);
                }
                self.commit();
                return true;
            }
        }

        let empty = BTreeSet::new();
        let active = match source {
            CategorySource::Tiers => &empty,
            CategorySource::Tree(t) => self
                .state
                .active_nodes(&catalog.trees()[t].id)
                .unwrap_or(&empty),
        };
        if !power_supported(&power.requires, active) {
            return absorb("toggle_power", power_id, "no backing node is active");
        }
        if self.picks_remaining(category_id) == 0 {
            return absorb("toggle_power", power_id, "no picks left");
        }

        self.state
            .powers
            .entry(category_id.to_string())
            .or_default()
            .insert(power_id.to_string());
        self.commit();
        true
    }

    // ------------------------------------------------------------------------
    // Recompute
    // ------------------------------------------------------------------------

    /// Settle dependent state, then recompute derived values
    ///
    /// - Tier categories with no picks drop their selections.
    /// - Boosts on categories with no picks are released.
    /// - Boosts are released while any sigil kind is overdrawn.
    fn commit(&mut self) {
        let catalog = &*self.catalog;
        let state = &mut self.state;

        let budgets = category_budgets(catalog, state.tier, &state.trees);
        let has_picks = |category: &str| budgets.get(category).copied().unwrap_or(0) > 0;

        for (category, source) in catalog.categories() {
            if source == CategorySource::Tiers
                && !has_picks(category.id.as_str())
                && state.powers.remove(&category.id).is_some()
            {
                log::debug!("tier dropped: cleared {}", category.id);
            }
        }

        state.boosts.retain(|category, _| {
            let keep = has_picks(category.as_str());
            if !keep {
                log::debug!("boost on {} released: no picks", category);
            }
            keep
        });

        loop {
            let ledger = compute_ledger(
                catalog,
                &state.holdings,
                state.tier,
                &state.trees,
                &state.boosts,
            );
            let Some(kind) = ledger.overdrawn() else {
                break;
            };
            let Some(category) = state
                .boosts
                .iter()
                .rev()
                .find(|(_, k)| **k == kind)
                .map(|(category, _)| category.clone())
            else {
                break;
            };
            log::debug!("boost on {} released: {} overdrawn", category, kind.key());
            state.boosts.remove(&category);
        }

        self.derived = derive(catalog, state);
    }
}
