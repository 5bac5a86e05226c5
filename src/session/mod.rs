//! Build session - one user's choices and everything derived from them
//!
//! A session owns its state outright and shares the catalog read-only, so
//! independent sessions never interfere. Write intents live in `handlers`;
//! this file holds construction and the read surface.

mod handlers;
mod state;


pub use state::*;

use std::sync::Arc;

use crate::balance::{adjusted_cost_label, origin_title, Balances};
use crate::catalog::{Catalog, CustomSpell, OptionGroup, SigilKind};
use crate::sigil::SigilLedger;
use crate::tree::check_select;

// ============================================================================
// BuildSession
// ============================================================================

/// Selection-and-budget engine for a single build
#[derive(Debug, Clone)]
pub struct BuildSession {
    catalog: Arc<Catalog>,
    state: BuildState,
    derived: Derived,
}

impl BuildSession {
    /// Start a session from the catalog defaults
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let state = BuildState::from_defaults(&catalog);
        let derived = derive(&catalog, &state);
        let mut session = Self {
            catalog,
            state,
            derived,
        };
        if session.is_multiplayer() {
            session.enter_multiplayer();
        }
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &BuildState {
        &self.state
    }

    /// Derived values as of the last accepted intent
    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// Recompute derived values from the current state without storing them
    pub fn recompute(&self) -> Derived {
        derive(&self.catalog, &self.state)
    }

    // ------------------------------------------------------------------------
    // Balances
    // ------------------------------------------------------------------------

    pub fn balances(&self) -> Balances {
        self.derived.balances
    }

    #[inline]
    pub fn blessing_points(&self) -> i32 {
        self.derived.balances.blessing_points
    }

    #[inline]
    pub fn fortune_points(&self) -> i32 {
        self.derived.balances.fortune_points
    }

    /// Cost label for an option, with the origin discount applied
    pub fn display_cost(&self, group: OptionGroup, id: &str) -> Option<String> {
        let origin = origin_title(&self.catalog, &self.state.selections);
        adjusted_cost_label(&self.catalog, group, id, origin.as_deref())
    }

    // ------------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------------

    pub fn single(&self, group: OptionGroup) -> Option<&str> {
        self.state.selections.single(group)
    }

    pub fn multi(&self, group: OptionGroup) -> impl Iterator<Item = &str> {
        self.state.selections.multi(group)
    }

    pub fn is_selected(&self, group: OptionGroup, id: &str) -> bool {
        self.state.selections.contains(group, id)
    }

    pub fn parents(&self) -> u32 {
        self.state.parents
    }

    pub fn siblings(&self) -> u32 {
        self.state.siblings
    }

    /// Whether the build type switches on multiplayer mode
    pub fn is_multiplayer(&self) -> bool {
        self.catalog.multiplayer().is_some_and(|rule| {
            self.state.selections.single(OptionGroup::BuildType) == Some(rule.build_type.as_str())
        })
    }

    pub fn custom_spell(&self, spell: CustomSpell) -> Option<&str> {
        self.state.custom_spells.get(&spell).map(String::as_str)
    }

    // ------------------------------------------------------------------------
    // Sigils
    // ------------------------------------------------------------------------

    pub fn ledger(&self) -> &SigilLedger {
        &self.derived.ledger
    }

    #[inline]
    pub fn available(&self, kind: SigilKind) -> i32 {
        self.derived.ledger.available(kind)
    }

    pub fn purchased(&self, kind: SigilKind) -> u32 {
        self.state.holdings.purchased.get(&kind).copied().unwrap_or(0)
    }

    pub fn job_count(&self, id: &str) -> u32 {
        self.state.holdings.jobs.get(id).copied().unwrap_or(0)
    }

    pub fn is_sigil_choice_selected(&self, id: &str) -> bool {
        self.state.holdings.sub_options.contains(id)
    }

    // ------------------------------------------------------------------------
    // Trees, tiers and powers
    // ------------------------------------------------------------------------

    /// Held Good Tidings tier id
    pub fn tier(&self) -> Option<&str> {
        let held = self.state.tier?;
        self.catalog
            .good_tidings()
            .tiers
            .get(held)
            .map(|t| t.id.as_str())
    }

    pub fn active_nodes(&self, tree: &str) -> impl Iterator<Item = &str> {
        self.state
            .active_nodes(tree)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_node_active(&self, tree: &str, node: &str) -> bool {
        self.state
            .active_nodes(tree)
            .is_some_and(|active| active.contains(node))
    }

    /// Whether selecting `node` would currently be accepted
    pub fn can_select_node(&self, tree: &str, node: &str) -> bool {
        let Some(tree) = self.catalog.tree(tree) else {
            return false;
        };
        let empty = Default::default();
        let active = self.state.active_nodes(&tree.id).unwrap_or(&empty);
        check_select(tree, active, node, &self.derived.ledger).is_ok()
    }

    /// Pick budget for a power category
    pub fn budget(&self, category: &str) -> u32 {
        self.derived.budgets.get(category).copied().unwrap_or(0)
    }

    /// Picks left in a category; zero when over budget
    pub fn picks_remaining(&self, category: &str) -> u32 {
        let selected = self.state.selected_powers(category).map_or(0, |s| s.len());
        self.budget(category).saturating_sub(selected as u32)
    }

    pub fn powers(&self, category: &str) -> impl Iterator<Item = &str> {
        self.state
            .selected_powers(category)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_power_selected(&self, category: &str, power: &str) -> bool {
        self.state
            .selected_powers(category)
            .is_some_and(|selected| selected.contains(power))
    }

    /// Sigil kind a boosted category consumes
    pub fn boost(&self, category: &str) -> Option<SigilKind> {
        self.state.boosts.get(category).copied()
    }

    pub fn is_boosted(&self, category: &str) -> bool {
        self.state.boosts.contains_key(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BuildSession {
        BuildSession::new(Arc::new(Catalog::builtin().unwrap()))
    }

    /// Buy sigils until `kind` has `count` available
    fn stock(session: &mut BuildSession, kind: SigilKind, count: i32) {
        while session.available(kind) < count {
            assert!(session.buy_sigil(kind));
        }
    }

    #[test]
    fn test_defaults() {
        let session = session();
        assert_eq!(session.blessing_points(), 100);
        assert_eq!(session.fortune_points(), 100);
        assert_eq!(session.single(OptionGroup::Headmaster), Some("competent"));
        assert_eq!(session.single(OptionGroup::Duration), Some("6_years"));
        assert_eq!(session.single(OptionGroup::Dominion), Some("halidew"));
        assert_eq!(session.parents(), 2);
        assert_eq!(session.siblings(), 0);
        assert_eq!(session.tier(), None);
        assert!(!session.is_multiplayer());
        assert_eq!(session.recompute(), *session.derived());
    }

    /// Scenario 1: no parents grants 20 fortune points
    #[test]
    fn test_zero_parents_grant() {
        let mut session = session();
        assert!(session.set_parents(0));
        assert_eq!(session.balances().spent.fortune, -20);
        assert_eq!(session.fortune_points(), 120);
    }

    /// Scenario 2: the default two parents cost nothing
    #[test]
    fn test_two_parents_cost_nothing() {
        let mut session = session();
        assert!(session.set_parents(5));
        assert!(session.set_parents(2));
        assert_eq!(session.fortune_points(), 100);
        assert!(!session.set_parents(7));
        assert!(!session.set_siblings(9));
        assert_eq!(session.parents(), 2);
    }

    /// Scenario 3: unmet prerequisites leave the state untouched
    #[test]
    fn test_unmet_prerequisite_rejected() {
        let mut session = session();
        stock(&mut session, SigilKind::Kaarn, 3);
        stock(&mut session, SigilKind::Purth, 3);
        let before = session.state().clone();
        let balances = session.balances();

        assert!(!session.can_select_node("compelling_will", "cw_push"));
        assert!(!session.select_node("compelling_will", "cw_push"));
        assert_eq!(session.state(), &before);
        assert_eq!(session.balances(), balances);

        assert!(session.select_node("compelling_will", "cw_root"));
        assert!(session.can_select_node("compelling_will", "cw_push"));
        assert!(session.select_node("compelling_will", "cw_push"));
    }

    /// Scenario 4: classmates from the chosen dominion are 2 FP cheaper
    #[test]
    fn test_origin_discount_in_label_and_balance() {
        let mut session = session();
        assert_eq!(session.display_cost(OptionGroup::Classmates, "ione").as_deref(), Some("Costs -2 FP"));
        assert!(session.toggle_multi(OptionGroup::Classmates, "ione"));
        assert_eq!(session.fortune_points(), 98);

        assert!(session.set_single(OptionGroup::Dominion, Some("valmorra")));
        assert_eq!(session.display_cost(OptionGroup::Classmates, "ione").as_deref(), Some("Costs -4 FP"));
        assert_eq!(session.fortune_points(), 96);

        // marisol is from Valmorra: 3 FP becomes 1 FP
        assert!(session.toggle_multi(OptionGroup::Classmates, "marisol"));
        assert_eq!(session.display_cost(OptionGroup::Classmates, "marisol").as_deref(), Some("Costs -1 FP"));
        assert_eq!(session.fortune_points(), 95);
    }

    /// Scenario 5: tier upgrades need the tier's sigil
    #[test]
    fn test_tier_capacity() {
        let mut session = session();
        assert!(!session.select_tier(Some("master")));
        assert_eq!(session.tier(), None);

        stock(&mut session, SigilKind::Kaarn, 1);
        let before = session.available(SigilKind::Kaarn);
        assert!(session.select_tier(Some("standard")));
        assert_eq!(session.tier(), Some("standard"));
        assert_eq!(session.available(SigilKind::Kaarn), before - 1);
        assert_eq!(session.budget("essential"), 3);

        // Master needs journeyman's purth and its own xuth
        assert!(!session.select_tier(Some("master")));
        stock(&mut session, SigilKind::Purth, 1);
        assert!(!session.select_tier(Some("master")));
        assert!(session.toggle_sigil_choice("xuth_crown"));
        assert!(session.select_tier(Some("master")));
        assert_eq!(session.available(SigilKind::Xuth), 0);
        assert_eq!(session.budget("major"), 1);

        // Re-selecting master demotes one step
        assert!(session.select_tier(Some("master")));
        assert_eq!(session.tier(), Some("journeyman"));
        assert_eq!(session.available(SigilKind::Xuth), 1);
    }

    /// Scenario 6: a boost is released when its only pick source goes away
    #[test]
    fn test_boost_released_with_its_budget() {
        let mut session = session();
        stock(&mut session, SigilKind::Juathas, 1);
        assert!(session.toggle_sigil_choice("sinthru_eye"));

        assert!(!session.toggle_boost("black_magic"));
        assert!(session.select_node("lost_hope", "lh_root"));
        assert!(session.budget("black_magic") > 0);
        assert!(session.toggle_boost("black_magic"));
        assert_eq!(session.boost("black_magic"), Some(SigilKind::Sinthru));
        assert_eq!(session.available(SigilKind::Sinthru), 0);

        assert!(session.deselect_node("lost_hope", "lh_root"));
        assert!(!session.is_boosted("black_magic"));
        assert_eq!(session.available(SigilKind::Sinthru), 1);
        assert!(session.ledger().overdrawn().is_none());
    }

    #[test]
    fn test_multiplayer_locks_headmaster_and_clears_companions() {
        let mut session = session();
        assert!(session.toggle_single(OptionGroup::Headmaster, "strict"));
        assert!(session.toggle_multi(OptionGroup::Classmates, "pim"));
        assert!(session.toggle_multi(OptionGroup::Colleagues, "orrin"));

        assert!(session.toggle_single(OptionGroup::BuildType, "multiplayer"));
        assert!(session.is_multiplayer());
        assert_eq!(session.single(OptionGroup::Headmaster), Some("competent"));
        assert_eq!(session.multi(OptionGroup::Classmates).count(), 0);
        assert_eq!(session.multi(OptionGroup::Colleagues).count(), 0);
        assert!(!session.toggle_single(OptionGroup::Headmaster, "doting"));

        // Leaving multiplayer unlocks the headmaster
        assert!(session.set_single(OptionGroup::BuildType, Some("solo")));
        assert!(session.toggle_single(OptionGroup::Headmaster, "doting"));
    }

    #[test]
    fn test_cascade_prunes_orphaned_powers() {
        let mut session = session();
        stock(&mut session, SigilKind::Kaarn, 2);
        stock(&mut session, SigilKind::Purth, 1);
        stock(&mut session, SigilKind::Juathas, 1);
        for node in ["cw_root", "cw_push", "cw_heat", "cw_storm"] {
            assert!(session.toggle_node("compelling_will", node), "{}", node);
        }
        assert_eq!(session.budget("telekinetics"), 3);
        assert_eq!(session.budget("metathermics"), 3);
        for power in ["tk_lift", "tk_throw", "tk_crush"] {
            assert!(session.toggle_power("telekinetics", power));
        }
        assert!(session.toggle_power("metathermics", "mt_freeze"));
        assert!(session.toggle_power("metathermics", "mt_blaze"));

        assert!(session.toggle_node("compelling_will", "cw_push"));
        let active: Vec<_> = session.active_nodes("compelling_will").collect();
        assert_eq!(active, vec!["cw_heat", "cw_root"]);

        let telekinetics: Vec<_> = session.powers("telekinetics").collect();
        assert_eq!(telekinetics, vec!["tk_lift"]);
        let metathermics: Vec<_> = session.powers("metathermics").collect();
        assert_eq!(metathermics, vec!["mt_freeze"]);
        assert_eq!(session.budget("telekinetics"), 1);
        assert_eq!(session.available(SigilKind::Purth), 1);
        assert_eq!(session.available(SigilKind::Juathas), 1);
    }

    #[test]
    fn test_power_needs_backing_node_and_budget() {
        let mut session = session();
        stock(&mut session, SigilKind::Kaarn, 1);
        assert!(!session.toggle_power("telekinetics", "tk_lift"));
        assert!(session.select_node("compelling_will", "cw_root"));
        assert!(!session.toggle_power("telekinetics", "tk_throw"));
        assert!(session.toggle_power("telekinetics", "tk_lift"));
        assert_eq!(session.picks_remaining("telekinetics"), 0);
        assert!(!session.toggle_power("telekinetics", "no_such_power"));
        assert!(!session.toggle_power("nowhere", "tk_lift"));
    }

    #[test]
    fn test_tier_drop_clears_boons() {
        let mut session = session();
        stock(&mut session, SigilKind::Kaarn, 1);
        stock(&mut session, SigilKind::Purth, 2);
        assert!(session.select_tier(Some("journeyman")));
        for boon in ["e1", "e2", "e3"] {
            assert!(session.toggle_power("essential", boon));
        }
        assert!(!session.toggle_power("essential", "e4"));
        assert!(session.toggle_power("minor", "m1"));
        assert!(session.toggle_boost("minor"));
        assert_eq!(session.boost("minor"), Some(SigilKind::Purth));

        // Free downgrade to standard drops minor boons and their boost
        assert!(session.select_tier(Some("standard")));
        assert_eq!(session.powers("minor").count(), 0);
        assert!(!session.is_boosted("minor"));
        assert_eq!(session.powers("essential").count(), 3);

        assert!(session.select_tier(None));
        assert_eq!(session.powers("essential").count(), 0);
        assert_eq!(session.available(SigilKind::Kaarn), 1);
    }

    #[test]
    fn test_sales_never_overdraw() {
        let mut session = session();
        assert!(!session.sell_sigil(SigilKind::Kaarn));
        assert!(session.buy_sigil(SigilKind::Kaarn));
        assert_eq!(session.blessing_points(), 98);
        assert!(session.select_node("compelling_will", "cw_root"));
        assert!(!session.sell_sigil(SigilKind::Kaarn));
        assert!(session.deselect_node("compelling_will", "cw_root"));
        assert!(session.sell_sigil(SigilKind::Kaarn));
        assert_eq!(session.purchased(SigilKind::Kaarn), 0);
        assert_eq!(session.blessing_points(), 100);

        // Xuth comes from sub-options only
        assert!(!session.buy_sigil(SigilKind::Xuth));
        assert!(session.toggle_sigil_choice("xuth_blade"));
        assert!(session.is_sigil_choice_selected("xuth_blade"));
        assert!(!session.toggle_boost_with("black_magic", SigilKind::Xuth));
    }

    #[test]
    fn test_jobs_grant_lekolu() {
        let mut session = session();
        assert!(session.buy_job("lekolu_courier"));
        assert!(session.buy_job("lekolu_guard"));
        assert_eq!(session.ledger().total(SigilKind::Lekolu), 2);
        assert_eq!(session.fortune_points(), 94);
        assert!(!session.buy_job("xuth_crown"));

        assert!(session.select_node("star_crossed_love", "sc_ember"));
        assert!(session.sell_job("lekolu_guard"));
        assert!(!session.sell_job("lekolu_courier"));
        assert_eq!(session.job_count("lekolu_courier"), 1);
        assert!(!session.sell_job("lekolu_guard"));
    }

    #[test]
    fn test_paired_tree_cap() {
        let mut session = session();
        stock(&mut session, SigilKind::Kaarn, 1);
        stock(&mut session, SigilKind::Purth, 1);
        stock(&mut session, SigilKind::Juathas, 1);
        assert!(session.select_node("star_crossed_love", "sc_sun"));
        assert!(session.select_node("star_crossed_love", "sc_moon"));
        assert!(!session.can_select_node("star_crossed_love", "sc_tide"));
        assert!(!session.select_node("star_crossed_love", "sc_tide"));
        assert_eq!(session.budget("pacts"), 2);

        assert!(session.toggle_power("pacts", "pc_oath"));
        assert!(session.deselect_node("star_crossed_love", "sc_sun"));
        assert!(session.is_power_selected("pacts", "pc_oath"));
        assert!(session.deselect_node("star_crossed_love", "sc_moon"));
        assert!(!session.is_power_selected("pacts", "pc_oath"));
    }

    #[test]
    fn test_unknown_targets_are_absorbed() {
        let mut session = session();
        let before = session.state().clone();
        assert!(!session.toggle_single(OptionGroup::Traits, "brave"));
        assert!(!session.toggle_multi(OptionGroup::Headmaster, "strict"));
        assert!(!session.toggle_multi(OptionGroup::Traits, "manor"));
        assert!(!session.set_single(OptionGroup::House, Some("nowhere")));
        assert!(!session.select_node("nowhere", "cw_root"));
        assert!(!session.deselect_node("compelling_will", "cw_root"));
        assert!(!session.select_tier(Some("grandmaster")));
        assert!(!session.toggle_boost("essential"));
        assert!(!session.toggle_sigil_choice("lekolu_guard"));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_custom_spells_are_free_text() {
        let mut session = session();
        let balances = session.balances();
        assert!(session.set_custom_spell(CustomSpell::Ruhai, "Ember Lattice"));
        assert_eq!(session.custom_spell(CustomSpell::Ruhai), Some("Ember Lattice"));
        assert_eq!(session.balances(), balances);
        assert!(session.set_custom_spell(CustomSpell::Ruhai, ""));
        assert_eq!(session.custom_spell(CustomSpell::Ruhai), None);
    }

    #[test]
    fn test_colleague_origin_discount() {
        let mut session = session();
        assert_eq!(
            session.display_cost(OptionGroup::Colleagues, "sable").as_deref(),
            Some("Costs -3 FP")
        );
        assert!(session.toggle_multi(OptionGroup::Colleagues, "sable"));
        assert_eq!(session.fortune_points(), 97);

        // orrin is from Gravenport: full price
        assert_eq!(
            session.display_cost(OptionGroup::Colleagues, "orrin").as_deref(),
            Some("Costs -3 FP")
        );
        assert!(session.toggle_multi(OptionGroup::Colleagues, "orrin"));
        assert_eq!(session.fortune_points(), 94);
    }

    #[test]
    fn test_purchases_stop_at_count_limit() {
        let mut session = session();
        session.state.holdings.purchased.insert(SigilKind::Kaarn, u32::MAX);
        session.state.holdings.jobs.insert("lekolu_guard".to_string(), u32::MAX);
        let before = session.state().clone();

        assert!(!session.buy_sigil(SigilKind::Kaarn));
        assert!(!session.buy_job("lekolu_guard"));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_clearing_absent_tier_is_absorbed() {
        let mut session = session();
        let derived = session.derived().clone();
        assert!(!session.select_tier(None));
        assert_eq!(session.derived(), &derived);

        stock(&mut session, SigilKind::Kaarn, 1);
        assert!(session.select_tier(Some("standard")));
        assert!(session.select_tier(None));
        assert!(!session.select_tier(None));
    }

    #[test]
    fn test_sessions_are_independent() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let mut first = BuildSession::new(Arc::clone(&catalog));
        let second = BuildSession::new(catalog);
        assert!(first.set_parents(0));
        assert_eq!(first.fortune_points(), 120);
        assert_eq!(second.fortune_points(), 100);
    }
}
