//! Node selection and cascade removal
//!
//! One routine serves every tree. Trees only interact through the shared
//! sigil ledger passed in by the caller.

use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

use crate::catalog::{CategoryConfig, SigilKind, Tree, TreeRule};
use crate::sigil::SigilLedger;

/// Why a node selection was absorbed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeRejection {
    #[error("unknown node")]
    UnknownNode,

    #[error("already active")]
    AlreadyActive,

    #[error("prerequisite {0} is not active")]
    MissingPrerequisite(String),

    #[error("tree already holds {0} nodes")]
    CapReached(usize),

    #[error("no {} sigil available", .0.key())]
    NoCapacity(SigilKind),
}

/// Check whether `id` may become active
pub fn check_select(
    tree: &Tree,
    active: &BTreeSet<String>,
    id: &str,
    ledger: &SigilLedger,
) -> Result<SigilKind, NodeRejection> {
    let node = tree.node(id).ok_or(NodeRejection::UnknownNode)?;
    if active.contains(id) {
        return Err(NodeRejection::AlreadyActive);
    }

    match tree.rule {
        TreeRule::Prerequisite => {
            if let Some(missing) = node.prerequisites.iter().find(|p| !active.contains(*p)) {
                return Err(NodeRejection::MissingPrerequisite(missing.clone()));
            }
        }
        TreeRule::Paired { cap } => {
            if active.len() >= cap {
                return Err(NodeRejection::CapReached(cap));
            }
        }
    }

    if ledger.available(node.sigil) <= 0 {
        return Err(NodeRejection::NoCapacity(node.sigil));
    }
    Ok(node.sigil)
}

/// Activate `id` if allowed; nothing else changes
pub fn select_node(
    tree: &Tree,
    active: &mut BTreeSet<String>,
    id: &str,
    ledger: &SigilLedger,
) -> Result<(), NodeRejection> {
    check_select(tree, active, id, ledger)?;
    active.insert(id.to_string());
    Ok(())
}

/// Active nodes that go away when `root` is deselected, `root` included
///
/// Breadth-first over the dependents index. Paired trees have no chains,
/// so only `root` is removed.
pub fn cascade_closure(tree: &Tree, active: &BTreeSet<String>, root: &str) -> BTreeSet<String> {
    let mut removed = BTreeSet::new();
    if !active.contains(root) {
        return removed;
    }
    removed.insert(root.to_string());
    if matches!(tree.rule, TreeRule::Paired { .. }) {
        return removed;
    }

    let mut queue = VecDeque::from([root.to_string()]);
    while let Some(current) = queue.pop_front() {
        for dependent in tree.dependents(&current) {
            if active.contains(dependent) && removed.insert(dependent.clone()) {
                queue.push_back(dependent.clone());
            }
        }
    }
    removed
}

/// Deselect `id` and everything that depends on it
///
/// Returns the removed closure, or `None` if `id` was not active.
pub fn deselect_node(
    tree: &Tree,
    active: &mut BTreeSet<String>,
    id: &str,
) -> Option<BTreeSet<String>> {
    if !active.contains(id) {
        return None;
    }
    let removed = cascade_closure(tree, active, id);
    active.retain(|node| !removed.contains(node));
    Some(removed)
}

/// Whether a power's backing nodes allow it to be held
#[inline]
pub fn power_supported(requires: &[String], active: &BTreeSet<String>) -> bool {
    requires.is_empty() || requires.iter().any(|r| active.contains(r))
}

/// Drop selected powers whose `requires` no longer intersects `active`
///
/// Returns the ids that were removed.
pub fn prune_powers(
    category: &CategoryConfig,
    active: &BTreeSet<String>,
    selected: &mut BTreeSet<String>,
) -> Vec<String> {
    let orphaned: Vec<String> = selected
        .iter()
        .filter(|id| {
            category
                .power(id)
                .is_some_and(|power| !power_supported(&power.requires, active))
        })
        .cloned()
        .collect();

    for id in &orphaned {
        selected.remove(id);
    }
    orphaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TreeConfig;

    fn tree(json: &str) -> Tree {
        let config: TreeConfig = serde_json::from_str(json).unwrap();
        Tree::build(config).unwrap()
    }

    fn chain() -> Tree {
        tree(
            r#"{
                "id": "chain",
                "nodes": [
                    {"id": "root", "image": "kaarn.png"},
                    {"id": "left", "image": "kaarn.png", "prerequisites": ["root"]},
                    {"id": "right", "image": "purth.png", "prerequisites": ["root"]},
                    {"id": "deep", "image": "kaarn.png", "prerequisites": ["left", "right"]},
                    {"id": "lone", "image": "kaarn.png"}
                ],
                "categories": [{
                    "id": "spells",
                    "powers": [
                        {"id": "bolt", "requires": ["left", "deep"]},
                        {"id": "ward", "requires": ["lone"]},
                        {"id": "spark"}
                    ]
                }]
            }"#,
        )
    }

    fn plenty() -> SigilLedger {
        let mut ledger = SigilLedger::default();
        for kind in SigilKind::ALL {
            ledger.total[kind] = 10;
        }
        ledger
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_requires_all_prerequisites() {
        let tree = chain();
        let mut active = set(&["root", "left"]);
        assert_eq!(
            select_node(&tree, &mut active, "deep", &plenty()),
            Err(NodeRejection::MissingPrerequisite("right".to_string()))
        );
        assert_eq!(active, set(&["root", "left"]));

        select_node(&tree, &mut active, "right", &plenty()).unwrap();
        select_node(&tree, &mut active, "deep", &plenty()).unwrap();
        assert_eq!(active.len(), 4);
    }

    #[test]
    fn test_select_requires_capacity() {
        let tree = chain();
        let mut active = BTreeSet::new();
        let mut ledger = SigilLedger::default();
        assert_eq!(
            select_node(&tree, &mut active, "root", &ledger),
            Err(NodeRejection::NoCapacity(SigilKind::Kaarn))
        );
        ledger.total[SigilKind::Kaarn] = 1;
        assert!(select_node(&tree, &mut active, "root", &ledger).is_ok());
        assert_eq!(
            select_node(&tree, &mut active, "root", &ledger),
            Err(NodeRejection::AlreadyActive)
        );
        assert_eq!(
            select_node(&tree, &mut active, "ghost", &ledger),
            Err(NodeRejection::UnknownNode)
        );
    }

    #[test]
    fn test_cascade_removes_descendants_only() {
        let tree = chain();
        let mut active = set(&["root", "left", "right", "deep", "lone"]);
        let removed = deselect_node(&tree, &mut active, "left").unwrap();
        assert_eq!(removed, set(&["left", "deep"]));
        assert_eq!(active, set(&["root", "right", "lone"]));

        let removed = deselect_node(&tree, &mut active, "root").unwrap();
        assert_eq!(removed, set(&["root", "right"]));
        assert_eq!(active, set(&["lone"]));

        assert!(deselect_node(&tree, &mut active, "root").is_none());
    }

    #[test]
    fn test_prune_powers_by_requires() {
        let tree = chain();
        let category = &tree.categories[0];
        let mut selected = set(&["bolt", "ward", "spark"]);

        // deep still backs bolt; ward loses lone
        let pruned = prune_powers(category, &set(&["deep"]), &mut selected);
        assert_eq!(pruned, vec!["ward".to_string()]);
        assert_eq!(selected, set(&["bolt", "spark"]));

        let pruned = prune_powers(category, &set(&["root"]), &mut selected);
        assert_eq!(pruned, vec!["bolt".to_string()]);
        assert_eq!(selected, set(&["spark"]));
    }

    #[test]
    fn test_paired_tree_caps_without_cascade() {
        let tree = tree(
            r#"{
                "id": "pacts",
                "rule": {"paired": {"cap": 2}},
                "nodes": [
                    {"id": "p1", "image": "kaarn.png"},
                    {"id": "p2", "image": "kaarn.png"},
                    {"id": "p3", "image": "kaarn.png"}
                ]
            }"#,
        );
        let mut active = BTreeSet::new();
        select_node(&tree, &mut active, "p1", &plenty()).unwrap();
        select_node(&tree, &mut active, "p2", &plenty()).unwrap();
        assert_eq!(
            select_node(&tree, &mut active, "p3", &plenty()),
            Err(NodeRejection::CapReached(2))
        );
        assert_eq!(deselect_node(&tree, &mut active, "p1"), Some(set(&["p1"])));
        assert!(select_node(&tree, &mut active, "p3", &plenty()).is_ok());
    }
}
