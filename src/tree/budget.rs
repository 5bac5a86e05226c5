//! Pick budgets per power category

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;

/// Sum active benefits into a budget for every category in the catalog
///
/// Tier categories collect the benefits of every tier up to and including
/// `tier`. Tree categories collect the benefits of the tree's active nodes.
/// Categories with nothing active are present with a budget of zero.
pub fn category_budgets(
    catalog: &Catalog,
    tier: Option<usize>,
    trees: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeMap<String, u32> {
    let mut budgets: BTreeMap<String, u32> = catalog
        .categories()
        .map(|(category, _)| (category.id.clone(), 0))
        .collect();

    if let Some(held) = tier {
        for config in catalog.good_tidings().tiers.iter().take(held + 1) {
            add_benefits(&mut budgets, &config.benefits);
        }
    }

    for tree in catalog.trees() {
        let Some(active) = trees.get(&tree.id) else {
            continue;
        };
        for node in active.iter().filter_map(|id| tree.node(id)) {
            add_benefits(&mut budgets, &node.benefits);
        }
    }

    budgets
}

#[inline]
fn add_benefits(budgets: &mut BTreeMap<String, u32>, benefits: &BTreeMap<String, u32>) {
    for (category, &amount) in benefits {
        *budgets.entry(category.clone()).or_insert(0) += amount;
    }
}
