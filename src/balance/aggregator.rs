//! Balance aggregation over the full selection state

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::balance::{parent_cost, sibling_cost};
use crate::catalog::{Catalog, OptionGroup};
use crate::cost::Cost;
use crate::selection::SelectionStore;
use crate::sigil::SigilHoldings;

/// Allowance both currencies start from
pub const STARTING_POINTS: i32 = 100;

/// Fortune taken off characters born in the chosen dominion
pub const ORIGIN_DISCOUNT: i32 = 2;

static FORTUNE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Costs -(\d+)\s*FP").expect("fortune label pattern is valid"));

/// Final currency balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    pub blessing_points: i32,
    pub fortune_points: i32,
    /// Total signed spend behind the balances
    pub spent: Cost,
}

impl Default for Balances {
    fn default() -> Self {
        Self::from_spent(Cost::ZERO)
    }
}

impl Balances {
    pub fn from_spent(spent: Cost) -> Self {
        Self {
            blessing_points: STARTING_POINTS.saturating_sub(spent.blessing),
            fortune_points: STARTING_POINTS.saturating_sub(spent.fortune),
            spent,
        }
    }
}

/// Uppercased title of the selected dominion
pub fn origin_title(catalog: &Catalog, selections: &SelectionStore) -> Option<String> {
    let id = selections.single(OptionGroup::Dominion)?;
    let option = catalog.option(OptionGroup::Dominion, id)?;
    let title = if option.title.is_empty() {
        &option.id
    } else {
        &option.title
    };
    Some(title.to_uppercase())
}

/// Whether option `id` in `group` was born in `origin`
pub fn discount_applies(
    catalog: &Catalog,
    group: OptionGroup,
    id: &str,
    origin: Option<&str>,
) -> bool {
    let Some(origin) = origin else {
        return false;
    };
    group.has_origin_discount()
        && catalog
            .option(group, id)
            .and_then(|option| option.birthplace.as_deref())
            .is_some_and(|birthplace| birthplace.to_uppercase() == origin)
}

/// Cost of a selected option after the origin discount
pub fn option_cost(catalog: &Catalog, group: OptionGroup, id: &str, origin: Option<&str>) -> Cost {
    let mut cost = catalog.cost_of(id);
    if cost.fortune > 0 && discount_applies(catalog, group, id, origin) {
        cost.fortune = (cost.fortune - ORIGIN_DISCOUNT).max(0);
    }
    cost
}

/// Cost label for display, with the origin discount applied
pub fn adjusted_cost_label(
    catalog: &Catalog,
    group: OptionGroup,
    id: &str,
    origin: Option<&str>,
) -> Option<String> {
    let option = catalog.option(group, id)?;
    if !discount_applies(catalog, group, id, origin) {
        return Some(option.cost.clone());
    }

    let label = FORTUNE_LABEL_RE.replace(&option.cost, |caps: &Captures| {
        let amount: i32 = caps[1].parse().unwrap_or(0);
        if amount > ORIGIN_DISCOUNT {
            format!("Costs -{} FP", amount - ORIGIN_DISCOUNT)
        } else {
            "Costs 0 FP".to_string()
        }
    });
    Some(label.into_owned())
}

/// Sum every selected and acquired cost into the two balances
pub fn compute_balances(
    catalog: &Catalog,
    selections: &SelectionStore,
    holdings: &SigilHoldings,
    parents: u32,
    siblings: u32,
) -> Balances {
    let origin = origin_title(catalog, selections);
    let origin = origin.as_deref();

    let mut spent: Cost = selections
        .iter()
        .map(|(group, id)| option_cost(catalog, group, id, origin))
        .sum();

    for (&kind, &count) in &holdings.purchased {
        spent += catalog.cost_of(kind.key()).times(count);
    }
    for id in &holdings.sub_options {
        spent += catalog.cost_of(id);
    }
    for (id, &count) in &holdings.jobs {
        spent += catalog.cost_of(id).times(count);
    }

    spent += parent_cost(parents);
    spent += sibling_cost(siblings);

    Balances::from_spent(spent)
}
