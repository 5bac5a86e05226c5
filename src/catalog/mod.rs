//! Catalog module for the builder's static data
//!
//! The catalog is loaded once from JSON, validated, and then shared
//! read-only by every session.

mod option;
mod sigil;
mod tier;
mod tree;

pub use option::*;
pub use sigil::*;
pub use tier::*;
pub use tree::*;

use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::balance::{MAX_PARENTS, MAX_SIBLINGS};
use crate::cost::{Cost, CostCache};
use crate::error::{BuildError, Result};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

fn default_parents() -> u32 {
    2
}

/// Values a fresh session starts with
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDefaults {
    /// Pre-populated single-choice slots
    #[serde(default)]
    pub singles: BTreeMap<OptionGroup, String>,
    #[serde(default = "default_parents")]
    pub parents: u32,
    #[serde(default)]
    pub siblings: u32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            singles: BTreeMap::new(),
            parents: default_parents(),
            siblings: 0,
        }
    }
}

/// Build type that switches on multiplayer, and the headmaster it locks in
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplayerRule {
    pub build_type: String,
    pub headmaster: String,
}

/// Where a power category gets its pick budget from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    Tiers,
    Tree(usize),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    options: BTreeMap<OptionGroup, Vec<OptionConfig>>,
    #[serde(default)]
    sigils: Vec<SigilConfig>,
    #[serde(default)]
    good_tidings: TierTrackConfig,
    #[serde(default)]
    trees: Vec<TreeConfig>,
    #[serde(default)]
    defaults: SessionDefaults,
    #[serde(default)]
    multiplayer: Option<MultiplayerRule>,
}

/// Validated static data
#[derive(Debug)]
pub struct Catalog {
    options: BTreeMap<OptionGroup, Vec<OptionConfig>>,
    option_index: AHashMap<String, (OptionGroup, usize)>,
    sigils: [Option<SigilConfig>; SigilKind::COUNT],
    /// Sub-option and job ids to the sigil they grant
    acquisition_owner: AHashMap<String, SigilKind>,
    good_tidings: TierTrackConfig,
    trees: Vec<Tree>,
    tree_index: AHashMap<String, usize>,
    category_index: AHashMap<String, (CategorySource, usize)>,
    defaults: SessionDefaults,
    multiplayer: Option<MultiplayerRule>,
    costs: CostCache,
}

impl Catalog {
    /// Parse and validate a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::build(file)
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    fn build(file: CatalogFile) -> Result<Self> {
        let mut option_index = AHashMap::new();
        for (group, options) in &file.options {
            for (i, option) in options.iter().enumerate() {
                if option_index.insert(option.id.clone(), (*group, i)).is_some() {
                    return Err(BuildError::DuplicateId(option.id.clone()));
                }
            }
        }

        let mut sigils: [Option<SigilConfig>; SigilKind::COUNT] = std::array::from_fn(|_| None);
        let mut acquisition_owner = AHashMap::new();
        for sigil in file.sigils {
            let owned: &[String] = match &sigil.acquisition {
                Acquisition::Purchase => &[],
                Acquisition::SubOption(ids) | Acquisition::Job(ids) => ids.as_slice(),
            };
            for id in owned {
                if option_index.contains_key(id)
                    || acquisition_owner.insert(id.clone(), sigil.kind).is_some()
                {
                    return Err(BuildError::DuplicateId(id.clone()));
                }
            }
            let slot = &mut sigils[sigil.kind.index()];
            if slot.is_some() {
                return Err(BuildError::DuplicateId(sigil.kind.key().to_string()));
            }
            *slot = Some(sigil);
        }

        let mut category_index = AHashMap::new();
        for (i, category) in file.good_tidings.categories.iter().enumerate() {
            if let Some(power) = category.powers.iter().find(|p| !p.requires.is_empty()) {
                return Err(BuildError::UnknownRequirement {
                    category: category.id.clone(),
                    power: power.id.clone(),
                    node: power.requires[0].clone(),
                });
            }
            if category_index
                .insert(category.id.clone(), (CategorySource::Tiers, i))
                .is_some()
            {
                return Err(BuildError::DuplicateId(category.id.clone()));
            }
        }
        for tier in &file.good_tidings.tiers {
            if let Some(unknown) = tier
                .benefits
                .keys()
                .find(|k| !file.good_tidings.categories.iter().any(|c| &c.id == *k))
            {
                return Err(BuildError::UnknownCategory(unknown.clone()));
            }
        }

        let mut trees = Vec::with_capacity(file.trees.len());
        let mut tree_index = AHashMap::new();
        for config in file.trees {
            let tree = Tree::build(config)?;
            let position = trees.len();
            if tree_index.insert(tree.id.clone(), position).is_some() {
                return Err(BuildError::DuplicateId(tree.id.clone()));
            }
            for (i, category) in tree.categories.iter().enumerate() {
                if category_index
                    .insert(category.id.clone(), (CategorySource::Tree(position), i))
                    .is_some()
                {
                    return Err(BuildError::DuplicateId(category.id.clone()));
                }
            }
            for node in tree.nodes() {
                if let Some(unknown) = node
                    .benefits
                    .keys()
                    .find(|k| !tree.categories.iter().any(|c| &c.id == *k))
                {
                    return Err(BuildError::UnknownCategory(unknown.clone()));
                }
            }
            trees.push(tree);
        }

        let catalog = Self {
            options: file.options,
            option_index,
            sigils,
            acquisition_owner,
            good_tidings: file.good_tidings,
            trees,
            tree_index,
            category_index,
            defaults: file.defaults,
            multiplayer: file.multiplayer,
            costs: CostCache::default(),
        };
        catalog.validate_defaults()?;

        log::info!(
            "loaded catalog: {} options, {} trees, {} tiers",
            catalog.option_index.len(),
            catalog.trees.len(),
            catalog.good_tidings.tiers.len()
        );

        Ok(catalog)
    }

    fn validate_defaults(&self) -> Result<()> {
        for (group, id) in &self.defaults.singles {
            if !group.is_single() || self.option(*group, id).is_none() {
                return Err(BuildError::InvalidDefault(format!("{}={}", group.key(), id)));
            }
        }
        if self.defaults.parents > MAX_PARENTS {
            return Err(BuildError::InvalidDefault(format!(
                "parents={}",
                self.defaults.parents
            )));
        }
        if self.defaults.siblings > MAX_SIBLINGS {
            return Err(BuildError::InvalidDefault(format!(
                "siblings={}",
                self.defaults.siblings
            )));
        }
        if let Some(rule) = &self.multiplayer {
            if self.option(OptionGroup::BuildType, &rule.build_type).is_none() {
                return Err(BuildError::InvalidDefault(format!(
                    "multiplayer build_type={}",
                    rule.build_type
                )));
            }
            if self.option(OptionGroup::Headmaster, &rule.headmaster).is_none() {
                return Err(BuildError::InvalidDefault(format!(
                    "multiplayer headmaster={}",
                    rule.headmaster
                )));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Option `id` if it belongs to `group`
    pub fn option(&self, group: OptionGroup, id: &str) -> Option<&OptionConfig> {
        match self.option_index.get(id) {
            Some(&(owner, i)) if owner == group => self.options.get(&group).map(|o| &o[i]),
            _ => None,
        }
    }

    pub fn options(&self, group: OptionGroup) -> &[OptionConfig] {
        self.options.get(&group).map(|o| o.as_slice()).unwrap_or(&[])
    }

    pub fn sigil(&self, kind: SigilKind) -> Option<&SigilConfig> {
        self.sigils[kind.index()].as_ref()
    }

    /// Sigil granted by a sub-option or job id
    pub fn acquisition_owner(&self, id: &str) -> Option<SigilKind> {
        self.acquisition_owner.get(id).copied()
    }

    pub fn good_tidings(&self) -> &TierTrackConfig {
        &self.good_tidings
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn tree(&self, id: &str) -> Option<&Tree> {
        self.tree_index.get(id).map(|&i| &self.trees[i])
    }

    pub fn category(&self, id: &str) -> Option<(&CategoryConfig, CategorySource)> {
        let &(source, i) = self.category_index.get(id)?;
        let category = match source {
            CategorySource::Tiers => &self.good_tidings.categories[i],
            CategorySource::Tree(t) => &self.trees[t].categories[i],
        };
        Some((category, source))
    }

    /// Every power category, tier categories first
    pub fn categories(&self) -> impl Iterator<Item = (&CategoryConfig, CategorySource)> {
        let tiers = self
            .good_tidings
            .categories
            .iter()
            .map(|c| (c, CategorySource::Tiers));
        let trees = self.trees.iter().enumerate().flat_map(|(t, tree)| {
            tree.categories
                .iter()
                .map(move |c| (c, CategorySource::Tree(t)))
        });
        tiers.chain(trees)
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    pub fn multiplayer(&self) -> Option<&MultiplayerRule> {
        self.multiplayer.as_ref()
    }

    /// Parsed cost of an option, sigil kind, sub-option or job id
    ///
    /// Sub-options and jobs are priced per unit of the sigil they grant.
    /// Unknown ids cost nothing.
    pub fn cost_of(&self, id: &str) -> Cost {
        let text = if let Some(&(group, i)) = self.option_index.get(id) {
            self.options.get(&group).map(|o| o[i].cost.as_str())
        } else if let Some(kind) = SigilKind::from_key(id).or_else(|| self.acquisition_owner(id)) {
            self.sigil(kind).map(|s| s.cost.as_str())
        } else {
            None
        };

        match text {
            Some(text) => self.costs.get_or_parse(id, text),
            None => Cost::ZERO,
        }
    }
}
