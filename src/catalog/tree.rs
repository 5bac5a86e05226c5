//! Prerequisite tree tables
//!
//! Trees are immutable lookup tables keyed by identifier. Traversal goes
//! through the `dependents` index instead of node references.

use ahash::AHashMap;
use serde::Deserialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::catalog::SigilKind;
use crate::error::{BuildError, Result};

/// Selection rule for a tree's nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeRule {
    /// Prerequisites gate selection; deselection cascades to dependents
    Prerequisite,
    /// No prerequisites, at most `cap` active nodes, no cascade
    Paired { cap: usize },
}

impl Default for TreeRule {
    fn default() -> Self {
        TreeRule::Prerequisite
    }
}

/// Tree node as written in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    /// Overrides the kind inferred from `image`
    #[serde(default)]
    pub sigil: Option<SigilKind>,
    #[serde(default)]
    pub prerequisites: SmallVec<[String; 2]>,
    /// Picks contributed per power category while active
    #[serde(default)]
    pub benefits: BTreeMap<String, u32>,
}

/// Leaf power
#[derive(Debug, Clone, Deserialize)]
pub struct PowerConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Nodes that back this power; empty means unconditional
    #[serde(default)]
    pub requires: SmallVec<[String; 2]>,
}

/// A category of leaf powers budgeted by node or tier benefits
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub id: String,
    /// Sigil kinds a boost may consume, in preference order
    #[serde(default)]
    pub boost: SmallVec<[SigilKind; 2]>,
    #[serde(default)]
    pub powers: Vec<PowerConfig>,
}

impl CategoryConfig {
    pub fn power(&self, id: &str) -> Option<&PowerConfig> {
        self.powers.iter().find(|p| p.id == id)
    }
}

/// Tree as written in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    pub id: String,
    #[serde(default)]
    pub rule: TreeRule,
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Validated node with its resolved sigil kind
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub sigil: SigilKind,
    pub prerequisites: SmallVec<[String; 2]>,
    pub benefits: BTreeMap<String, u32>,
}

/// Validated, indexed tree
#[derive(Debug, Clone)]
pub struct Tree {
    pub id: String,
    pub rule: TreeRule,
    nodes: Vec<Node>,
    node_index: AHashMap<String, usize>,
    dependents: AHashMap<String, SmallVec<[String; 4]>>,
    pub categories: Vec<CategoryConfig>,
}

impl Tree {
    /// Validate a tree config and build its lookup tables
    pub fn build(config: TreeConfig) -> Result<Self> {
        let mut node_index = AHashMap::with_capacity(config.nodes.len());
        for (i, node) in config.nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), i).is_some() {
                return Err(BuildError::DuplicateId(format!("{}/{}", config.id, node.id)));
            }
        }

        let mut nodes = Vec::with_capacity(config.nodes.len());
        let mut dependents: AHashMap<String, SmallVec<[String; 4]>> = AHashMap::new();

        for node in config.nodes {
            let sigil = node
                .sigil
                .or_else(|| SigilKind::from_image(&node.image))
                .ok_or_else(|| BuildError::UnresolvedSigil {
                    tree: config.id.clone(),
                    node: node.id.clone(),
                })?;

            for prerequisite in &node.prerequisites {
                if !node_index.contains_key(prerequisite) {
                    return Err(BuildError::UnknownPrerequisite {
                        tree: config.id.clone(),
                        node: node.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
                dependents
                    .entry(prerequisite.clone())
                    .or_default()
                    .push(node.id.clone());
            }

            nodes.push(Node {
                id: node.id,
                title: node.title,
                sigil,
                prerequisites: node.prerequisites,
                benefits: node.benefits,
            });
        }

        for category in &config.categories {
            for power in &category.powers {
                if let Some(missing) = power.requires.iter().find(|r| !node_index.contains_key(*r)) {
                    return Err(BuildError::UnknownRequirement {
                        category: category.id.clone(),
                        power: power.id.clone(),
                        node: missing.clone(),
                    });
                }
            }
        }

        Ok(Self {
            id: config.id,
            rule: config.rule,
            nodes,
            node_index,
            dependents,
            categories: config.categories,
        })
    }

    #[inline]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes that list `id` as a prerequisite
    #[inline]
    pub fn dependents(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(|d| d.as_slice()).unwrap_or(&[])
    }
}
