//! Tier track configuration (Good Tidings)

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::catalog::{CategoryConfig, SigilKind};

/// One step of the ordered tier progression
#[derive(Debug, Clone, Deserialize)]
pub struct TierConfig {
    pub id: String,
    /// Kind consumed by holding this tier
    pub sigil: SigilKind,
    /// Picks this tier adds on top of the tiers below it
    #[serde(default)]
    pub benefits: BTreeMap<String, u32>,
}

/// Ordered tiers plus the boon categories they unlock
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TierTrackConfig {
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl TierTrackConfig {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.id == id)
    }
}
