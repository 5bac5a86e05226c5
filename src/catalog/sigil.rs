//! Sigil kinds and how they are acquired

use serde::{Deserialize, Serialize};

/// Resource type consumed by tree nodes, tiers and boosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigilKind {
    Kaarn,
    Purth,
    Juathas,
    Xuth,
    Sinthru,
    Lekolu,
}

impl SigilKind {
    pub const COUNT: usize = 6;

    pub const ALL: [SigilKind; Self::COUNT] = [
        SigilKind::Kaarn,
        SigilKind::Purth,
        SigilKind::Juathas,
        SigilKind::Xuth,
        SigilKind::Sinthru,
        SigilKind::Lekolu,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            SigilKind::Kaarn => "kaarn",
            SigilKind::Purth => "purth",
            SigilKind::Juathas => "juathas",
            SigilKind::Xuth => "xuth",
            SigilKind::Sinthru => "sinthru",
            SigilKind::Lekolu => "lekolu",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Infer the kind from an image key ending in `<kind>.png`
    pub fn from_image(image: &str) -> Option<Self> {
        let stem = image.strip_suffix(".png")?;
        Self::ALL.into_iter().find(|kind| stem.ends_with(kind.key()))
    }
}

/// How units of a sigil kind are obtained
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acquisition {
    /// Bought and sold by count
    Purchase,
    /// Each chosen sub-option grants one unit
    SubOption(Vec<String>),
    /// Each job acquisition grants one unit
    Job(Vec<String>),
}

/// Sigil entry in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct SigilConfig {
    pub kind: SigilKind,
    /// Price of one unit
    #[serde(default)]
    pub cost: String,
    pub acquisition: Acquisition,
}
