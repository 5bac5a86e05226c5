//! Option group definitions

use serde::{Deserialize, Serialize};

/// How many identifiers a group may hold at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    /// At most one active identifier
    Single,
    /// A set of identifiers, optionally capped
    Multi { max: Option<usize> },
}

/// Every selection group the builder exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionGroup {
    // Birth
    Dominion,
    Traits,
    House,
    HouseUpgrades,
    TrueSelfTraits,
    AlterEgoTraits,
    Uniform,
    MagicalStyles,
    BuildType,
    // Schooling
    Headmaster,
    Teachers,
    Duration,
    Clubs,
    MiscActivities,
    Classmates,
    // Sigils & magic
    BlessingEngraving,
    LimitlessPotentialRunes,
    // Career
    Allmillor,
    CareerGoals,
    Colleagues,
    CustomColleague,
    // Retirement
    Retirement,
    ChildOfGod,
}

impl OptionGroup {
    pub const ALL: [OptionGroup; 23] = [
        OptionGroup::Dominion,
        OptionGroup::Traits,
        OptionGroup::House,
        OptionGroup::HouseUpgrades,
        OptionGroup::TrueSelfTraits,
        OptionGroup::AlterEgoTraits,
        OptionGroup::Uniform,
        OptionGroup::MagicalStyles,
        OptionGroup::BuildType,
        OptionGroup::Headmaster,
        OptionGroup::Teachers,
        OptionGroup::Duration,
        OptionGroup::Clubs,
        OptionGroup::MiscActivities,
        OptionGroup::Classmates,
        OptionGroup::BlessingEngraving,
        OptionGroup::LimitlessPotentialRunes,
        OptionGroup::Allmillor,
        OptionGroup::CareerGoals,
        OptionGroup::Colleagues,
        OptionGroup::CustomColleague,
        OptionGroup::Retirement,
        OptionGroup::ChildOfGod,
    ];

    pub const fn shape(self) -> GroupShape {
        match self {
            OptionGroup::Dominion
            | OptionGroup::House
            | OptionGroup::Uniform
            | OptionGroup::BuildType
            | OptionGroup::Headmaster
            | OptionGroup::Duration
            | OptionGroup::BlessingEngraving
            | OptionGroup::CustomColleague
            | OptionGroup::Retirement
            | OptionGroup::ChildOfGod => GroupShape::Single,
            OptionGroup::Teachers => GroupShape::Multi { max: Some(5) },
            OptionGroup::Allmillor => GroupShape::Multi { max: Some(3) },
            _ => GroupShape::Multi { max: None },
        }
    }

    #[inline]
    pub const fn is_single(self) -> bool {
        matches!(self.shape(), GroupShape::Single)
    }

    /// Groups whose members get cheaper when born in the user's dominion
    #[inline]
    pub const fn has_origin_discount(self) -> bool {
        matches!(self, OptionGroup::Classmates | OptionGroup::Colleagues)
    }

    pub const fn key(self) -> &'static str {
        match self {
            OptionGroup::Dominion => "dominion",
            OptionGroup::Traits => "traits",
            OptionGroup::House => "house",
            OptionGroup::HouseUpgrades => "house_upgrades",
            OptionGroup::TrueSelfTraits => "true_self_traits",
            OptionGroup::AlterEgoTraits => "alter_ego_traits",
            OptionGroup::Uniform => "uniform",
            OptionGroup::MagicalStyles => "magical_styles",
            OptionGroup::BuildType => "build_type",
            OptionGroup::Headmaster => "headmaster",
            OptionGroup::Teachers => "teachers",
            OptionGroup::Duration => "duration",
            OptionGroup::Clubs => "clubs",
            OptionGroup::MiscActivities => "misc_activities",
            OptionGroup::Classmates => "classmates",
            OptionGroup::BlessingEngraving => "blessing_engraving",
            OptionGroup::LimitlessPotentialRunes => "limitless_potential_runes",
            OptionGroup::Allmillor => "allmillor",
            OptionGroup::CareerGoals => "career_goals",
            OptionGroup::Colleagues => "colleagues",
            OptionGroup::CustomColleague => "custom_colleague",
            OptionGroup::Retirement => "retirement",
            OptionGroup::ChildOfGod => "child_of_god",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }
}

/// A selectable option
#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Human-readable cost, e.g. "Costs -3 FP" or "Grants +5 BP"
    #[serde(default)]
    pub cost: String,
    /// Dominion the option's character was born in
    #[serde(default)]
    pub birthplace: Option<String>,
}

/// Free-text custom spell slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomSpell {
    Ruhai,
    Mialgrath,
}

impl CustomSpell {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ruhai" => Some(CustomSpell::Ruhai),
            "mialgrath" => Some(CustomSpell::Mialgrath),
            _ => None,
        }
    }
}
