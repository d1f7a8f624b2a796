//! Quiz goals and their catalog tag mappings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A primary goal a shopper can select on the first quiz step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    MuscleGrowth,
    Healing,
    Libido,
    AntiAging,
    Energy,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown goal `{0}` (expected fat_loss|muscle_growth|healing|libido|anti_aging|energy)")]
pub struct UnknownGoal(pub String);

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::FatLoss,
        Goal::MuscleGrowth,
        Goal::Healing,
        Goal::Libido,
        Goal::AntiAging,
        Goal::Energy,
    ];

    /// Catalog tags a product must carry to match this goal.
    ///
    /// This table is merchandising policy and the recommendation contract
    /// depends on it verbatim; change entries only together with the seed
    /// catalog's tags.
    pub fn matching_tags(self) -> &'static [&'static str] {
        match self {
            Goal::FatLoss => &["fat loss", "weight loss", "stubborn fat"],
            Goal::MuscleGrowth => &["muscle", "gh", "growth", "strength"],
            Goal::Healing => &["healing", "recovery", "injury", "regeneration"],
            Goal::Libido => &["libido", "sexual health", "arousal"],
            Goal::AntiAging => &["anti-aging", "gh", "longevity"],
            Goal::Energy => &["gh", "muscle", "performance", "strength"],
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Goal::FatLoss => "fat_loss",
            Goal::MuscleGrowth => "muscle_growth",
            Goal::Healing => "healing",
            Goal::Libido => "libido",
            Goal::AntiAging => "anti_aging",
            Goal::Energy => "energy",
        }
    }

    /// Display label used by interactive surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Goal::FatLoss => "Fat Loss",
            Goal::MuscleGrowth => "Muscle Growth",
            Goal::Healing => "Healing & Recovery",
            Goal::Libido => "Libido Enhancement",
            Goal::AntiAging => "Anti-Aging",
            Goal::Energy => "Energy & Performance",
        }
    }
}

impl std::str::FromStr for Goal {
    type Err = UnknownGoal;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fat_loss" => Ok(Goal::FatLoss),
            "muscle_growth" => Ok(Goal::MuscleGrowth),
            "healing" => Ok(Goal::Healing),
            "libido" => Ok(Goal::Libido),
            "anti_aging" => Ok(Goal::AntiAging),
            "energy" => Ok(Goal::Energy),
            other => Err(UnknownGoal(other.to_string())),
        }
    }
}
