//! Maps free-text weather descriptions onto the small set of categories the
//! presentation layer themes itself by.

use serde::{Deserialize, Serialize};

/// Theme category for a weather description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConditionCategory {
    Rain,
    Storm,
    Sunny,
    Snow,
    #[default]
    Default,
}

/// Checked in order; the first group with a matching keyword wins.
const KEYWORD_GROUPS: &[(&[&str], ConditionCategory)] = &[
    (&["rain", "drizzle"], ConditionCategory::Rain),
    (&["thunder", "storm"], ConditionCategory::Storm),
    (&["sun", "clear"], ConditionCategory::Sunny),
    (&["snow", "ice", "blizzard"], ConditionCategory::Snow),
];

impl ConditionCategory {
    /// Classify a description by case-insensitive substring match.
    pub fn classify(description: &str) -> Self {
        let lowered = description.to_lowercase();
        KEYWORD_GROUPS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map_or(Self::Default, |(_, category)| *category)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rain => "Rain",
            Self::Storm => "Storm",
            Self::Sunny => "Sunny",
            Self::Snow => "Snow",
            Self::Default => "Default",
        }
    }
}
