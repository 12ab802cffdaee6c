use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Headline topics understood by the news API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Topic {
    pub const ALL: [Self; 8] = [
        Self::World,
        Self::Nation,
        Self::Business,
        Self::Technology,
        Self::Entertainment,
        Self::Sports,
        Self::Science,
        Self::Health,
    ];

    /// Used for the home page when the user has not picked any categories.
    pub const HOME_DEFAULTS: [Self; 3] = [Self::Technology, Self::Business, Self::Science];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Nation => "nation",
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Entertainment => "entertainment",
            Self::Sports => "sports",
            Self::Science => "science",
            Self::Health => "health",
        }
    }

    /// "technology" -> "Technology"
    #[must_use]
    pub fn title(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown topic: {needle}"))
    }
}
