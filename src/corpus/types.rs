use std::collections::BTreeMap;
use std::fmt;

/// Outcome rank of a submission within one event.
///
/// Ordering follows podium position, so placement maps iterate
/// 1st, 2nd, 3rd, other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    First,
    Second,
    Third,
    Other,
}

impl Rank {
    /// Classify a rank folder by substring on its lowercased name.
    pub fn classify(folder_name: &str) -> Rank {
        let name = folder_name.to_lowercase();
        if name.contains("1st") {
            Rank::First
        } else if name.contains("2nd") {
            Rank::Second
        } else if name.contains("3rd") {
            Rank::Third
        } else {
            Rank::Other
        }
    }

    /// Map a user-typed ordinal ("1st", "first", ...) to its rank.
    pub fn from_ordinal(token: &str) -> Option<Rank> {
        match token {
            "1st" | "first" => Some(Rank::First),
            "2nd" | "second" => Some(Rank::Second),
            "3rd" | "third" => Some(Rank::Third),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Rank::First => "1st",
            Rank::Second => "2nd",
            Rank::Third => "3rd",
            Rank::Other => "other",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalized event identifier, e.g. `gtoc5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey(String);

impl EventKey {
    /// Lowercase and strip whitespace, so "GTOC 5" and "gtoc5" collide.
    pub fn normalize(raw: &str) -> Self {
        Self(
            raw.chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect(),
        )
    }

    pub fn from_number(prefix: &str, number: u32) -> Self {
        Self::normalize(&format!("{}{}", prefix, number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rank → extracted document text for one event. Never empty inside an index.
pub type PlacementMap = BTreeMap<Rank, String>;

/// Problem-statement snippets used as the style reference for synthesis.
pub type ProblemSample = Vec<String>;
