//! Ranked league leaders.

use crate::PlayerRef;
use serde::{Deserialize, Serialize};

/// Sort direction of a leaderboard category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Higher is better
    Descending,
    /// Lower is better (ERA, WHIP)
    Ascending,
}

impl SortOrder {
    /// Provider query value (`desc` / `asc`).
    pub fn as_query(self) -> &'static str {
        match self {
            SortOrder::Descending => "desc",
            SortOrder::Ascending => "asc",
        }
    }
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: u32,
    /// Ranked player
    pub player: PlayerRef,
    /// Figure the player was ranked by
    pub value: f64,
}

/// Leaders for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLeaders {
    /// Category label, e.g. "Home Runs"
    pub category: String,
    /// Ranked entries, best first
    pub entries: Vec<LeaderboardEntry>,
}

/// Leaders for every category of a league, in category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Categories in configured order
    pub categories: Vec<CategoryLeaders>,
}

impl Leaderboard {
    /// Entries for a category label.
    pub fn get(&self, category: &str) -> Option<&[LeaderboardEntry]> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.entries.as_slice())
    }

    /// True when no category has any entry.
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.entries.is_empty())
    }
}
