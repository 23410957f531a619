//! Per-game statistic records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player as referenced from a stat feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Provider player id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Position as reported by the provider ("Quarterback", "SP", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Team abbreviation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl PlayerRef {
    /// Player with only an id and a name.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: None,
            team: None,
        }
    }

    /// Set the position.
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Set the team abbreviation.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }
}

/// The game (or week) a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRef {
    /// Provider game id; 0 for season summary rows
    pub id: u64,
    /// Game date, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Week number for weekly leagues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
}

impl GameRef {
    /// Game with an id and nothing else.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            date: None,
            week: None,
        }
    }

    /// Set the date.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the week.
    pub fn in_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }
}

/// One player's statistics for one game or one week.
///
/// Missing statistics read as zero. A name of the form `a+b+c` reads as the
/// sum of its parts.
///
/// # Examples
///
/// ```
/// use statline_core::{GameRef, PlayerRef, StatRecord};
///
/// let record = StatRecord::new(PlayerRef::new(1, "A. Guard"), GameRef::new(10))
///     .with_stat("pts", 31.0)
///     .with_stat("reb", 8.0)
///     .with_stat("ast", 11.0);
///
/// assert_eq!(record.stat("pts+reb+ast"), 50.0);
/// assert_eq!(record.stat("blk"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Player the line belongs to
    pub player: PlayerRef,
    /// Game or week the line belongs to
    pub game: GameRef,
    /// Stat name to value
    pub stats: BTreeMap<String, f64>,
}

impl StatRecord {
    /// Empty record for a player and game.
    pub fn new(player: PlayerRef, game: GameRef) -> Self {
        Self {
            player,
            game,
            stats: BTreeMap::new(),
        }
    }

    /// Add or replace one statistic.
    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    /// Value of a statistic, zero when missing.
    pub fn stat(&self, name: &str) -> f64 {
        if name.contains('+') {
            return name.split('+').map(|part| self.stat(part.trim())).sum();
        }
        self.stats.get(name).copied().unwrap_or(0.0)
    }

    /// True when the statistic is recorded with a positive value.
    pub fn has_positive(&self, name: &str) -> bool {
        self.stat(name) > 0.0
    }

    /// True when any statistic is recorded with a non-zero value.
    pub fn has_any_stat(&self) -> bool {
        self.stats.values().any(|v| *v != 0.0)
    }

    /// Chronological key: date first, then week, then game id.
    pub fn chronological_key(&self) -> (Option<NaiveDate>, Option<u32>, u64) {
        (self.game.date, self.game.week, self.game.id)
    }
}

/// Canonical form of a statistic name for loose matching.
///
/// Lower-cases and drops spaces, underscores and dashes so that a projection
/// category such as `"Passing Yards"` matches a box score key `passingYards`.
///
/// ```
/// use statline_core::normalize_stat_key;
///
/// assert_eq!(normalize_stat_key("Passing Yards"), normalize_stat_key("passingYards"));
/// ```
pub fn normalize_stat_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
