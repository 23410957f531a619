//! Derived per-player figures.

use crate::PlayerRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role a player is classified into for stat layouts and leaderboards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No role distinction
    General,
    /// Baseball position player
    Hitter,
    /// Baseball pitcher
    Pitcher,
    /// Football quarterback
    Quarterback,
    /// Football running back or fullback
    RunningBack,
    /// Football wide receiver or tight end
    Receiver,
}

/// Where a figure is read from on a [`SeasonAggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stat", rename_all = "snake_case")]
pub enum StatSource {
    /// Season total of a counting stat
    Total(String),
    /// Per-qualifying-game average of a counting stat
    Average(String),
    /// Named ratio stat computed sum-then-divide
    Ratio(String),
    /// Number of qualifying games
    Games,
}

impl StatSource {
    /// Total of `stat`.
    pub fn total(stat: impl Into<String>) -> Self {
        StatSource::Total(stat.into())
    }

    /// Average of `stat`.
    pub fn average(stat: impl Into<String>) -> Self {
        StatSource::Average(stat.into())
    }

    /// Ratio named `name`.
    pub fn ratio(name: impl Into<String>) -> Self {
        StatSource::Ratio(name.into())
    }
}

/// Season totals, averages and ratios for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonAggregate {
    /// Player the figures belong to
    pub player: PlayerRef,
    /// Classified role
    pub role: Role,
    /// Number of qualifying records
    pub games: u32,
    /// Sum of every counting stat across qualifying records
    pub totals: BTreeMap<String, f64>,
    /// `totals / games`
    pub averages: BTreeMap<String, f64>,
    /// Ratio stats; absent when the denominator summed to zero
    pub ratios: BTreeMap<String, f64>,
}

impl SeasonAggregate {
    /// Read a figure. Missing totals and averages read as zero, a ratio with
    /// no denominator reads as `None`.
    pub fn value(&self, source: &StatSource) -> Option<f64> {
        match source {
            StatSource::Total(stat) => Some(sum_named(&self.totals, stat)),
            StatSource::Average(stat) => Some(sum_named(&self.averages, stat)),
            StatSource::Ratio(name) => self.ratios.get(name).copied(),
            StatSource::Games => Some(f64::from(self.games)),
        }
    }
}

fn sum_named(map: &BTreeMap<String, f64>, stat: &str) -> f64 {
    stat.split('+')
        .map(|part| map.get(part.trim()).copied().unwrap_or(0.0))
        .sum()
}

/// Average of one statistic over a player's most recent games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    /// Player the figure belongs to
    pub player: PlayerRef,
    /// Statistic requested
    pub stat: String,
    /// Games actually used (at most the requested window)
    pub games: u32,
    /// Average, or ratio for ratio stats
    pub value: f64,
}
