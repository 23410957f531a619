//! Live-feed data: daily games, box scores, projections and alerts.

use crate::{League, PlayerRef, normalize_stat_key};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Played status of a scheduled game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Scheduled, not started
    Unplayed,
    /// In progress
    Live,
    /// Finished
    Completed,
}

/// A team as referenced by the live feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    /// Provider team id
    pub id: u64,
    /// Display abbreviation ("BOS")
    pub abbreviation: String,
}

impl TeamRef {
    /// Team with an id and abbreviation.
    pub fn new(id: u64, abbreviation: impl Into<String>) -> Self {
        Self {
            id,
            abbreviation: abbreviation.into(),
        }
    }
}

/// Running score and clock of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Home team points or runs
    pub home_total: u32,
    /// Away team points or runs
    pub away_total: u32,
    /// Current quarter, 0 before tip-off or kickoff
    pub current_quarter: u32,
    /// Seconds left in the current quarter
    pub seconds_remaining: u32,
    /// Current inning, 0 before first pitch
    pub current_inning: u32,
    /// "Top" or "Bottom"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inning_half: Option<String>,
}

/// One game from the daily games report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Provider game id
    pub id: u64,
    /// Played status
    pub status: GameStatus,
    /// Home team
    pub home: TeamRef,
    /// Away team
    pub away: TeamRef,
    /// Scheduled start, as reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Score and clock
    pub score: ScoreState,
}

impl GameSnapshot {
    /// Game with a status and default everything else.
    pub fn new(id: u64, status: GameStatus, home: TeamRef, away: TeamRef) -> Self {
        Self {
            id,
            status,
            home,
            away,
            start_time: None,
            score: ScoreState::default(),
        }
    }

    /// Replace the score.
    pub fn with_score(mut self, score: ScoreState) -> Self {
        self.score = score;
        self
    }

    /// True when the game is in progress.
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }
}

/// One player's running stat line in a box score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    /// Player the line belongs to
    pub player: PlayerRef,
    /// Stat key (as reported) to value
    pub stats: BTreeMap<String, f64>,
}

impl PlayerLine {
    /// Empty line for a player.
    pub fn new(player: PlayerRef) -> Self {
        Self {
            player,
            stats: BTreeMap::new(),
        }
    }

    /// Add or replace one statistic.
    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    /// Value of a statistic matched on its normalized key, zero when missing.
    pub fn value(&self, stat: &str) -> f64 {
        let wanted = normalize_stat_key(stat);
        self.stats
            .iter()
            .find(|(key, _)| normalize_stat_key(key) == wanted)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

/// Box score of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    /// Provider game id
    pub game_id: u64,
    /// Home team
    pub home: TeamRef,
    /// Away team
    pub away: TeamRef,
    /// Home points or runs
    pub home_total: u32,
    /// Away points or runs
    pub away_total: u32,
    /// Player lines, away side first
    pub players: Vec<PlayerLine>,
}

impl BoxScore {
    /// Line for a player id.
    pub fn player(&self, player_id: u64) -> Option<&PlayerLine> {
        self.players.iter().find(|line| line.player.id == player_id)
    }

    /// Final score summary.
    pub fn final_score(&self, league: League) -> FinalScore {
        FinalScore {
            league,
            game_id: self.game_id,
            home: self.home.clone(),
            away: self.away.clone(),
            home_total: self.home_total,
            away_total: self.away_total,
        }
    }
}

/// One projected figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Category label as reported ("Passing Yards")
    pub category: String,
    /// Projected amount
    pub amount: f64,
}

/// Projections for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    /// Projected player
    pub player: PlayerRef,
    /// Projected figures in reported order
    pub projections: Vec<Projection>,
}

impl PlayerProjection {
    /// Projected amount for a stat, matched on its normalized key.
    pub fn amount(&self, stat: &str) -> Option<&Projection> {
        let wanted = normalize_stat_key(stat);
        self.projections
            .iter()
            .find(|p| normalize_stat_key(&p.category) == wanted)
    }
}

/// Projections for a league keyed by player id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    players: HashMap<u64, PlayerProjection>,
}

impl ProjectionTable {
    /// Build a table; a later entry for the same player replaces an earlier one.
    pub fn new(entries: impl IntoIterator<Item = PlayerProjection>) -> Self {
        Self {
            players: entries.into_iter().map(|p| (p.player.id, p)).collect(),
        }
    }

    /// Projections for a player.
    pub fn get(&self, player_id: u64) -> Option<&PlayerProjection> {
        self.players.get(&player_id)
    }

    /// Number of projected players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when nothing is projected.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Identity of an alert within one game: a player and a statistic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertIdentifier {
    /// Player id
    pub player_id: u64,
    /// Normalized stat key
    pub stat: String,
}

impl AlertIdentifier {
    /// Identifier for a player and stat; the stat is normalized.
    pub fn new(player_id: u64, stat: &str) -> Self {
        Self {
            player_id,
            stat: normalize_stat_key(stat),
        }
    }
}

/// A live figure reaching the alert threshold of its projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveAlert {
    /// League of the game
    pub league: League,
    /// Game the alert fired in
    pub game_id: u64,
    /// Player approaching the projection
    pub player: PlayerRef,
    /// Projection category label
    pub stat: String,
    /// Live value when the alert fired
    pub live_value: f64,
    /// Projected value
    pub projected_value: f64,
}

impl LiveAlert {
    /// `live / projected`.
    pub fn ratio(&self) -> f64 {
        self.live_value / self.projected_value
    }
}

/// Final score of a completed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    /// League of the game
    pub league: League,
    /// Provider game id
    pub game_id: u64,
    /// Home team
    pub home: TeamRef,
    /// Away team
    pub away: TeamRef,
    /// Home points or runs
    pub home_total: u32,
    /// Away points or runs
    pub away_total: u32,
}
