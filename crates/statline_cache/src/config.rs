//! Cache configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// TTL classes in seconds.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct TtlConfig {
    /// Player search results
    #[serde(default = "default_player_search")]
    player_search: u64,
    /// A player's per-game logs for one season
    #[serde(default = "default_game_logs")]
    game_logs: u64,
    /// Provider season stat and leader rows
    #[serde(default = "default_season_stats")]
    season_stats: u64,
    /// Derived season aggregates
    #[serde(default = "default_season_aggregate")]
    season_aggregate: u64,
    /// League leaderboards
    #[serde(default = "default_leaderboard")]
    leaderboard: u64,
    /// Player projections
    #[serde(default = "default_projections")]
    projections: u64,
    /// Active player index
    #[serde(default = "default_player_index")]
    player_index: u64,
}

fn default_player_search() -> u64 {
    3600
}

fn default_game_logs() -> u64 {
    86_400
}

fn default_season_stats() -> u64 {
    43_200
}

fn default_season_aggregate() -> u64 {
    10_800
}

fn default_leaderboard() -> u64 {
    21_600
}

fn default_projections() -> u64 {
    86_400
}

fn default_player_index() -> u64 {
    21_600
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            player_search: default_player_search(),
            game_logs: default_game_logs(),
            season_stats: default_season_stats(),
            season_aggregate: default_season_aggregate(),
            leaderboard: default_leaderboard(),
            projections: default_projections(),
            player_index: default_player_index(),
        }
    }
}

impl TtlConfig {
    /// TTL for player search results.
    pub fn player_search_ttl(&self) -> Duration {
        Duration::from_secs(self.player_search)
    }

    /// TTL for season game logs.
    pub fn game_logs_ttl(&self) -> Duration {
        Duration::from_secs(self.game_logs)
    }

    /// TTL for provider season rows.
    pub fn season_stats_ttl(&self) -> Duration {
        Duration::from_secs(self.season_stats)
    }

    /// TTL for derived season aggregates.
    pub fn season_aggregate_ttl(&self) -> Duration {
        Duration::from_secs(self.season_aggregate)
    }

    /// TTL for leaderboards.
    pub fn leaderboard_ttl(&self) -> Duration {
        Duration::from_secs(self.leaderboard)
    }

    /// TTL for projections.
    pub fn projections_ttl(&self) -> Duration {
        Duration::from_secs(self.projections)
    }

    /// TTL for the active player index.
    pub fn player_index_ttl(&self) -> Duration {
        Duration::from_secs(self.player_index)
    }
}

/// Configuration for a cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// Whether results are stored at all
    #[serde(default = "default_enabled")]
    enabled: bool,

    /// TTL classes
    #[serde(default)]
    ttl: TtlConfig,
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl: TtlConfig::default(),
        }
    }
}
