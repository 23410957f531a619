//! Remote source and fetch configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statline_core::League;
use std::time::Duration;

/// Base URLs of the remote data sources.
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
#[setters(prefix = "with_", into)]
#[builder(default, setter(into))]
pub struct ApiConfig {
    /// Basketball stats base URL
    #[serde(default = "default_nba_base")]
    nba_base: String,
    /// Football stats base URL
    #[serde(default = "default_nfl_base")]
    nfl_base: String,
    /// Baseball stats base URL
    #[serde(default = "default_mlb_base")]
    mlb_base: String,
    /// Live feed base URL (league is appended as a path segment)
    #[serde(default = "default_feed_base")]
    feed_base: String,
}

fn default_nba_base() -> String {
    "https://api.balldontlie.io/v1".to_string()
}

fn default_nfl_base() -> String {
    "https://api.balldontlie.io/nfl/v1".to_string()
}

fn default_mlb_base() -> String {
    "https://api.balldontlie.io/mlb/v1".to_string()
}

fn default_feed_base() -> String {
    "https://api.mysportsfeeds.com/v2.1/pull".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            nba_base: default_nba_base(),
            nfl_base: default_nfl_base(),
            mlb_base: default_mlb_base(),
            feed_base: default_feed_base(),
        }
    }
}

impl ApiConfig {
    /// Stats base URL for a league.
    pub fn stats_base(&self, league: League) -> &str {
        match league {
            League::Nba => &self.nba_base,
            League::Nfl => &self.nfl_base,
            League::Mlb => &self.mlb_base,
        }
    }

    /// Live feed base URL for a league.
    pub fn feed_base_for(&self, league: League) -> String {
        format!("{}/{}", self.feed_base.trim_end_matches('/'), league)
    }
}

/// Retry, timeout and pagination limits for the [`Fetcher`](crate::Fetcher).
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
pub struct FetchConfig {
    /// Wait after a 429 before the next attempt (seconds)
    #[serde(default = "default_cooldown_secs")]
    cooldown_secs: u64,
    /// Retries after a 429 before giving up
    #[serde(default = "default_max_rate_limit_retries")]
    max_rate_limit_retries: u32,
    /// Upper bound for one logical fetch, retries included (seconds)
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    /// `per_page` sent with paginated requests
    #[serde(default = "default_per_page")]
    per_page: u32,
    /// Hard stop for one pagination loop
    #[serde(default = "default_max_pages")]
    max_pages: usize,
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_max_rate_limit_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_per_page() -> u32 {
    100
}

fn default_max_pages() -> usize {
    50
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
        }
    }
}

impl FetchConfig {
    /// Rate-limit cooldown.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
