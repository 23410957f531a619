//! Layered configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`statline.toml` shipped with the crate)
//! 2. A user file (`./statline.toml`, or the path given on the command line)
//! 3. `STATLINE__<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statline_cache::CacheConfig;
use statline_client::{ApiConfig, FetchConfig};
use statline_core::League;
use statline_error::{ConfigError, StatlineResult};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../statline.toml");
const ENV_PREFIX: &str = "STATLINE";

/// Live polling and alerting.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct LiveConfig {
    /// Share of a projection that triggers an alert
    #[serde(default = "default_alert_threshold")]
    alert_threshold: f64,
    /// Seconds between live polls
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,
    /// Seconds between forced projection and player index refreshes
    #[serde(default = "default_refresh_interval_secs")]
    refresh_interval_secs: u64,
    /// Leagues polled, in poll order
    #[serde(default = "default_leagues")]
    leagues: Vec<League>,
    /// Box score stat keys checked for alerts, per league
    #[serde(default)]
    tracked_stats: HashMap<League, Vec<String>>,
}

fn default_alert_threshold() -> f64 {
    statline_live::DEFAULT_ALERT_THRESHOLD
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_refresh_interval_secs() -> u64 {
    43_200
}

fn default_leagues() -> Vec<League> {
    vec![League::Nfl, League::Nba, League::Mlb]
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            alert_threshold: default_alert_threshold(),
            poll_interval_secs: default_poll_interval_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            leagues: default_leagues(),
            tracked_stats: HashMap::new(),
        }
    }
}

impl LiveConfig {
    /// Live poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Cache refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Stats tracked for a league; empty when none are configured.
    pub fn tracked_stats_for(&self, league: League) -> &[String] {
        self.tracked_stats
            .get(&league)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Where presenters deliver events.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ChannelConfig {
    /// Channel receiving projection alerts
    #[serde(default)]
    alert_channel: Option<u64>,
    /// Scoreboard channel per league
    #[serde(default)]
    scoreboards: HashMap<League, u64>,
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct StatlineConfig {
    /// Remote source base URLs
    #[serde(default)]
    api: ApiConfig,
    /// Retry, timeout and pagination
    #[serde(default)]
    fetch: FetchConfig,
    /// Cache switch and TTL classes
    #[serde(default)]
    cache: CacheConfig,
    /// Live polling
    #[serde(default)]
    live: LiveConfig,
    /// Delivery channels
    #[serde(default)]
    channels: ChannelConfig,
}

impl StatlineConfig {
    /// Bundled defaults, then `./statline.toml` if present, then environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is invalid.
    #[instrument]
    pub fn load() -> StatlineResult<Self> {
        debug!("Loading configuration: environment > ./statline.toml > bundled defaults");
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::with_name("statline").required(false))
                .add_source(env_source()),
        )
    }

    /// Bundled defaults, then the given file (required), then environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or holds
    /// an invalid value.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StatlineResult<Self> {
        debug!("Loading configuration from file");
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref()))
                .add_source(env_source()),
        )
    }

    /// Bundled defaults overridden by a TOML string. The environment is not read.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed or holds an invalid
    /// value.
    pub fn from_toml(overrides: &str) -> StatlineResult<Self> {
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(overrides, FileFormat::Toml)),
        )
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> StatlineResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid value.
    pub fn validate(&self) -> StatlineResult<()> {
        let threshold = self.live.alert_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::new(format!(
                "live.alert_threshold must be in (0, 1], got {}",
                threshold
            ))
            .into());
        }
        if self.live.poll_interval_secs == 0 {
            return Err(ConfigError::new("live.poll_interval_secs must be positive").into());
        }
        if self.live.refresh_interval_secs == 0 {
            return Err(ConfigError::new("live.refresh_interval_secs must be positive").into());
        }
        if *self.fetch.per_page() == 0 || *self.fetch.max_pages() == 0 {
            return Err(ConfigError::new("fetch.per_page and fetch.max_pages must be positive").into());
        }
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
