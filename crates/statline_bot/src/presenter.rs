//! Boundary between the engine and whatever renders its output.

use crate::ChannelConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use statline_core::{FinalScore, GameSnapshot, League, LiveAlert};
use statline_error::{StatlineError, StatlineErrorKind, StatlineResult, StatsErrorKind};
use statline_live::GameProgress;
use tracing::info;

/// One live game on a scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardRow {
    /// Game as last reported
    pub game: GameSnapshot,
    /// Elapsed share and period label
    pub progress: GameProgress,
}

/// Something the live poller wants shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BotEvent {
    /// Current live games of a league, ordered by start time
    Scoreboard {
        /// League of the scoreboard
        league: League,
        /// Live games; empty when nothing is live
        rows: Vec<ScoreboardRow>,
    },
    /// A tracked game finished
    FinalScore(FinalScore),
    /// A player reached the alert threshold of a projection
    Alert(LiveAlert),
}

impl BotEvent {
    /// Channel configured for this event: the league's scoreboard channel
    /// for scoreboards and final scores, the alert channel for alerts.
    pub fn channel(&self, channels: &ChannelConfig) -> Option<u64> {
        match self {
            BotEvent::Scoreboard { league, .. } => channels.scoreboards().get(league).copied(),
            BotEvent::FinalScore(score) => channels.scoreboards().get(&score.league).copied(),
            BotEvent::Alert(_) => *channels.alert_channel(),
        }
    }
}

/// Renders bot events on a chat platform (or anywhere else).
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Deliver one event.
    async fn publish(&self, event: BotEvent) -> StatlineResult<()>;
}

/// Presenter that writes events to the log, tagged with their channel.
#[derive(Debug, Clone, Default)]
pub struct LogPresenter {
    channels: ChannelConfig,
}

impl LogPresenter {
    /// Log presenter routing by `channels`.
    pub fn new(channels: ChannelConfig) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl Presenter for LogPresenter {
    async fn publish(&self, event: BotEvent) -> StatlineResult<()> {
        let channel = event.channel(&self.channels);
        match event {
            BotEvent::Scoreboard { league, rows } => {
                if rows.is_empty() {
                    info!(%league, ?channel, "No games are currently live");
                }
                for row in rows {
                    info!(
                        %league,
                        ?channel,
                        matchup = %format!("{} @ {}", row.game.away.abbreviation, row.game.home.abbreviation),
                        away = row.game.score.away_total,
                        home = row.game.score.home_total,
                        progress = %format!("{} {}", row.progress.bar(), row.progress.label),
                        "Scoreboard"
                    );
                }
            }
            BotEvent::FinalScore(score) => {
                info!(
                    league = %score.league,
                    game_id = score.game_id,
                    ?channel,
                    result = %format!(
                        "{} {} - {} {}",
                        score.away.abbreviation, score.away_total, score.home.abbreviation, score.home_total
                    ),
                    "FINAL"
                );
            }
            BotEvent::Alert(alert) => {
                info!(
                    league = %alert.league,
                    player = %alert.player.name,
                    ?channel,
                    stat = %alert.stat,
                    progress = %format!(
                        "{} / {} ({:.0}%)",
                        alert.live_value,
                        alert.projected_value,
                        alert.ratio() * 100.0
                    ),
                    "Projection alert"
                );
            }
        }
        Ok(())
    }
}

/// Text shown to a user for an error.
///
/// Remote failures get a generic try-again message. Missing data names its
/// scope.
pub fn user_message(error: &StatlineError) -> String {
    match error.kind() {
        StatlineErrorKind::Api(_) => {
            "The stats service is unavailable right now. Please try again later.".to_string()
        }
        StatlineErrorKind::Stats(stats) => match &stats.kind {
            StatsErrorKind::Unavailable { scope } => format!("No stats found for {}.", scope),
            StatsErrorKind::PlayerNotFound(query) => {
                format!("Could not find a player matching '{}'.", query)
            }
            StatsErrorKind::UnknownStat(stat) => format!("'{}' is not a supported stat.", stat),
        },
        StatlineErrorKind::Config(_) => "The bot is misconfigured.".to_string(),
    }
}
