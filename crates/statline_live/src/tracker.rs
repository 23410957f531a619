//! Per-league live game state and alert de-duplication.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statline_core::{
    AlertIdentifier, BoxScore, FinalScore, GameSnapshot, GameStatus, League, LiveAlert,
    ProjectionTable, TeamRef,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Fraction of a projection a live figure must reach to alert.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.8;

/// What changed in a league's game report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiveEvent {
    /// A game went live and is now tracked
    GameStarted {
        /// League of the game
        league: League,
        /// Provider game id
        game_id: u64,
    },
    /// A tracked game finished; its state has been discarded
    GameCompleted(FinalScore),
}

/// State of one tracked game.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct LiveGameState {
    game_id: u64,
    home: TeamRef,
    away: TeamRef,
    alerts: HashSet<AlertIdentifier>,
}

impl LiveGameState {
    fn new(game: &GameSnapshot) -> Self {
        Self {
            game_id: game.id,
            home: game.home.clone(),
            away: game.away.clone(),
            alerts: HashSet::new(),
        }
    }

    /// True when the alert has already fired in this game.
    pub fn has_fired(&self, alert: &AlertIdentifier) -> bool {
        self.alerts.contains(alert)
    }
}

/// Tracks live games per league and the alerts already sent for each.
///
/// A game becomes tracked the first time it is reported live. It is
/// discarded when reported completed (emitting [`LiveEvent::GameCompleted`]
/// once) or when it disappears from the report. Alert identifiers live only
/// as long as their game.
#[derive(Debug, Clone)]
pub struct LiveStateTracker {
    threshold: f64,
    tracked_stats: HashMap<League, Vec<String>>,
    games: HashMap<League, HashMap<u64, LiveGameState>>,
}

impl Default for LiveStateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD)
    }
}

impl LiveStateTracker {
    /// Tracker alerting at `threshold` of a projection, with no tracked stats.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            tracked_stats: HashMap::new(),
            games: HashMap::new(),
        }
    }

    /// Stats to check for alerts in a league.
    pub fn with_tracked_stats<I, S>(mut self, league: League, stats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracked_stats
            .insert(league, stats.into_iter().map(Into::into).collect());
        self
    }

    /// Alert threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Stats checked for alerts in a league.
    pub fn tracked_stats(&self, league: League) -> &[String] {
        self.tracked_stats
            .get(&league)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Apply a league's daily game report.
    ///
    /// Returns the started and completed events in report order.
    #[instrument(skip(self, report), fields(games = report.len()))]
    pub fn observe(&mut self, league: League, report: &[GameSnapshot]) -> Vec<LiveEvent> {
        let tracked = self.games.entry(league).or_default();
        let mut events = Vec::new();

        for game in report {
            match game.status {
                GameStatus::Live => {
                    if tracked.contains_key(&game.id) {
                        continue;
                    }
                    info!(game_id = game.id, "Game went live");
                    tracked.insert(game.id, LiveGameState::new(game));
                    events.push(LiveEvent::GameStarted {
                        league,
                        game_id: game.id,
                    });
                }
                GameStatus::Completed => {
                    if tracked.remove(&game.id).is_none() {
                        continue;
                    }
                    info!(game_id = game.id, "Game completed");
                    events.push(LiveEvent::GameCompleted(FinalScore {
                        league,
                        game_id: game.id,
                        home: game.home.clone(),
                        away: game.away.clone(),
                        home_total: game.score.home_total,
                        away_total: game.score.away_total,
                    }));
                }
                GameStatus::Unplayed => {}
            }
        }

        let reported: HashSet<u64> = report.iter().map(|g| g.id).collect();
        tracked.retain(|id, _| {
            let keep = reported.contains(id);
            if !keep {
                debug!(game_id = id, "Tracked game left the report, discarding");
            }
            keep
        });

        events
    }

    /// Ids of the games currently tracked as live, ascending.
    pub fn live_games(&self, league: League) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .games
            .get(&league)
            .map(|games| games.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// State of a tracked game.
    pub fn game(&self, league: League, game_id: u64) -> Option<&LiveGameState> {
        self.games.get(&league)?.get(&game_id)
    }

    /// True when the game is tracked as live.
    pub fn is_tracked(&self, league: League, game_id: u64) -> bool {
        self.game(league, game_id).is_some()
    }

    /// Alerts for players whose live figure reached the threshold of their
    /// projection for the first time in this game.
    ///
    /// Untracked games produce nothing. Players without projections and
    /// stats projected at zero are skipped.
    #[instrument(skip(self, box_score, projections), fields(players = box_score.players.len()))]
    pub fn check_alerts(
        &mut self,
        league: League,
        game_id: u64,
        box_score: &BoxScore,
        projections: &ProjectionTable,
    ) -> Vec<LiveAlert> {
        let threshold = self.threshold;
        let stats = self.tracked_stats.get(&league).cloned().unwrap_or_default();
        let Some(state) = self
            .games
            .get_mut(&league)
            .and_then(|games| games.get_mut(&game_id))
        else {
            debug!("Game not tracked, no alerts");
            return Vec::new();
        };

        let mut alerts = Vec::new();
        for line in &box_score.players {
            let Some(projected) = projections.get(line.player.id) else {
                continue;
            };
            for stat in &stats {
                let Some(projection) = projected.amount(stat) else {
                    continue;
                };
                if projection.amount <= 0.0 {
                    continue;
                }
                let live = line.value(stat);
                if live / projection.amount < threshold {
                    continue;
                }
                if state.alerts.insert(AlertIdentifier::new(line.player.id, stat)) {
                    info!(
                        player = %line.player.name,
                        stat = %projection.category,
                        live,
                        projected = projection.amount,
                        "Projection alert"
                    );
                    alerts.push(LiveAlert {
                        league,
                        game_id,
                        player: line.player.clone(),
                        stat: projection.category.clone(),
                        live_value: live,
                        projected_value: projection.amount,
                    });
                }
            }
        }
        alerts
    }
}
