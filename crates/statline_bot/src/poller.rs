//! Live poller actor.

use crate::{BotEvent, Presenter, ScoreboardRow, StatsService};
use chrono::{Local, NaiveDate};
use statline_core::{GameSnapshot, League};
use statline_error::StatlineResult;
use statline_live::{GameProgress, LiveEvent, LiveStateTracker};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Messages the poller handles.
#[derive(Debug)]
pub enum PollerMessage {
    /// Poll every league once
    Poll,
    /// Force-refresh projections and player indexes
    RefreshCaches,
    /// Stop the actor
    Shutdown,
}

/// Polls each league's daily games, keeps the live tracker current and
/// publishes scoreboards, final scores and projection alerts.
///
/// The tracker is owned by this actor; messages are handled one at a time.
pub struct LivePoller {
    service: Arc<StatsService>,
    presenter: Arc<dyn Presenter>,
    tracker: LiveStateTracker,
    leagues: Vec<League>,
    rx: mpsc::Receiver<PollerMessage>,
}

impl LivePoller {
    /// Creates a new poller.
    pub fn new(
        service: Arc<StatsService>,
        presenter: Arc<dyn Presenter>,
        tracker: LiveStateTracker,
        leagues: Vec<League>,
        rx: mpsc::Receiver<PollerMessage>,
    ) -> Self {
        Self {
            service,
            presenter,
            tracker,
            leagues,
            rx,
        }
    }

    /// Tracker state.
    pub fn tracker(&self) -> &LiveStateTracker {
        &self.tracker
    }

    /// Runs the poller loop until shutdown or until every sender is gone.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!(leagues = self.leagues.len(), "Live poller started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                PollerMessage::Poll => self.poll_all(Local::now().date_naive()).await,
                PollerMessage::RefreshCaches => self.refresh_all().await,
                PollerMessage::Shutdown => {
                    info!("Live poller shutting down");
                    break;
                }
            }
        }
    }

    /// Poll every league for `date`. A failing league is logged and skipped.
    pub async fn poll_all(&mut self, date: NaiveDate) {
        for league in self.leagues.clone() {
            if let Err(e) = self.poll_league(league, date).await {
                error!(%league, error = %e, "Live update failed");
            }
        }
    }

    /// Force-refresh every league's cached feed data.
    pub async fn refresh_all(&self) {
        info!("Running scheduled cache refresh");
        for league in &self.leagues {
            if let Err(e) = self.service.refresh_caches(*league).await {
                warn!(%league, error = %e, "Cache refresh failed, keeping previous values");
            }
        }
    }

    /// One poll of one league.
    ///
    /// # Errors
    ///
    /// The first fetch or publish error. Tracker changes made before the
    /// error are kept. A missing report leaves the tracker untouched.
    #[instrument(skip(self))]
    pub async fn poll_league(&mut self, league: League, date: NaiveDate) -> StatlineResult<()> {
        let Some(games) = self.service.feed().daily_games(league, date).await? else {
            warn!(%league, "No daily games report, keeping tracked games");
            return Ok(());
        };
        let events = self.tracker.observe(league, &games);

        for event in events {
            if let LiveEvent::GameCompleted(snapshot_score) = event {
                let final_score = match self
                    .service
                    .feed()
                    .box_score(league, snapshot_score.game_id)
                    .await
                {
                    Ok(Some(box_score)) => box_score.final_score(league),
                    Ok(None) => snapshot_score,
                    Err(e) => {
                        warn!(game_id = snapshot_score.game_id, error = %e, "Final box score unavailable");
                        snapshot_score
                    }
                };
                self.presenter
                    .publish(BotEvent::FinalScore(final_score))
                    .await?;
            }
        }

        self.presenter
            .publish(BotEvent::Scoreboard {
                league,
                rows: scoreboard(league, &games),
            })
            .await?;

        self.check_alerts(league).await
    }

    async fn check_alerts(&mut self, league: League) -> StatlineResult<()> {
        let live = self.tracker.live_games(league);
        if live.is_empty() || self.tracker.tracked_stats(league).is_empty() {
            return Ok(());
        }

        let projections = self.service.feed().projections(league).await?;
        if projections.is_empty() {
            debug!(%league, "No projections, skipping alerts");
            return Ok(());
        }

        for game_id in live {
            let Some(box_score) = self.service.feed().box_score(league, game_id).await? else {
                continue;
            };
            let alerts = self
                .tracker
                .check_alerts(league, game_id, &box_score, &projections);
            for alert in alerts {
                self.presenter.publish(BotEvent::Alert(alert)).await?;
            }
        }
        Ok(())
    }
}

fn scoreboard(league: League, games: &[GameSnapshot]) -> Vec<ScoreboardRow> {
    let mut live: Vec<&GameSnapshot> = games.iter().filter(|g| g.is_live()).collect();
    live.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    live.into_iter()
        .map(|game| ScoreboardRow {
            game: game.clone(),
            progress: GameProgress::from_score(league, &game.score),
        })
        .collect()
}
