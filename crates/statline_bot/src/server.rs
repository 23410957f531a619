//! Bot server: wires the live poller to its schedulers.

use crate::{LivePoller, PollerMessage, Presenter, StatlineConfig, StatsService};
use statline_live::LiveStateTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{error, info, instrument};

/// Bot server owning the live poller and its schedules.
pub struct BotServer {
    config: StatlineConfig,
    service: Arc<StatsService>,
    presenter: Arc<dyn Presenter>,
}

impl BotServer {
    /// Creates a new bot server.
    pub fn new(
        config: StatlineConfig,
        service: Arc<StatsService>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            config,
            service,
            presenter,
        }
    }

    /// Tracker configured for every polled league.
    pub fn tracker(&self) -> LiveStateTracker {
        let live = self.config.live();
        live.leagues().iter().fold(
            LiveStateTracker::new(*live.alert_threshold()),
            |tracker, league| {
                tracker.with_tracked_stats(*league, live.tracked_stats_for(*league).to_vec())
            },
        )
    }

    /// Spawns the poller actor without schedulers.
    ///
    /// Returns the actor's sender and its task handle.
    pub fn spawn(&self) -> (mpsc::Sender<PollerMessage>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(32);
        let poller = LivePoller::new(
            Arc::clone(&self.service),
            Arc::clone(&self.presenter),
            self.tracker(),
            self.config.live().leagues().clone(),
            rx,
        );
        let handle = tokio::spawn(async move {
            poller.run().await;
        });
        (tx, handle)
    }

    /// Starts the poller and its schedulers, returning when the poller stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the poller task panicked.
    #[instrument(skip(self))]
    pub async fn start(self) -> Result<(), tokio::task::JoinError> {
        info!(
            leagues = ?self.config.live().leagues(),
            poll_secs = self.config.live().poll_interval_secs(),
            "Starting bot server"
        );

        let (tx, handle) = self.spawn();

        Self::spawn_poll_scheduler(self.config.live().poll_interval(), tx.clone());
        Self::spawn_refresh_scheduler(self.config.live().refresh_interval(), tx);

        handle.await?;

        info!("Bot server stopped");
        Ok(())
    }

    fn spawn_poll_scheduler(poll_interval: Duration, tx: mpsc::Sender<PollerMessage>) {
        tokio::spawn(async move {
            let mut interval = interval(poll_interval);
            loop {
                interval.tick().await;
                if tx.send(PollerMessage::Poll).await.is_err() {
                    error!("Live poller channel closed");
                    break;
                }
            }
        });
    }

    fn spawn_refresh_scheduler(refresh_interval: Duration, tx: mpsc::Sender<PollerMessage>) {
        tokio::spawn(async move {
            let mut interval = interval(refresh_interval);
            // First tick completes immediately; caches fill lazily on first use.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(PollerMessage::RefreshCaches).await.is_err() {
                    error!("Live poller channel closed");
                    break;
                }
            }
        });
    }
}
