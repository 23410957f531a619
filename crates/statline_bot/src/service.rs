//! Command-level stats operations over the cached endpoints.

use crate::StatlineConfig;
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use statline_aggregate::{
    SportRules, StatLine, aggregate_league, aggregate_season, latest_games, recent_form,
    summarize,
};
use statline_cache::{CacheConfig, CacheKey, TtlCache, TtlConfig};
use statline_client::{FeedApi, Fetcher, StatsApi, Transport, merge_rows};
use statline_core::{
    League, Leaderboard, PlayerProjection, PlayerRef, RecentForm, SeasonAggregate, StatRecord,
};
use statline_error::{StatlineError, StatlineResult, StatsError, StatsErrorKind};
use statline_live::{PropProgress, prop_progress};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Most player suggestions returned for a partial name.
pub const MAX_SUGGESTIONS: usize = 25;

/// A player's season figures laid out for their role.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    /// League of the season
    pub league: League,
    /// Season label
    pub season: i32,
    /// Aggregated figures
    pub aggregate: Arc<SeasonAggregate>,
    /// Labelled figures in layout order
    pub lines: Vec<StatLine>,
}

/// A player's live figures against their projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProp {
    /// Player compared
    pub player: PlayerRef,
    /// Live game the figures come from
    pub game_id: u64,
    /// One row per projected stat
    pub rows: Vec<PropProgress>,
}

/// Everything the bot's commands and the live poller ask of the engine.
///
/// Holds the stats and feed endpoints plus the derived-value caches
/// (season aggregates and leaderboards). Constructed once and shared by
/// `Arc`.
pub struct StatsService {
    stats: StatsApi,
    feed: FeedApi,
    ttl: TtlConfig,
    threshold: f64,
    aggregates: TtlCache<Arc<SeasonAggregate>>,
    leaderboards: TtlCache<Arc<Leaderboard>>,
}

impl StatsService {
    /// Service over existing endpoints.
    pub fn new(stats: StatsApi, feed: FeedApi, cache: &CacheConfig, threshold: f64) -> Self {
        Self {
            stats,
            feed,
            ttl: cache.ttl().clone(),
            threshold,
            aggregates: TtlCache::new("season_aggregates", cache.clone()),
            leaderboards: TtlCache::new("leaderboards", cache.clone()),
        }
    }

    /// Service wired from configuration, one transport per provider.
    pub fn from_config(
        config: &StatlineConfig,
        stats_transport: Arc<dyn Transport>,
        feed_transport: Arc<dyn Transport>,
    ) -> Self {
        let stats = StatsApi::new(
            Fetcher::new(stats_transport, config.fetch().clone()),
            config.api().clone(),
            config.cache(),
        );
        let feed = FeedApi::new(
            Fetcher::new(feed_transport, config.fetch().clone()),
            config.api().clone(),
            config.cache(),
        );
        Self::new(stats, feed, config.cache(), *config.live().alert_threshold())
    }

    /// Live feed endpoints.
    pub fn feed(&self) -> &FeedApi {
        &self.feed
    }

    /// Alert and prop threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// First player matching `query`.
    ///
    /// # Errors
    ///
    /// [`StatsErrorKind::PlayerNotFound`] when the search is empty, or the
    /// fetch error.
    #[instrument(skip(self))]
    pub async fn find_player(&self, league: League, query: &str) -> StatlineResult<PlayerRef> {
        let players = self.stats.search_players(league, query).await?;
        players.first().cloned().ok_or_else(|| {
            StatsError::new(StatsErrorKind::PlayerNotFound(query.trim().to_string())).into()
        })
    }

    /// Active players whose name contains `partial`, at most
    /// [`MAX_SUGGESTIONS`].
    #[instrument(skip(self))]
    pub async fn suggest_players(
        &self,
        league: League,
        partial: &str,
    ) -> StatlineResult<Vec<PlayerRef>> {
        let wanted = partial.trim().to_lowercase();
        let players = self.feed.active_players(league).await?;
        Ok(players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&wanted))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect())
    }

    /// Season figures of a player, cached per (player, season).
    ///
    /// # Errors
    ///
    /// [`StatsErrorKind::Unavailable`] when the player has no qualifying
    /// games in the season, or the fetch error.
    #[instrument(skip(self))]
    pub async fn season_summary(
        &self,
        league: League,
        player_id: u64,
        season: i32,
    ) -> StatlineResult<SeasonSummary> {
        let rules = SportRules::for_league(league);
        let key = CacheKey::new(
            format!("{}.season_aggregate", league),
            [player_id.to_string(), season.to_string()],
        );
        let aggregate = self
            .aggregates
            .get_or_fetch(key, self.ttl.season_aggregate_ttl(), || async {
                let logs = self.stats.season_game_logs(league, player_id, season).await?;
                if logs.is_empty() {
                    return Err(StatsError::unavailable(format!(
                        "player {} in the {} season",
                        player_id, season
                    ))
                    .into());
                }
                let aggregate = aggregate_season(&logs, &rules)?;
                Ok::<_, StatlineError>(Arc::new(aggregate))
            })
            .await?;

        let lines = summarize(&aggregate, &rules);
        Ok(SeasonSummary {
            league,
            season,
            aggregate,
            lines,
        })
    }

    /// Average of `stat` over a player's last `games` games.
    ///
    /// Early in a season the window is filled from the previous season.
    ///
    /// # Errors
    ///
    /// [`StatsErrorKind::UnknownStat`] for a stat the league does not offer,
    /// [`StatsErrorKind::Unavailable`] when no game qualifies, or the fetch
    /// error.
    #[instrument(skip(self))]
    pub async fn recent_form(
        &self,
        league: League,
        player_id: u64,
        stat: &str,
        games: usize,
    ) -> StatlineResult<RecentForm> {
        let rules = SportRules::for_league(league);
        if !rules.offers(stat) {
            return Err(StatsError::new(StatsErrorKind::UnknownStat(stat.to_string())).into());
        }

        let season = league.current_season();
        let current = self.stats.season_game_logs(league, player_id, season).await?;
        let mut window: Vec<StatRecord> = latest_games(&current, games, &rules)
            .into_iter()
            .cloned()
            .collect();

        if window.len() < games {
            debug!(
                found = window.len(),
                wanted = games,
                "Filling window from the previous season"
            );
            let previous = self
                .stats
                .season_game_logs(league, player_id, season - 1)
                .await?;
            window.extend(
                latest_games(&previous, games - window.len(), &rules)
                    .into_iter()
                    .cloned(),
            );
        }

        if window.is_empty() {
            return Err(StatsError::unavailable(format!(
                "recent games for player {}",
                player_id
            ))
            .into());
        }
        Ok(recent_form(&window, stat, games, &rules)?)
    }

    /// League leaders for a season, cached per season.
    ///
    /// Every category's sorted feed is fetched concurrently; one failed
    /// feed fails the whole board.
    ///
    /// # Errors
    ///
    /// The first fetch error, or [`StatsErrorKind::Unavailable`] when no
    /// player qualifies.
    #[instrument(skip(self))]
    pub async fn league_leaders(
        &self,
        league: League,
        season: i32,
    ) -> StatlineResult<Arc<Leaderboard>> {
        let key = CacheKey::new(format!("{}.leaders", league), [season.to_string()]);
        self.leaderboards
            .get_or_fetch(key, self.ttl.leaderboard_ttl(), || async {
                let rules = SportRules::season_rows(league);
                let feeds = try_join_all(rules.categories().iter().map(|category| {
                    self.stats.leader_rows(
                        league,
                        season,
                        category.sort_key(),
                        *category.order(),
                        *category.pages(),
                    )
                }))
                .await?;
                let rows = merge_rows(feeds.iter().flat_map(|rows| rows.iter()));
                debug!(
                    feeds = feeds.len(),
                    players = rows.len(),
                    "Merged leader feeds"
                );
                let board = aggregate_league(&rows, &rules)?;
                info!(categories = board.categories.len(), "Built leaderboard");
                Ok::<_, StatlineError>(Arc::new(board))
            })
            .await
    }

    /// Projections of one player.
    ///
    /// # Errors
    ///
    /// [`StatsErrorKind::Unavailable`] when the player has no projections,
    /// or the fetch error.
    #[instrument(skip(self))]
    pub async fn player_projections(
        &self,
        league: League,
        player_id: u64,
    ) -> StatlineResult<PlayerProjection> {
        let table = self.feed.projections(league).await?;
        table.get(player_id).cloned().ok_or_else(|| {
            StatsError::unavailable(format!("projections for player {}", player_id)).into()
        })
    }

    /// A player's live figures against their projections, from the first
    /// live game on `date` whose box score lists them.
    ///
    /// # Errors
    ///
    /// [`StatsErrorKind::Unavailable`] when the player has no projections
    /// or is not in a live game, or the fetch error.
    #[instrument(skip(self))]
    pub async fn player_prop(
        &self,
        league: League,
        player_id: u64,
        date: NaiveDate,
    ) -> StatlineResult<PlayerProp> {
        let projection = self.player_projections(league, player_id).await?;
        let games = self
            .feed
            .daily_games(league, date)
            .await?
            .unwrap_or_default();

        for game in games.iter().filter(|g| g.is_live()) {
            let Some(box_score) = self.feed.box_score(league, game.id).await? else {
                continue;
            };
            if let Some(line) = box_score.player(player_id) {
                return Ok(PlayerProp {
                    player: line.player.clone(),
                    game_id: game.id,
                    rows: prop_progress(line, &projection, self.threshold),
                });
            }
        }

        Err(StatsError::unavailable(format!("a live game for {}", projection.player.name)).into())
    }

    /// Refetch the active player index and projections of a league.
    ///
    /// # Errors
    ///
    /// The first fetch error; a failed refresh keeps the cached values.
    #[instrument(skip(self))]
    pub async fn refresh_caches(&self, league: League) -> StatlineResult<()> {
        let players = self.feed.refresh_active_players(league).await?;
        let projections = self.feed.refresh_projections(league).await?;
        info!(
            players = players.len(),
            projected = projections.len(),
            "Refreshed league caches"
        );
        Ok(())
    }
}
