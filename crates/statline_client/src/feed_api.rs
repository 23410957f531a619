//! Live feed endpoints: daily games, box scores, projections, player index.

use crate::{ApiConfig, Fetcher, param, parse};
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use statline_cache::{CacheConfig, CacheKey, TtlCache, TtlConfig};
use statline_core::{BoxScore, GameSnapshot, League, PlayerRef, ProjectionTable};
use statline_error::ApiError;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Live feed client. Games and box scores are always fetched fresh;
/// projections and the active player index are cached.
pub struct FeedApi {
    fetcher: Fetcher,
    api: ApiConfig,
    ttl: TtlConfig,
    projections: TtlCache<Arc<ProjectionTable>>,
    player_index: TtlCache<Arc<[PlayerRef]>>,
}

impl FeedApi {
    /// Feed endpoints over a fetcher.
    pub fn new(fetcher: Fetcher, api: ApiConfig, cache: &CacheConfig) -> Self {
        Self {
            fetcher,
            api,
            ttl: cache.ttl().clone(),
            projections: TtlCache::new("projections", cache.clone()),
            player_index: TtlCache::new("player_index", cache.clone()),
        }
    }

    /// Games scheduled on `date`, in report order.
    ///
    /// `None` when the feed has no report for the day (404 or a document
    /// without `games`), which is distinct from a report listing no games.
    #[instrument(skip(self))]
    pub async fn daily_games(
        &self,
        league: League,
        date: NaiveDate,
    ) -> Result<Option<Vec<GameSnapshot>>, ApiError> {
        let document = self
            .fetcher
            .fetch(
                &self.api.feed_base_for(league),
                "/latest/games.json",
                &[param("date", date.format("%Y%m%d"))],
            )
            .await?;
        let Some(document) = document.filter(|d| d.get("games").is_some_and(JsonValue::is_array))
        else {
            debug!("No daily games report");
            return Ok(None);
        };
        let games = parse::daily_games(&document);
        debug!(games = games.len(), "Fetched daily games");
        Ok(Some(games))
    }

    /// Box score of a game; `None` when the feed has none.
    #[instrument(skip(self))]
    pub async fn box_score(
        &self,
        league: League,
        game_id: u64,
    ) -> Result<Option<BoxScore>, ApiError> {
        let base = self.api.feed_base_for(league);
        let endpoint = format!("/latest/games/{}/boxscore.json", game_id);
        let Some(document) = self.fetcher.fetch(&base, &endpoint, &[]).await? else {
            return Ok(None);
        };
        parse::box_score(&document)
            .map(Some)
            .map_err(|kind| ApiError::new(format!("{}{}", base, endpoint), kind))
    }

    /// Player projections, cached.
    pub async fn projections(&self, league: League) -> Result<Arc<ProjectionTable>, ApiError> {
        self.projections
            .get_or_fetch(
                projections_key(league),
                self.ttl.projections_ttl(),
                || self.fetch_projections(league),
            )
            .await
    }

    /// Refetch projections regardless of age.
    pub async fn refresh_projections(
        &self,
        league: League,
    ) -> Result<Arc<ProjectionTable>, ApiError> {
        self.projections
            .refresh(
                projections_key(league),
                self.ttl.projections_ttl(),
                || self.fetch_projections(league),
            )
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_projections(&self, league: League) -> Result<Arc<ProjectionTable>, ApiError> {
        let document = self
            .fetcher
            .fetch(
                &self.api.feed_base_for(league),
                "/latest/player_projections.json",
                &[],
            )
            .await?;
        let table = document
            .as_ref()
            .map(parse::projections)
            .unwrap_or_default();
        debug!(players = table.len(), "Fetched projections");
        Ok(Arc::new(table))
    }

    /// Active players, cached. Football keeps only QB, RB, WR, TE and K.
    pub async fn active_players(&self, league: League) -> Result<Arc<[PlayerRef]>, ApiError> {
        self.player_index
            .get_or_fetch(
                player_index_key(league),
                self.ttl.player_index_ttl(),
                || self.fetch_active_players(league),
            )
            .await
    }

    /// Refetch the active player index regardless of age.
    pub async fn refresh_active_players(
        &self,
        league: League,
    ) -> Result<Arc<[PlayerRef]>, ApiError> {
        self.player_index
            .refresh(
                player_index_key(league),
                self.ttl.player_index_ttl(),
                || self.fetch_active_players(league),
            )
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_active_players(&self, league: League) -> Result<Arc<[PlayerRef]>, ApiError> {
        let document = self
            .fetcher
            .fetch(&self.api.feed_base_for(league), "/players.json", &[])
            .await?;
        let players = document
            .as_ref()
            .map(|d| parse::active_players(league, d))
            .unwrap_or_default();
        debug!(players = players.len(), "Fetched active players");
        Ok(Arc::from(players))
    }
}

fn projections_key(league: League) -> CacheKey {
    CacheKey::new(format!("{}.projections", league), ["latest"])
}

fn player_index_key(league: League) -> CacheKey {
    CacheKey::new(format!("{}.player_index", league), Vec::<String>::new())
}
