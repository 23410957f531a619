//! Stats provider endpoints, cached by TTL class.

use crate::{ApiConfig, Fetcher, param, parse};
use statline_cache::{CacheConfig, CacheKey, TtlCache, TtlConfig};
use statline_core::{League, PlayerRef, SortOrder, StatRecord};
use statline_error::ApiError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Player search, per-game logs and sorted season rows for each league.
pub struct StatsApi {
    fetcher: Fetcher,
    api: ApiConfig,
    ttl: TtlConfig,
    players: TtlCache<Arc<[PlayerRef]>>,
    game_logs: TtlCache<Arc<[StatRecord]>>,
    season_rows: TtlCache<Arc<[StatRecord]>>,
}

impl StatsApi {
    /// Endpoints over a fetcher with one cache per TTL class.
    pub fn new(fetcher: Fetcher, api: ApiConfig, cache: &CacheConfig) -> Self {
        Self {
            fetcher,
            api,
            ttl: cache.ttl().clone(),
            players: TtlCache::new("players", cache.clone()),
            game_logs: TtlCache::new("game_logs", cache.clone()),
            season_rows: TtlCache::new("season_rows", cache.clone()),
        }
    }

    /// Players whose name matches `query`.
    #[instrument(skip(self))]
    pub async fn search_players(
        &self,
        league: League,
        query: &str,
    ) -> Result<Arc<[PlayerRef]>, ApiError> {
        let query = query.trim().to_lowercase();
        let key = CacheKey::new(format!("{}.players", league), [query.clone()]);
        self.players
            .get_or_fetch(key, self.ttl.player_search_ttl(), || async {
                let document = self
                    .fetcher
                    .fetch(self.api.stats_base(league), "/players", &[param("search", &query)])
                    .await?;
                let rows = document
                    .as_ref()
                    .and_then(|d| d.get("data"))
                    .and_then(|d| d.as_array())
                    .map(|rows| parse::players(rows))
                    .unwrap_or_default();
                debug!(found = rows.len(), "Player search complete");
                Ok(Arc::from(rows))
            })
            .await
    }

    /// Every per-game (football: per-week) stat row of a player in a season.
    #[instrument(skip(self))]
    pub async fn season_game_logs(
        &self,
        league: League,
        player_id: u64,
        season: i32,
    ) -> Result<Arc<[StatRecord]>, ApiError> {
        let key = CacheKey::new(
            format!("{}.game_logs", league),
            [player_id.to_string(), season.to_string()],
        );
        self.game_logs
            .get_or_fetch(key, self.ttl.game_logs_ttl(), || async {
                let season_param = match league {
                    League::Nfl => "season",
                    League::Nba | League::Mlb => "seasons[]",
                };
                let params = vec![
                    param(season_param, season),
                    param("player_ids[]", player_id),
                ];
                let rows = self
                    .fetcher
                    .fetch_all_pages(self.api.stats_base(league), "/stats", &params)
                    .await?;
                let records = parse::stat_records(&rows);
                debug!(records = records.len(), "Fetched game logs");
                Ok(Arc::from(records))
            })
            .await
    }

    /// Season rows sorted by `sort_key`, limited to `pages` pages.
    ///
    /// Basketball reads the leaders endpoint, the other leagues the sorted
    /// season stats endpoint.
    #[instrument(skip(self))]
    pub async fn leader_rows(
        &self,
        league: League,
        season: i32,
        sort_key: &str,
        order: SortOrder,
        pages: usize,
    ) -> Result<Arc<[StatRecord]>, ApiError> {
        let key = CacheKey::new(
            format!("{}.leader_rows", league),
            [
                season.to_string(),
                sort_key.to_string(),
                order.to_string(),
                pages.to_string(),
            ],
        );
        self.season_rows
            .get_or_fetch(key, self.ttl.season_stats_ttl(), || async {
                let (endpoint, params) = match league {
                    League::Nba => (
                        "/leaders",
                        vec![param("season", season), param("stat_type", sort_key)],
                    ),
                    League::Nfl | League::Mlb => (
                        "/season_stats",
                        vec![
                            param("season", season),
                            param("sort_by", sort_key),
                            param("sort_order", order.as_query()),
                        ],
                    ),
                };
                let rows = self
                    .fetcher
                    .fetch_pages(self.api.stats_base(league), endpoint, &params, pages)
                    .await?;
                let records: Vec<StatRecord> = rows
                    .iter()
                    .filter_map(|row| parse::leader_record(league, sort_key, row))
                    .collect();
                Ok(Arc::from(records))
            })
            .await
    }
}

/// Merge rows describing the same (player, game) into one record.
///
/// Sorted feeds for different categories repeat the same season row, and
/// basketball leader rows each carry a single figure, so stats are unioned.
/// First-seen order is kept.
pub fn merge_rows<'a>(rows: impl IntoIterator<Item = &'a StatRecord>) -> Vec<StatRecord> {
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut merged: Vec<StatRecord> = Vec::new();
    for row in rows {
        let identity = (row.player.id, row.game.id);
        match index.get(&identity) {
            Some(&slot) => {
                for (stat, value) in &row.stats {
                    merged[slot].stats.entry(stat.clone()).or_insert(*value);
                }
            }
            None => {
                index.insert(identity, merged.len());
                merged.push(row.clone());
            }
        }
    }
    merged
}
