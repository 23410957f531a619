mod test_utils;

use chrono::NaiveDate;
use serde_json::json;
use statline_cache::{CacheConfig, CacheConfigBuilder};
use statline_client::{
    ApiConfig, ApiConfigBuilder, FeedApi, FetchConfig, Fetcher, StatsApi, merge_rows,
};
use statline_core::{GameRef, League, PlayerRef, SortOrder, StatRecord};
use std::sync::Arc;
use test_utils::{MockTransport, nba_row, page};

fn api_config() -> ApiConfig {
    ApiConfigBuilder::default()
        .nba_base("https://stats.test/v1")
        .nfl_base("https://stats.test/nfl/v1")
        .mlb_base("https://stats.test/mlb/v1")
        .feed_base("https://feed.test/pull")
        .build()
        .unwrap()
}

fn stats_api(transport: &MockTransport, cache: CacheConfig) -> StatsApi {
    let fetcher = Fetcher::new(Arc::new(transport.clone()), FetchConfig::default());
    StatsApi::new(fetcher, api_config(), &cache)
}

fn feed_api(transport: &MockTransport) -> FeedApi {
    let fetcher = Fetcher::new(Arc::new(transport.clone()), FetchConfig::default());
    FeedApi::new(fetcher, api_config(), &CacheConfig::default())
}

#[tokio::test(start_paused = true)]
async fn game_logs_are_paginated_and_cached() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json(
            "/v1/stats",
            200,
            page(vec![nba_row(237, 1, "2024-10-22", 4, 10)], Some(100)),
        )
        .json(
            "/v1/stats",
            200,
            page(vec![nba_row(237, 2, "2024-10-24", 5, 5)], None),
        );
    let api = stats_api(&transport, CacheConfig::default());

    let first = api.season_game_logs(League::Nba, 237, 2024).await?;
    let second = api.season_game_logs(League::Nba, 237, 2024).await?;

    assert_eq!(first.len(), 2);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.calls()[0].0, "https://stats.test/v1/stats");
    assert_eq!(transport.param(0, "seasons[]").as_deref(), Some("2024"));
    assert_eq!(transport.param(0, "player_ids[]").as_deref(), Some("237"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn game_logs_expire_after_their_ttl() -> anyhow::Result<()> {
    let transport = MockTransport::new().json(
        "/nfl/v1/stats",
        200,
        page(vec![json!({"player": {"id": 19, "full_name": "QB One"}, "game": {"id": 3, "week": 1}, "passing_yards": 300})], None),
    );
    let api = stats_api(&transport, CacheConfig::default());

    api.season_game_logs(League::Nfl, 19, 2024).await?;
    tokio::time::advance(std::time::Duration::from_secs(24 * 3600)).await;
    api.season_game_logs(League::Nfl, 19, 2024).await?;

    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.param(0, "season").as_deref(), Some("2024"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn search_is_case_insensitive_and_cached() -> anyhow::Result<()> {
    let transport = MockTransport::new().json(
        "/mlb/v1/players",
        200,
        json!({"data": [{"id": 208, "full_name": "Aaron Judge", "position": "RF", "team": {"abbreviation": "NYY"}}]}),
    );
    let api = stats_api(&transport, CacheConfig::default());

    let found = api.search_players(League::Mlb, "Judge").await?;
    api.search_players(League::Mlb, "  judge ").await?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].team.as_deref(), Some("NYY"));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.param(0, "search").as_deref(), Some("judge"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_retried_on_next_call() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .text("/v1/players", 500, "boom")
        .json("/v1/players", 200, json!({"data": []}));
    let api = stats_api(&transport, CacheConfig::default());

    assert!(api.search_players(League::Nba, "x").await.is_err());
    let players = api.search_players(League::Nba, "x").await?;

    assert!(players.is_empty());
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn leader_rows_use_league_endpoint() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json(
            "/v1/leaders",
            200,
            json!({"data": [{"player": {"id": 1, "full_name": "Big Man"}, "value": 12.5, "games_played": 60, "stat_type": "reb"}]}),
        )
        .json(
            "/mlb/v1/season_stats",
            200,
            page(vec![json!({"player": {"id": 2, "full_name": "Ace"}, "pitching_era": 2.1, "pitching_ip": 180.0})], Some(5)),
        );
    let api = stats_api(&transport, CacheConfig::default());

    let rebounds = api
        .leader_rows(League::Nba, 2024, "reb", SortOrder::Descending, 1)
        .await?;
    let era = api
        .leader_rows(League::Mlb, 2024, "pitching_era", SortOrder::Ascending, 1)
        .await?;

    assert_eq!(rebounds[0].stat("reb"), 12.5);
    assert_eq!(era[0].stat("pitching_ip"), 180.0);
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.param(0, "stat_type").as_deref(), Some("reb"));
    assert_eq!(transport.param(1, "sort_by").as_deref(), Some("pitching_era"));
    assert_eq!(transport.param(1, "sort_order").as_deref(), Some("asc"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn disabled_cache_fetches_every_time() -> anyhow::Result<()> {
    let transport = MockTransport::new().json("/v1/players", 200, json!({"data": []}));
    let cache = CacheConfigBuilder::default().enabled(false).build()?;
    let api = stats_api(&transport, cache);

    api.search_players(League::Nba, "x").await?;
    api.search_players(League::Nba, "x").await?;

    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[test]
fn merged_rows_union_stats_per_player_and_game() {
    let a = StatRecord::new(PlayerRef::new(1, "A"), GameRef::new(0)).with_stat("pts", 30.0);
    let b = StatRecord::new(PlayerRef::new(2, "B"), GameRef::new(0)).with_stat("pts", 28.0);
    let a_reb = StatRecord::new(PlayerRef::new(1, "A"), GameRef::new(0)).with_stat("reb", 9.0);

    let merged = merge_rows([&a, &b, &a_reb]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].player.id, 1);
    assert_eq!(merged[0].stat("pts"), 30.0);
    assert_eq!(merged[0].stat("reb"), 9.0);
    assert_eq!(merged[1].player.id, 2);
}

#[tokio::test(start_paused = true)]
async fn feed_requests_use_basic_paths() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json(
            "/nba/latest/games.json",
            200,
            json!({"games": [{"schedule": {"id": 5, "playedStatus": "LIVE", "homeTeam": {"id": 1, "abbreviation": "BOS"}, "awayTeam": {"id": 2, "abbreviation": "NYK"}}, "score": {}}]}),
        )
        .json(
            "/nba/latest/games/5/boxscore.json",
            200,
            json!({"game": {"id": 5}, "scoring": {"homeScoreTotal": 101, "awayScoreTotal": 99}, "stats": {}}),
        );
    let feed = feed_api(&transport);

    let day = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
    let games = feed
        .daily_games(League::Nba, day)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no report"))?;
    let score = feed.box_score(League::Nba, 5).await?.unwrap();
    let missing = feed.box_score(League::Nba, 6).await?;

    assert_eq!(games.len(), 1);
    assert_eq!(transport.param(0, "date").as_deref(), Some("20241103"));
    assert_eq!(transport.calls()[0].0, "https://feed.test/pull/nba/latest/games.json");
    assert_eq!(score.home_total, 101);
    assert!(missing.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn missing_daily_report_is_not_an_empty_day() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .text("/nba/latest/games.json", 404, "")
        .json("/nba/latest/games.json", 200, json!({"lastUpdatedOn": null}))
        .json("/nba/latest/games.json", 200, json!({"games": []}));
    let feed = feed_api(&transport);
    let day = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();

    assert!(feed.daily_games(League::Nba, day).await?.is_none());
    assert!(feed.daily_games(League::Nba, day).await?.is_none());
    assert_eq!(feed.daily_games(League::Nba, day).await?, Some(Vec::new()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn projections_are_cached_and_refreshable() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json(
            "/nfl/latest/player_projections.json",
            200,
            json!({"playerProjections": [{"player": {"id": 8}, "projections": [{"category": "Passing Yards", "amount": 250}]}]}),
        )
        .json(
            "/nfl/latest/player_projections.json",
            200,
            json!({"playerProjections": []}),
        );
    let feed = feed_api(&transport);

    let first = feed.projections(League::Nfl).await?;
    let cached = feed.projections(League::Nfl).await?;
    assert_eq!(first.len(), 1);
    assert!(Arc::ptr_eq(&first, &cached));
    assert_eq!(transport.call_count(), 1);

    let refreshed = feed.refresh_projections(League::Nfl).await?;
    assert!(refreshed.is_empty());
    assert!(feed.projections(League::Nfl).await?.is_empty());
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn absent_projections_are_an_empty_table() -> anyhow::Result<()> {
    let feed = feed_api(&MockTransport::new());
    assert!(feed.projections(League::Mlb).await?.is_empty());
    assert!(feed.active_players(League::Mlb).await?.is_empty());
    Ok(())
}
