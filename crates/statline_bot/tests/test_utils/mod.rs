//! Test utilities for statline_bot tests.

#[path = "../../../statline_client/tests/test_utils/mock_transport.rs"]
pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockReply, MockTransport};

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use statline_bot::{BotEvent, Presenter, StatsService};
use statline_cache::CacheConfig;
use statline_client::{ApiConfig, ApiConfigBuilder, FeedApi, FetchConfig, Fetcher, StatsApi};
use statline_error::StatlineResult;
use std::sync::{Arc, Mutex};

/// Presenter that keeps every published event.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<BotEvent>>>,
}

#[allow(dead_code)]
impl RecordingPresenter {
    pub fn events(&self) -> Vec<BotEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn publish(&self, event: BotEvent) -> StatlineResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[allow(dead_code)]
pub fn api_config() -> ApiConfig {
    ApiConfigBuilder::default()
        .nba_base("https://stats.test/v1")
        .nfl_base("https://stats.test/nfl/v1")
        .mlb_base("https://stats.test/mlb/v1")
        .feed_base("https://feed.test/pull")
        .build()
        .unwrap()
}

/// Service over two scripted transports with default caching.
#[allow(dead_code)]
pub fn service(stats: &MockTransport, feed: &MockTransport) -> StatsService {
    let cache = CacheConfig::default();
    let stats_api = StatsApi::new(
        Fetcher::new(Arc::new(stats.clone()), FetchConfig::default()),
        api_config(),
        &cache,
    );
    let feed_api = FeedApi::new(
        Fetcher::new(Arc::new(feed.clone()), FetchConfig::default()),
        api_config(),
        &cache,
    );
    StatsService::new(stats_api, feed_api, &cache, 0.8)
}

/// One page of a cursor-paginated list.
#[allow(dead_code)]
pub fn page(data: Vec<JsonValue>, next_cursor: Option<u64>) -> JsonValue {
    json!({ "data": data, "meta": { "next_cursor": next_cursor, "per_page": 100 } })
}

/// A basketball game-log row.
#[allow(dead_code)]
pub fn nba_row(player_id: u64, game_id: u64, date: &str, fgm: u32, fga: u32) -> JsonValue {
    json!({
        "id": game_id * 1000 + player_id,
        "min": "31:30",
        "pts": fgm * 2,
        "fgm": fgm,
        "fga": fga,
        "player": { "id": player_id, "first_name": "Jayson", "last_name": "Tatum", "position": "F" },
        "team": { "id": 2, "abbreviation": "BOS" },
        "game": { "id": game_id, "date": date }
    })
}

/// Daily games report with one basketball game in `status`.
#[allow(dead_code)]
pub fn daily_games(game_id: u64, status: &str, home: u32, away: u32) -> JsonValue {
    json!({
        "games": [{
            "schedule": {
                "id": game_id,
                "playedStatus": status,
                "startTime": "2024-11-01T23:30:00.000Z",
                "homeTeam": { "id": 1, "abbreviation": "BOS" },
                "awayTeam": { "id": 2, "abbreviation": "NYK" }
            },
            "score": {
                "homeScoreTotal": home,
                "awayScoreTotal": away,
                "currentQuarter": 3,
                "currentQuarterSecondsRemaining": 300
            }
        }]
    })
}

/// Box score with one home player scoring `points`.
#[allow(dead_code)]
pub fn box_score(game_id: u64, player_id: u64, points: u32, home: u32, away: u32) -> JsonValue {
    json!({
        "game": {
            "id": game_id,
            "homeTeam": { "id": 1, "abbreviation": "BOS" },
            "awayTeam": { "id": 2, "abbreviation": "NYK" }
        },
        "scoring": { "homeScoreTotal": home, "awayScoreTotal": away },
        "stats": {
            "away": { "players": [] },
            "home": { "players": [{
                "player": { "id": player_id, "firstName": "Jayson", "lastName": "Tatum", "primaryPosition": "SF" },
                "playerStats": [{ "offense": { "points": points } }]
            }] }
        }
    })
}

/// Projections document projecting `points` for one player.
#[allow(dead_code)]
pub fn projections(player_id: u64, points: f64) -> JsonValue {
    json!({
        "playerProjections": [{
            "player": { "id": player_id, "firstName": "Jayson", "lastName": "Tatum", "primaryPosition": "SF" },
            "projections": [
                { "category": "Points", "amount": points },
                { "category": "Rebounds", "amount": 8.5 }
            ]
        }]
    })
}
