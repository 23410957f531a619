//! Test utilities for statline_client tests.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockReply, MockTransport};

use serde_json::{Value as JsonValue, json};

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
        "player": { "id": player_id, "first_name": "Test", "last_name": format!("Player{}", player_id), "position": "G", "team_id": 2 },
        "team": { "id": 2, "abbreviation": "BOS" },
        "game": { "id": game_id, "date": date, "season": 2024 }
    })
}
