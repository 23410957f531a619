//! JSON documents from the remote sources into core types.
//!
//! The stats provider uses snake_case rows with the statistics as top-level
//! numeric fields (sometimes nested under `stats`). The live feed uses
//! camelCase documents. Rows without a usable player or game id are skipped.

use chrono::NaiveDate;
use serde_json::{Map, Value as JsonValue};
use statline_core::{
    BoxScore, GameRef, GameSnapshot, GameStatus, League, PlayerLine, PlayerProjection, PlayerRef,
    Projection, ProjectionTable, ScoreState, StatRecord, TeamRef,
};
use statline_error::ApiErrorKind;
use std::collections::{BTreeMap, HashMap};

/// Positions kept in the football active-player index.
pub const NFL_INDEX_POSITIONS: [&str; 5] = ["QB", "RB", "WR", "TE", "K"];

static NULL: JsonValue = JsonValue::Null;

const NON_STAT_KEYS: [&str; 6] = ["id", "player", "game", "team", "season", "stats"];

/// Numeric value of a field. Accepts numbers, numeric strings and `MM:SS`
/// clock strings (returned as minutes).
///
/// ```
/// use serde_json::json;
/// use statline_client::parse::number;
///
/// assert_eq!(number(&json!(12)), Some(12.0));
/// assert_eq!(number(&json!("0.312")), Some(0.312));
/// assert_eq!(number(&json!("32:15")), Some(32.25));
/// assert_eq!(number(&json!(null)), None);
/// ```
pub fn number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => {
            let s = s.trim();
            if let Some((minutes, seconds)) = s.split_once(':') {
                let minutes: f64 = minutes.parse().ok()?;
                let seconds: f64 = seconds.parse().ok()?;
                Some(minutes + seconds / 60.0)
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

fn id(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn text<'a>(value: &'a JsonValue, key: &str) -> Option<&'a str> {
    value.get(key).and_then(JsonValue::as_str)
}

fn count(value: &JsonValue, key: &str) -> u32 {
    value
        .get(key)
        .and_then(number)
        .map(|n| n.max(0.0) as u32)
        .unwrap_or(0)
}

fn date(value: &JsonValue) -> Option<NaiveDate> {
    let raw = value.as_str()?;
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Player object from the stats provider.
pub fn player(value: &JsonValue) -> Option<PlayerRef> {
    let player_id = id(value.get("id")?)?;
    let name = match text(value, "full_name") {
        Some(full) => full.to_string(),
        None => {
            let first = text(value, "first_name").unwrap_or_default();
            let last = text(value, "last_name").unwrap_or_default();
            format!("{} {}", first, last).trim().to_string()
        }
    };

    let mut player = PlayerRef::new(player_id, name);
    if let Some(position) = text(value, "position").filter(|p| !p.is_empty()) {
        player = player.with_position(position);
    }
    if let Some(team) = value.get("team").and_then(|t| text(t, "abbreviation")) {
        player = player.with_team(team);
    }
    Some(player)
}

/// Player list rows (search results).
pub fn players(rows: &[JsonValue]) -> Vec<PlayerRef> {
    rows.iter().filter_map(player).collect()
}

fn collect_stats(object: &Map<String, JsonValue>, stats: &mut BTreeMap<String, f64>) {
    for (key, value) in object {
        if NON_STAT_KEYS.contains(&key.as_str()) || key.ends_with("_id") {
            continue;
        }
        if let Some(n) = number(value) {
            stats.insert(key.clone(), n);
        }
    }
}

/// Stat row (game log or season row) from the stats provider.
///
/// Season rows carry no game and get game id 0.
pub fn stat_record(row: &JsonValue) -> Option<StatRecord> {
    let object = row.as_object()?;
    let mut player = player(row.get("player")?)?;
    if player.team.is_none()
        && let Some(team) = row.get("team").and_then(|t| text(t, "abbreviation"))
    {
        player = player.with_team(team);
    }

    let game = match row.get("game") {
        Some(game) => {
            let mut game_ref = GameRef::new(game.get("id").and_then(id).unwrap_or(0));
            if let Some(day) = game.get("date").and_then(date) {
                game_ref = game_ref.on(day);
            }
            if let Some(week) = game.get("week").and_then(number) {
                game_ref = game_ref.in_week(week as u32);
            }
            game_ref
        }
        None => GameRef::new(0),
    };

    let mut stats = BTreeMap::new();
    collect_stats(object, &mut stats);
    if let Some(nested) = row.get("stats").and_then(JsonValue::as_object) {
        collect_stats(nested, &mut stats);
    }

    Some(StatRecord {
        player,
        game,
        stats,
    })
}

/// Stat rows, skipping rows without a player.
pub fn stat_records(rows: &[JsonValue]) -> Vec<StatRecord> {
    let records: Vec<StatRecord> = rows.iter().filter_map(stat_record).collect();
    if records.len() < rows.len() {
        tracing::debug!(
            skipped = rows.len() - records.len(),
            "Skipped stat rows without a player"
        );
    }
    records
}

/// Leader row for one sort key.
///
/// Basketball leader rows report the figure as `value` (with `games_played`),
/// so it is stored under `sort_key`. Other leagues return full season rows.
pub fn leader_record(league: League, sort_key: &str, row: &JsonValue) -> Option<StatRecord> {
    match league {
        League::Nba => {
            let player = player(row.get("player")?)?;
            let mut record = StatRecord::new(player, GameRef::new(0));
            if let Some(value) = row.get("value").and_then(number) {
                record = record.with_stat(sort_key, value);
            }
            if let Some(games) = row.get("games_played").and_then(number) {
                record = record.with_stat("games_played", games);
            }
            Some(record)
        }
        League::Nfl | League::Mlb => stat_record(row),
    }
}

/// Player object from the live feed.
pub fn feed_player(value: &JsonValue) -> Option<PlayerRef> {
    let player_id = id(value.get("id")?)?;
    let first = text(value, "firstName").unwrap_or_default();
    let last = text(value, "lastName").unwrap_or_default();
    let mut player = PlayerRef::new(player_id, format!("{} {}", first, last).trim());
    if let Some(position) = text(value, "primaryPosition") {
        player = player.with_position(position);
    }
    if let Some(team) = value
        .get("currentTeam")
        .and_then(|t| text(t, "abbreviation"))
    {
        player = player.with_team(team);
    }
    Some(player)
}

fn played_status(raw: Option<&str>) -> GameStatus {
    match raw {
        Some("LIVE") => GameStatus::Live,
        Some(s) if s.starts_with("COMPLETED") => GameStatus::Completed,
        _ => GameStatus::Unplayed,
    }
}

fn team(
    value: Option<&JsonValue>,
    references: &HashMap<u64, String>,
    fallback: &str,
) -> TeamRef {
    let team_id = value.and_then(|t| t.get("id")).and_then(id).unwrap_or(0);
    let abbreviation = references
        .get(&team_id)
        .map(String::as_str)
        .or_else(|| value.and_then(|t| text(t, "abbreviation")))
        .unwrap_or(fallback);
    TeamRef::new(team_id, abbreviation)
}

/// Daily games report.
pub fn daily_games(document: &JsonValue) -> Vec<GameSnapshot> {
    let references: HashMap<u64, String> = document
        .get("references")
        .and_then(|r| r.get("teamReferences"))
        .and_then(JsonValue::as_array)
        .map(|teams| {
            teams
                .iter()
                .filter_map(|t| Some((id(t.get("id")?)?, text(t, "abbreviation")?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    let Some(games) = document.get("games").and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    games
        .iter()
        .filter_map(|game| {
            let schedule = game.get("schedule")?;
            let game_id = id(schedule.get("id")?)?;
            let score = game.get("score").unwrap_or(&NULL);

            let seconds_remaining = ["currentQuarterSecondsRemaining", "secondsRemaining"]
                .iter()
                .find_map(|key| score.get(*key).and_then(number))
                .unwrap_or(0.0);

            let mut snapshot = GameSnapshot::new(
                game_id,
                played_status(text(schedule, "playedStatus")),
                team(schedule.get("homeTeam"), &references, "HOME"),
                team(schedule.get("awayTeam"), &references, "AWAY"),
            )
            .with_score(ScoreState {
                home_total: count(score, "homeScoreTotal"),
                away_total: count(score, "awayScoreTotal"),
                current_quarter: count(score, "currentQuarter"),
                seconds_remaining: seconds_remaining.max(0.0) as u32,
                current_inning: count(score, "currentInning"),
                inning_half: text(score, "currentInningHalf").map(str::to_string),
            });
            snapshot.start_time = text(schedule, "startTime").map(str::to_string);
            Some(snapshot)
        })
        .collect()
}

fn flatten_numbers(value: &JsonValue, stats: &mut BTreeMap<String, f64>) {
    match value {
        JsonValue::Object(object) => {
            for (key, inner) in object {
                match inner {
                    JsonValue::Object(_) | JsonValue::Array(_) => flatten_numbers(inner, stats),
                    _ => {
                        if let Some(n) = number(inner) {
                            stats.insert(key.clone(), n);
                        }
                    }
                }
            }
        }
        JsonValue::Array(items) => items.iter().for_each(|item| flatten_numbers(item, stats)),
        _ => {}
    }
}

fn player_lines(side: Option<&JsonValue>) -> Vec<PlayerLine> {
    side.and_then(|s| s.get("players"))
        .and_then(JsonValue::as_array)
        .map(|players| {
            players
                .iter()
                .filter_map(|entry| {
                    let player = feed_player(entry.get("player")?)?;
                    let mut stats = BTreeMap::new();
                    if let Some(categories) = entry.get("playerStats") {
                        flatten_numbers(categories, &mut stats);
                    }
                    Some(PlayerLine { player, stats })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Box score of one game.
///
/// # Errors
///
/// [`ApiErrorKind::Decode`] when the document has no game id.
pub fn box_score(document: &JsonValue) -> Result<BoxScore, ApiErrorKind> {
    let game = document
        .get("game")
        .ok_or_else(|| ApiErrorKind::Decode("box score without game".to_string()))?;
    let game_id = game
        .get("id")
        .and_then(id)
        .ok_or_else(|| ApiErrorKind::Decode("box score without game id".to_string()))?;

    let no_refs = HashMap::new();
    let scoring = document.get("scoring").unwrap_or(&NULL);
    let stats = document.get("stats");

    let mut players = player_lines(stats.and_then(|s| s.get("away")));
    players.extend(player_lines(stats.and_then(|s| s.get("home"))));

    Ok(BoxScore {
        game_id,
        home: team(game.get("homeTeam"), &no_refs, "HOME"),
        away: team(game.get("awayTeam"), &no_refs, "AWAY"),
        home_total: count(scoring, "homeScoreTotal"),
        away_total: count(scoring, "awayScoreTotal"),
        players,
    })
}

/// Player projections document.
pub fn projections(document: &JsonValue) -> ProjectionTable {
    let entries = document
        .get("playerProjections")
        .and_then(JsonValue::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let player = feed_player(row.get("player")?)?;
                    let projections = row
                        .get("projections")
                        .and_then(JsonValue::as_array)
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(|item| {
                                    Some(Projection {
                                        category: text(item, "category")?.to_string(),
                                        amount: item.get("amount").and_then(number)?,
                                    })
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    Some(PlayerProjection {
                        player,
                        projections,
                    })
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    ProjectionTable::new(entries)
}

/// Active player index. Football keeps only skill positions and kickers.
pub fn active_players(league: League, document: &JsonValue) -> Vec<PlayerRef> {
    let rows = ["players", "playerReferences"]
        .iter()
        .find_map(|key| document.get(*key).and_then(JsonValue::as_array));
    let Some(rows) = rows else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| feed_player(row.get("player").unwrap_or(row)))
        .filter(|player| match league {
            League::Nfl => player
                .position
                .as_deref()
                .is_some_and(|p| NFL_INDEX_POSITIONS.contains(&p)),
            League::Nba | League::Mlb => true,
        })
        .collect()
}
