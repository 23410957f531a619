use chrono::NaiveDate;
use serde_json::json;
use statline_client::parse;
use statline_core::{GameStatus, League};

#[test]
fn nba_game_log_row_becomes_record() {
    let row = json!({
        "id": 101,
        "min": "32:15",
        "pts": 28,
        "reb": 7,
        "fg_pct": 0.5,
        "team_id": 14,
        "player": { "id": 237, "first_name": "LeBron", "last_name": "James", "position": "F", "team_id": 14 },
        "team": { "id": 14, "abbreviation": "LAL" },
        "game": { "id": 9001, "date": "2024-10-22T00:00:00.000Z", "season": 2024 }
    });

    let record = parse::stat_record(&row).unwrap();

    assert_eq!(record.player.id, 237);
    assert_eq!(record.player.name, "LeBron James");
    assert_eq!(record.player.team.as_deref(), Some("LAL"));
    assert_eq!(record.game.id, 9001);
    assert_eq!(record.game.date, NaiveDate::from_ymd_opt(2024, 10, 22));
    assert_eq!(record.stat("min"), 32.25);
    assert_eq!(record.stat("pts"), 28.0);
    assert!(!record.stats.contains_key("id"));
    assert!(!record.stats.contains_key("team_id"));
}

#[test]
fn nested_stats_and_weeks_are_read() {
    let row = json!({
        "player": { "id": 19, "first_name": "Patrick", "last_name": "Mahomes", "position": "Quarterback" },
        "game": { "id": 55, "week": 7 },
        "stats": { "passing_yards": 262, "passing_touchdowns": "2" }
    });

    let record = parse::stat_record(&row).unwrap();

    assert_eq!(record.game.week, Some(7));
    assert_eq!(record.player.position.as_deref(), Some("Quarterback"));
    assert_eq!(record.stat("passing_yards"), 262.0);
    assert_eq!(record.stat("passing_touchdowns"), 2.0);
}

#[test]
fn rows_without_player_are_skipped() {
    let rows = vec![
        json!({ "pts": 10 }),
        json!({ "player": { "id": 4, "full_name": "A B" }, "pts": 3 }),
    ];

    let records = parse::stat_records(&rows);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].player.name, "A B");
    assert_eq!(records[0].game.id, 0);
}

#[test]
fn basketball_leader_rows_store_value_under_sort_key() {
    let row = json!({
        "player": { "id": 115, "first_name": "Stephen", "last_name": "Curry" },
        "value": 26.4,
        "stat_type": "pts",
        "rank": 3,
        "games_played": 70
    });

    let record = parse::leader_record(League::Nba, "pts", &row).unwrap();

    assert_eq!(record.stat("pts"), 26.4);
    assert_eq!(record.stat("games_played"), 70.0);
    assert_eq!(record.stats.len(), 2);
}

#[test]
fn daily_games_resolve_team_references() {
    let document = json!({
        "games": [
            {
                "schedule": {
                    "id": 1,
                    "startTime": "2024-11-03T18:00:00.000Z",
                    "playedStatus": "LIVE",
                    "homeTeam": { "id": 10 },
                    "awayTeam": { "id": 20, "abbreviation": "SCHED" }
                },
                "score": { "homeScoreTotal": 14, "awayScoreTotal": 10, "currentQuarter": 3, "currentQuarterSecondsRemaining": 245 }
            },
            {
                "schedule": { "id": 2, "playedStatus": "COMPLETED_PENDING_REVIEW", "homeTeam": { "id": 30 }, "awayTeam": { "id": 40 } },
                "score": { "homeScoreTotal": null }
            },
            { "schedule": { "playedStatus": "LIVE" } }
        ],
        "references": { "teamReferences": [
            { "id": 10, "abbreviation": "KC" },
            { "id": 20, "abbreviation": "BUF" }
        ] }
    });

    let games = parse::daily_games(&document);

    assert_eq!(games.len(), 2);
    assert_eq!(games[0].status, GameStatus::Live);
    assert_eq!(games[0].home.abbreviation, "KC");
    assert_eq!(games[0].away.abbreviation, "BUF");
    assert_eq!(games[0].score.current_quarter, 3);
    assert_eq!(games[0].score.seconds_remaining, 245);
    assert_eq!(games[0].score.home_total, 14);
    assert_eq!(games[1].status, GameStatus::Completed);
    assert_eq!(games[1].home.abbreviation, "HOME");
    assert_eq!(games[1].score.home_total, 0);
}

#[test]
fn box_score_flattens_player_stat_categories() {
    let document = json!({
        "game": { "id": 77, "homeTeam": { "id": 1, "abbreviation": "PHI" }, "awayTeam": { "id": 2, "abbreviation": "DAL" } },
        "scoring": { "homeScoreTotal": 24, "awayScoreTotal": 17 },
        "stats": {
            "away": { "players": [
                { "player": { "id": 8, "firstName": "Dak", "lastName": "Prescott", "primaryPosition": "QB" },
                  "playerStats": [ { "passing": { "passYards": 201 }, "miscellaneous": { "passingYards": 201, "passingTouchdowns": 1 } } ] }
            ] },
            "home": { "players": [
                { "player": { "id": 9, "firstName": "Saquon", "lastName": "Barkley" },
                  "playerStats": [ { "rushing": { "rushYards": 88 } } ] }
            ] }
        }
    });

    let score = parse::box_score(&document).unwrap();

    assert_eq!(score.game_id, 77);
    assert_eq!(score.home.abbreviation, "PHI");
    assert_eq!((score.home_total, score.away_total), (24, 17));
    assert_eq!(score.players.len(), 2);
    assert_eq!(score.players[0].player.name, "Dak Prescott");
    assert_eq!(score.player(8).unwrap().value("passingYards"), 201.0);
    assert_eq!(score.player(9).unwrap().value("rushYards"), 88.0);

    assert!(parse::box_score(&json!({ "scoring": {} })).is_err());
}

#[test]
fn projections_keep_category_labels() {
    let document = json!({
        "playerProjections": [
            { "player": { "id": 8, "firstName": "Dak", "lastName": "Prescott" },
              "projections": [
                  { "category": "Passing Yards", "amount": 250.5 },
                  { "category": "Passing Touchdowns", "amount": "2" },
                  { "category": "Broken" }
              ] },
            { "projections": [] }
        ]
    });

    let table = parse::projections(&document);

    assert_eq!(table.len(), 1);
    let projection = table.get(8).unwrap();
    assert_eq!(projection.projections.len(), 2);
    assert_eq!(projection.amount("passingYards").unwrap().category, "Passing Yards");
    assert_eq!(projection.amount("passing_touchdowns").unwrap().amount, 2.0);
}

#[test]
fn football_index_keeps_skill_positions() {
    let document = json!({
        "players": [
            { "player": { "id": 1, "firstName": "A", "lastName": "Qb", "primaryPosition": "QB" } },
            { "player": { "id": 2, "firstName": "B", "lastName": "Lb", "primaryPosition": "LB" } },
            { "player": { "id": 3, "firstName": "C", "lastName": "K", "primaryPosition": "K" } },
            { "player": { "id": 4, "firstName": "D", "lastName": "None" } }
        ]
    });

    let nfl: Vec<u64> = parse::active_players(League::Nfl, &document)
        .iter()
        .map(|p| p.id)
        .collect();
    let nba = parse::active_players(League::Nba, &document);

    assert_eq!(nfl, vec![1, 3]);
    assert_eq!(nba.len(), 4);
}
