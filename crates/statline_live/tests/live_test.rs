//! Tests for live game tracking, alerts and progress.

use statline_core::{
    BoxScore, GameSnapshot, GameStatus, League, PlayerLine, PlayerProjection, PlayerRef,
    Projection, ProjectionTable, ScoreState, TeamRef,
};
use statline_live::{
    GameProgress, LiveEvent, LiveStateTracker, ProgressTier, prop_progress,
};

fn game(id: u64, status: GameStatus) -> GameSnapshot {
    GameSnapshot::new(id, status, TeamRef::new(1, "DAL"), TeamRef::new(2, "NYG"))
}

fn projections(player: &PlayerRef, category: &str, amount: f64) -> ProjectionTable {
    ProjectionTable::new([PlayerProjection {
        player: player.clone(),
        projections: vec![Projection {
            category: category.to_string(),
            amount,
        }],
    }])
}

fn box_score(game_id: u64, line: PlayerLine) -> BoxScore {
    BoxScore {
        game_id,
        home: TeamRef::new(1, "DAL"),
        away: TeamRef::new(2, "NYG"),
        home_total: 0,
        away_total: 0,
        players: vec![line],
    }
}

fn nfl_tracker() -> LiveStateTracker {
    LiveStateTracker::new(0.8).with_tracked_stats(League::Nfl, ["passingYards"])
}

#[test]
fn test_live_game_is_tracked_once() {
    let mut tracker = nfl_tracker();

    let events = tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    assert_eq!(
        events,
        vec![LiveEvent::GameStarted {
            league: League::Nfl,
            game_id: 10
        }]
    );

    let events = tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    assert!(events.is_empty());
    assert_eq!(tracker.live_games(League::Nfl), vec![10]);
    assert!(tracker.live_games(League::Nba).is_empty());
}

#[test]
fn test_completed_game_reported_once_then_discarded() {
    let mut tracker = nfl_tracker();
    tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);

    let score = ScoreState {
        home_total: 24,
        away_total: 17,
        ..ScoreState::default()
    };
    let finished = game(10, GameStatus::Completed).with_score(score);

    let events = tracker.observe(League::Nfl, std::slice::from_ref(&finished));
    match events.as_slice() {
        [LiveEvent::GameCompleted(final_score)] => {
            assert_eq!(final_score.game_id, 10);
            assert_eq!(final_score.home_total, 24);
            assert_eq!(final_score.away_total, 17);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert!(!tracker.is_tracked(League::Nfl, 10));

    assert!(tracker.observe(League::Nfl, &[finished]).is_empty());
}

#[test]
fn test_completed_untracked_game_is_ignored() {
    let mut tracker = nfl_tracker();
    assert!(
        tracker
            .observe(League::Nfl, &[game(11, GameStatus::Completed)])
            .is_empty()
    );
}

#[test]
fn test_game_missing_from_report_is_discarded() {
    let mut tracker = nfl_tracker();
    tracker.observe(
        League::Nfl,
        &[game(10, GameStatus::Live), game(11, GameStatus::Live)],
    );

    let events = tracker.observe(League::Nfl, &[game(11, GameStatus::Live)]);

    assert!(events.is_empty());
    assert_eq!(tracker.live_games(League::Nfl), vec![11]);
}

#[test]
fn test_alert_fires_once_per_player_stat_game() {
    let mut tracker = nfl_tracker();
    tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    let qb = PlayerRef::new(4, "D. Prescott");
    let table = projections(&qb, "Passing Yards", 250.0);

    let below = box_score(10, PlayerLine::new(qb.clone()).with_stat("passingYards", 150.0));
    assert!(tracker.check_alerts(League::Nfl, 10, &below, &table).is_empty());

    let reached = box_score(10, PlayerLine::new(qb.clone()).with_stat("passingYards", 201.0));
    let alerts = tracker.check_alerts(League::Nfl, 10, &reached, &table);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].stat, "Passing Yards");
    assert_eq!(alerts[0].live_value, 201.0);
    assert!(alerts[0].ratio() >= 0.8);

    let more = box_score(10, PlayerLine::new(qb).with_stat("passingYards", 300.0));
    assert!(tracker.check_alerts(League::Nfl, 10, &more, &table).is_empty());
}

#[test]
fn test_alert_state_resets_with_a_new_game() {
    let mut tracker = nfl_tracker();
    let qb = PlayerRef::new(4, "D. Prescott");
    let table = projections(&qb, "Passing Yards", 250.0);
    let line = PlayerLine::new(qb).with_stat("passingYards", 240.0);

    tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    assert_eq!(
        tracker
            .check_alerts(League::Nfl, 10, &box_score(10, line.clone()), &table)
            .len(),
        1
    );
    tracker.observe(League::Nfl, &[game(10, GameStatus::Completed)]);

    tracker.observe(League::Nfl, &[game(20, GameStatus::Live)]);
    assert_eq!(
        tracker
            .check_alerts(League::Nfl, 20, &box_score(20, line), &table)
            .len(),
        1
    );
}

#[test]
fn test_zero_projection_and_untracked_games_stay_silent() {
    let mut tracker = nfl_tracker();
    let qb = PlayerRef::new(4, "D. Prescott");
    let line = PlayerLine::new(qb.clone()).with_stat("passingYards", 100.0);

    // Not live yet.
    let table = projections(&qb, "Passing Yards", 100.0);
    assert!(
        tracker
            .check_alerts(League::Nfl, 10, &box_score(10, line.clone()), &table)
            .is_empty()
    );

    tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    let zero = projections(&qb, "Passing Yards", 0.0);
    assert!(
        tracker
            .check_alerts(League::Nfl, 10, &box_score(10, line.clone()), &zero)
            .is_empty()
    );

    let empty = ProjectionTable::default();
    assert!(
        tracker
            .check_alerts(League::Nfl, 10, &box_score(10, line), &empty)
            .is_empty()
    );
}

#[test]
fn test_untracked_stats_do_not_alert() {
    let mut tracker = nfl_tracker();
    tracker.observe(League::Nfl, &[game(10, GameStatus::Live)]);
    let rb = PlayerRef::new(5, "S. Barkley");
    let table = projections(&rb, "Rushing Yards", 80.0);
    let line = PlayerLine::new(rb).with_stat("rushingYards", 120.0);

    assert!(
        tracker
            .check_alerts(League::Nfl, 10, &box_score(10, line), &table)
            .is_empty()
    );
}

#[test]
fn test_prop_progress_tiers() {
    let player = PlayerRef::new(23, "L. James");
    let projection = PlayerProjection {
        player: player.clone(),
        projections: vec![
            Projection {
                category: "Points".to_string(),
                amount: 25.0,
            },
            Projection {
                category: "Rebounds".to_string(),
                amount: 10.0,
            },
            Projection {
                category: "Assists".to_string(),
                amount: 8.0,
            },
            Projection {
                category: "Steals".to_string(),
                amount: 2.0,
            },
            Projection {
                category: "Blocks".to_string(),
                amount: 0.0,
            },
        ],
    };
    let line = PlayerLine::new(player)
        .with_stat("points", 27.0)
        .with_stat("rebounds", 8.0)
        .with_stat("assists", 4.0);

    let rows = prop_progress(&line, &projection, 0.8);
    let tiers: Vec<_> = rows.iter().map(|r| r.tier).collect();

    assert_eq!(
        tiers,
        [
            ProgressTier::Hit,
            ProgressTier::Close,
            ProgressTier::Halfway,
            ProgressTier::Behind,
            ProgressTier::NoProjection,
        ]
    );
    assert_eq!(rows[0].live, 27.0);
    assert_eq!(rows[3].live, 0.0);
}

#[test]
fn test_quarter_progress() {
    let score = ScoreState {
        current_quarter: 3,
        seconds_remaining: 245,
        ..ScoreState::default()
    };

    let nba = GameProgress::from_score(League::Nba, &score);
    assert_eq!(nba.label, "Q3 - 4:05");
    // 24 minutes plus 7:55 of 48.
    assert!((nba.fraction - (24.0 * 60.0 + 475.0) / 2880.0).abs() < 1e-9);

    let overtime = ScoreState {
        current_quarter: 5,
        seconds_remaining: 60,
        ..ScoreState::default()
    };
    assert_eq!(GameProgress::from_score(League::Nfl, &overtime).fraction, 1.0);
}

#[test]
fn test_inning_progress_and_bar() {
    let score = ScoreState {
        current_inning: 7,
        inning_half: Some("Bottom".to_string()),
        ..ScoreState::default()
    };
    let progress = GameProgress::from_score(League::Mlb, &score);

    assert_eq!(progress.label, "Bottom 7");
    assert_eq!(progress.bar(), format!("({}{})", "█".repeat(10), "░".repeat(5)));
}

#[test]
fn test_not_started_game() {
    let progress = GameProgress::from_score(League::Nba, &ScoreState::default());

    assert_eq!(progress.label, "Starting Soon");
    assert_eq!(progress.fraction, 0.0);
    assert_eq!(progress.bar(), format!("({})", "░".repeat(15)));
}
