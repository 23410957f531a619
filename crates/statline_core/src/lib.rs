//! Core data types for the Statline engine.
//!
//! Everything here is plain data: leagues and season arithmetic, per-game
//! stat records, derived season figures, leaderboards and the live-feed
//! types the tracker works on. Nothing in this crate performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod leaderboard;
mod league;
mod live;
mod record;

pub use aggregate::{RecentForm, Role, SeasonAggregate, StatSource};
pub use leaderboard::{CategoryLeaders, Leaderboard, LeaderboardEntry, SortOrder};
pub use league::{ClockLayout, League};
pub use live::{
    AlertIdentifier, BoxScore, FinalScore, GameSnapshot, GameStatus, LiveAlert, PlayerLine,
    PlayerProjection, Projection, ProjectionTable, ScoreState, TeamRef,
};
pub use record::{GameRef, PlayerRef, StatRecord, normalize_stat_key};
