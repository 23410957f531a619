//! Turns per-game stat records into season figures and leaderboards.
//!
//! All league differences are data in [`SportRules`]: which records
//! qualify, how a role is assigned, which stats are ratios and how each
//! leaderboard category is ranked. The functions here are pure and never
//! fetch.
//!
//! # Example
//!
//! ```
//! use statline_aggregate::{SportRules, aggregate_season};
//! use statline_core::{GameRef, League, PlayerRef, StatSource, StatRecord};
//!
//! let player = PlayerRef::new(115, "S. Curry");
//! let records = vec![
//!     StatRecord::new(player.clone(), GameRef::new(1))
//!         .with_stat("min", 34.0)
//!         .with_stat("fgm", 4.0)
//!         .with_stat("fga", 10.0),
//!     StatRecord::new(player, GameRef::new(2))
//!         .with_stat("min", 30.0)
//!         .with_stat("fgm", 5.0)
//!         .with_stat("fga", 5.0),
//! ];
//!
//! let season = aggregate_season(&records, &SportRules::for_league(League::Nba)).unwrap();
//! assert_eq!(season.value(&StatSource::ratio("fg_pct")), Some(0.6));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod league;
mod rules;
mod season;

pub use league::{LEADERS_PER_CATEGORY, aggregate_league};
pub use rules::{
    LayoutField, LeaderCategory, MinSample, Qualifier, RatioStat, RoleContest, RoleRule,
    SportRules, StatChoice,
};
pub use season::{StatLine, aggregate_season, latest_games, recent_form, summarize};
