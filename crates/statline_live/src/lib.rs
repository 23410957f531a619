//! Live game tracking for Statline.
//!
//! [`LiveStateTracker`] follows each league's games through
//! `absent -> live -> completed` and makes sure a projection alert fires at
//! most once per player, stat and game. [`prop_progress`] and
//! [`GameProgress`] turn live figures into presentation-ready comparisons.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod progress;
mod props;
mod tracker;

pub use progress::{BAR_WIDTH, GameProgress};
pub use props::{ProgressTier, PropProgress, prop_progress};
pub use tracker::{DEFAULT_ALERT_THRESHOLD, LiveEvent, LiveGameState, LiveStateTracker};
