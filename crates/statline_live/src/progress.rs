//! How far through regulation a game is.

use serde::{Deserialize, Serialize};
use statline_core::{ClockLayout, League, ScoreState};

/// Width of the rendered progress bar in cells.
pub const BAR_WIDTH: usize = 15;

const STARTING_SOON: &str = "Starting Soon";
const REGULATION_QUARTERS: u32 = 4;

/// Fraction of regulation elapsed and the current period label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Elapsed share of regulation, in `0.0..=1.0`
    pub fraction: f64,
    /// "Q3 - 4:05", "Top 7" or "Starting Soon"
    pub label: String,
}

impl GameProgress {
    /// Progress from a running score.
    ///
    /// Quarter leagues count elapsed clock time over four quarters. Baseball
    /// counts completed innings over nine. Overtime and extra innings clamp
    /// to `1.0`.
    ///
    /// ```
    /// use statline_core::{League, ScoreState};
    /// use statline_live::GameProgress;
    ///
    /// let score = ScoreState {
    ///     current_quarter: 3,
    ///     seconds_remaining: 245,
    ///     ..ScoreState::default()
    /// };
    /// let progress = GameProgress::from_score(League::Nba, &score);
    /// assert_eq!(progress.label, "Q3 - 4:05");
    /// ```
    pub fn from_score(league: League, score: &ScoreState) -> Self {
        match league.clock() {
            ClockLayout::Quarters { minutes } => {
                if score.current_quarter == 0 {
                    return Self::not_started();
                }
                let quarter_secs = minutes * 60;
                let remaining = score.seconds_remaining.min(quarter_secs);
                let elapsed = (score.current_quarter - 1) * quarter_secs + (quarter_secs - remaining);
                let total = REGULATION_QUARTERS * quarter_secs;
                Self {
                    fraction: (f64::from(elapsed) / f64::from(total)).min(1.0),
                    label: format!(
                        "Q{} - {}:{:02}",
                        score.current_quarter,
                        score.seconds_remaining / 60,
                        score.seconds_remaining % 60
                    ),
                }
            }
            ClockLayout::Innings { count } => {
                if score.current_inning == 0 {
                    return Self::not_started();
                }
                let half = score.inning_half.as_deref().unwrap_or("Top");
                Self {
                    fraction: (f64::from(score.current_inning - 1) / f64::from(count)).min(1.0),
                    label: format!("{half} {}", score.current_inning),
                }
            }
        }
    }

    fn not_started() -> Self {
        Self {
            fraction: 0.0,
            label: STARTING_SOON.to_string(),
        }
    }

    /// Bar of [`BAR_WIDTH`] cells, filled cells rounded down: `(█████░░░░░░░░░░)`.
    pub fn bar(&self) -> String {
        let filled = ((BAR_WIDTH as f64) * self.fraction) as usize;
        let filled = filled.min(BAR_WIDTH);
        format!("({}{})", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }
}
