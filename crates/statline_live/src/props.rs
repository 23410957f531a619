//! Live-versus-projected comparison for one player.

use serde::{Deserialize, Serialize};
use statline_core::{PlayerLine, PlayerProjection};

/// How close a live figure is to its projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProgressTier {
    /// At or above the projection
    Hit,
    /// At or above the alert threshold
    Close,
    /// At least half way
    Halfway,
    /// Less than half way
    Behind,
    /// Projected at zero or less
    NoProjection,
}

impl ProgressTier {
    /// Tier for a live figure against a projection.
    pub fn classify(live: f64, projected: f64, threshold: f64) -> Self {
        if projected <= 0.0 {
            return ProgressTier::NoProjection;
        }
        let ratio = live / projected;
        if ratio >= 1.0 {
            ProgressTier::Hit
        } else if ratio >= threshold {
            ProgressTier::Close
        } else if ratio >= 0.5 {
            ProgressTier::Halfway
        } else {
            ProgressTier::Behind
        }
    }
}

/// One projected stat compared with the live box score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropProgress {
    /// Projection category label
    pub label: String,
    /// Live figure, zero when the box score lacks it
    pub live: f64,
    /// Projected figure
    pub projected: f64,
    /// Comparison tier
    pub tier: ProgressTier,
}

/// Compare every projected stat of a player with their live line.
///
/// Rows follow projection order. Stats are matched on normalized keys, so
/// the category `"Passing Yards"` reads the box score key `passingYards`.
pub fn prop_progress(
    line: &PlayerLine,
    projection: &PlayerProjection,
    threshold: f64,
) -> Vec<PropProgress> {
    projection
        .projections
        .iter()
        .map(|p| {
            let live = line.value(&p.category);
            PropProgress {
                label: p.category.clone(),
                live,
                projected: p.amount,
                tier: ProgressTier::classify(live, p.amount, threshold),
            }
        })
        .collect()
}
