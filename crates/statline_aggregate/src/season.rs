//! Per-player season aggregation and recent form.

use crate::{LayoutField, SportRules};
use serde::{Deserialize, Serialize};
use statline_core::{RecentForm, SeasonAggregate, StatRecord};
use statline_error::{StatsError, StatsErrorKind};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Aggregate one player's records for a season.
///
/// Only records admitted by the league qualifier count. Totals sum every
/// stat, averages divide totals by qualifying games, and ratios are summed
/// then divided so that `[(4, 10), (5, 5), (0, 2)]` gives `9 / 17`.
///
/// # Errors
///
/// [`StatsErrorKind::Unavailable`] when no record qualifies.
#[instrument(skip_all, fields(league = %rules.league(), records = records.len()))]
pub fn aggregate_season(
    records: &[StatRecord],
    rules: &SportRules,
) -> Result<SeasonAggregate, StatsError> {
    let qualifying: Vec<&StatRecord> = records
        .iter()
        .filter(|r| rules.qualifier().admits(r))
        .collect();
    aggregate_qualifying(&qualifying, rules).ok_or_else(|| StatsError::unavailable(scope(records)))
}

/// Aggregate records already known to qualify; `None` when there are none.
pub(crate) fn aggregate_qualifying(
    qualifying: &[&StatRecord],
    rules: &SportRules,
) -> Option<SeasonAggregate> {
    let first = qualifying.first()?;
    let games = qualifying.len() as u32;

    let mut totals = BTreeMap::new();
    for record in qualifying {
        for (stat, value) in &record.stats {
            *totals.entry(stat.clone()).or_insert(0.0) += value;
        }
    }
    let averages = totals
        .iter()
        .map(|(stat, total)| (stat.clone(), total / f64::from(games)))
        .collect();
    let ratios = rules
        .ratios()
        .iter()
        .filter_map(|ratio| {
            ratio
                .compute(qualifying.iter().copied())
                .map(|value| (ratio.name.clone(), value))
        })
        .collect();

    let role = rules.role_rule().classify(qualifying);
    debug!(player = %first.player.name, games, %role, "Aggregated season");

    Some(SeasonAggregate {
        player: first.player.clone(),
        role,
        games,
        totals,
        averages,
        ratios,
    })
}

/// Average of `stat` over the player's `games` most recent qualifying records.
///
/// Ratio stats are summed then divided over the window and read zero when
/// the denominator is zero. Composite names such as `pts+reb+ast` are
/// accepted when the league offers them.
///
/// # Errors
///
/// [`StatsErrorKind::UnknownStat`] when the league does not offer `stat`,
/// [`StatsErrorKind::Unavailable`] when no record qualifies.
#[instrument(skip(records, rules), fields(league = %rules.league(), records = records.len()))]
pub fn recent_form(
    records: &[StatRecord],
    stat: &str,
    games: usize,
    rules: &SportRules,
) -> Result<RecentForm, StatsError> {
    if !rules.offers(stat) {
        return Err(StatsError::new(StatsErrorKind::UnknownStat(stat.to_string())));
    }

    let qualifying = latest_games(records, games, rules);
    let Some(first) = qualifying.first() else {
        return Err(StatsError::unavailable(scope(records)));
    };

    let value = match rules.ratio(stat) {
        Some(ratio) => ratio.compute(qualifying.iter().copied()).unwrap_or(0.0),
        None => qualifying.iter().map(|r| r.stat(stat)).sum::<f64>() / qualifying.len() as f64,
    };

    Ok(RecentForm {
        player: first.player.clone(),
        stat: stat.to_string(),
        games: qualifying.len() as u32,
        value,
    })
}

/// The `games` most recent qualifying records, newest first.
pub fn latest_games<'a>(
    records: &'a [StatRecord],
    games: usize,
    rules: &SportRules,
) -> Vec<&'a StatRecord> {
    let mut qualifying: Vec<&StatRecord> = records
        .iter()
        .filter(|r| rules.qualifier().admits(r))
        .collect();
    qualifying.sort_by_key(|r| std::cmp::Reverse(r.chronological_key()));
    qualifying.truncate(games);
    qualifying
}

/// One labelled figure of a season summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    /// Display label
    pub label: String,
    /// Figure; `None` when a ratio had no denominator
    pub value: Option<f64>,
}

/// Lay out an aggregate the way the league presents the player's role.
pub fn summarize(aggregate: &SeasonAggregate, rules: &SportRules) -> Vec<StatLine> {
    rules
        .layout(aggregate.role)
        .iter()
        .map(|LayoutField { label, source }| StatLine {
            label: label.clone(),
            value: aggregate.value(source),
        })
        .collect()
}

fn scope(records: &[StatRecord]) -> String {
    records
        .first()
        .map(|r| r.player.name.clone())
        .unwrap_or_else(|| "the requested player".to_string())
}
