//! League-wide leaderboards.

use crate::season::aggregate_qualifying;
use crate::{LeaderCategory, MinSample, SportRules};
use statline_core::{
    CategoryLeaders, Leaderboard, LeaderboardEntry, SeasonAggregate, SortOrder, StatRecord,
};
use statline_error::StatsError;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Entries kept per category.
pub const LEADERS_PER_CATEGORY: usize = 5;

/// Rank every player in `records` for each category of the league.
///
/// Players are grouped in first-seen order and aggregated with the same
/// rules as a single season. Each category keeps players that meet its
/// role filter and minimum sample and have a value, sorts them stably
/// (so ties keep first-seen order) and keeps the top five.
///
/// # Errors
///
/// [`statline_error::StatsErrorKind::Unavailable`] when no player has a
/// qualifying record.
#[instrument(skip_all, fields(league = %rules.league(), records = records.len()))]
pub fn aggregate_league(
    records: &[StatRecord],
    rules: &SportRules,
) -> Result<Leaderboard, StatsError> {
    let aggregates = group_players(records, rules);
    if aggregates.is_empty() {
        return Err(StatsError::unavailable(format!(
            "{} league leaders",
            rules.league().abbreviation()
        )));
    }
    debug!(players = aggregates.len(), "Ranking players");

    let categories = rules
        .categories()
        .iter()
        .map(|category| CategoryLeaders {
            category: category.label().clone(),
            entries: rank(&aggregates, category),
        })
        .collect();

    Ok(Leaderboard { categories })
}

fn group_players(records: &[StatRecord], rules: &SportRules) -> Vec<SeasonAggregate> {
    let mut order: Vec<u64> = Vec::new();
    let mut groups: HashMap<u64, Vec<&StatRecord>> = HashMap::new();

    for record in records.iter().filter(|r| rules.qualifier().admits(r)) {
        groups
            .entry(record.player.id)
            .or_insert_with(|| {
                order.push(record.player.id);
                Vec::new()
            })
            .push(record);
    }

    order
        .iter()
        .filter_map(|id| groups.get(id))
        .filter_map(|group| aggregate_qualifying(group, rules))
        .collect()
}

fn rank(aggregates: &[SeasonAggregate], category: &LeaderCategory) -> Vec<LeaderboardEntry> {
    let mut eligible: Vec<(&SeasonAggregate, f64)> = aggregates
        .iter()
        .filter(|a| category.role().is_none_or(|role| a.role == role))
        .filter(|a| meets_sample(a, category.min_sample()))
        .filter_map(|a| a.value(category.source()).map(|value| (a, value)))
        .collect();

    match category.order() {
        SortOrder::Descending => eligible.sort_by(|a, b| b.1.total_cmp(&a.1)),
        SortOrder::Ascending => eligible.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }

    eligible
        .into_iter()
        .take(LEADERS_PER_CATEGORY)
        .zip(1..)
        .map(|((aggregate, value), rank)| LeaderboardEntry {
            rank,
            player: aggregate.player.clone(),
            value,
        })
        .collect()
}

fn meets_sample(aggregate: &SeasonAggregate, min_sample: &MinSample) -> bool {
    match min_sample {
        MinSample::None => true,
        MinSample::Games(min) => aggregate.games >= *min,
        MinSample::StatTotal { stat, min } => {
            aggregate.value(&statline_core::StatSource::total(stat.as_str())) >= Some(*min)
        }
    }
}
