//! Per-league aggregation rules.
//!
//! Every sport difference the aggregator knows about lives in these tables:
//! which records count, how a role is assigned, which stats are ratios,
//! what a season summary shows and how leaderboards are ranked.

use derive_getters::Getters;
use statline_core::{League, Role, SortOrder, StatRecord, StatSource};

/// Decides whether a record counts towards an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// Any non-zero statistic
    AnyStat,
    /// The named statistic is positive (minutes played)
    StatPositive(String),
}

impl Qualifier {
    /// True when the record qualifies.
    pub fn admits(&self, record: &StatRecord) -> bool {
        match self {
            Qualifier::AnyStat => record.has_any_stat(),
            Qualifier::StatPositive(stat) => record.has_positive(stat),
        }
    }
}

/// Two roles competing on an indicator stat; ties go to the incumbent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleContest {
    /// Role that must strictly win
    pub challenger: Role,
    /// Indicator stat of the challenger
    pub challenger_stat: String,
    /// Role kept on a tie
    pub incumbent: Role,
    /// Indicator stat of the incumbent
    pub incumbent_stat: String,
}

impl RoleContest {
    fn new(challenger: Role, challenger_stat: &str, incumbent: Role, incumbent_stat: &str) -> Self {
        Self {
            challenger,
            challenger_stat: challenger_stat.to_string(),
            incumbent,
            incumbent_stat: incumbent_stat.to_string(),
        }
    }

    fn decide(&self, challenger: f64, incumbent: f64) -> Role {
        if challenger > incumbent {
            self.challenger
        } else {
            self.incumbent
        }
    }
}

/// How a player's role is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRule {
    /// Every player gets the same role
    Fixed(Role),
    /// Map the reported position; unmatched positions get `fallback`
    ByPosition {
        /// Position names (full or abbreviated) per role
        positions: Vec<(Vec<String>, Role)>,
        /// Role for unknown or missing positions
        fallback: Role,
    },
    /// Count qualifying records where each indicator stat is positive
    ByRecordCounts(RoleContest),
    /// Compare the summed indicator stats
    ByTotals(RoleContest),
}

impl RoleRule {
    /// Role for a player's qualifying records.
    pub fn classify(&self, records: &[&StatRecord]) -> Role {
        match self {
            RoleRule::Fixed(role) => *role,
            RoleRule::ByPosition {
                positions,
                fallback,
            } => {
                let position = records.iter().find_map(|r| r.player.position.as_deref());
                position
                    .and_then(|p| {
                        positions
                            .iter()
                            .find(|(names, _)| names.iter().any(|n| n.eq_ignore_ascii_case(p)))
                            .map(|(_, role)| *role)
                    })
                    .unwrap_or(*fallback)
            }
            RoleRule::ByRecordCounts(contest) => {
                let count = |stat: &str| records.iter().filter(|r| r.has_positive(stat)).count();
                contest.decide(
                    count(&contest.challenger_stat) as f64,
                    count(&contest.incumbent_stat) as f64,
                )
            }
            RoleRule::ByTotals(contest) => {
                let total = |stat: &str| records.iter().map(|r| r.stat(stat)).sum::<f64>();
                contest.decide(
                    total(&contest.challenger_stat),
                    total(&contest.incumbent_stat),
                )
            }
        }
    }
}

/// A stat computed as `sum(numerator) / sum(denominator) * scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioStat {
    /// Ratio name, e.g. `fg_pct`
    pub name: String,
    /// Numerator stat (composites allowed)
    pub numerator: String,
    /// Denominator stat (composites allowed)
    pub denominator: String,
    /// Multiplier applied after dividing (9 for ERA)
    pub scale: f64,
}

impl RatioStat {
    fn new(name: &str, numerator: &str, denominator: &str) -> Self {
        Self::scaled(name, numerator, denominator, 1.0)
    }

    fn scaled(name: &str, numerator: &str, denominator: &str, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
            scale,
        }
    }

    /// Sum-then-divide over records; `None` when the denominator sums to zero.
    pub fn compute<'a>(&self, records: impl IntoIterator<Item = &'a StatRecord>) -> Option<f64> {
        let (made, attempted) = records.into_iter().fold((0.0, 0.0), |(m, a), r| {
            (m + r.stat(&self.numerator), a + r.stat(&self.denominator))
        });
        (attempted > 0.0).then(|| made / attempted * self.scale)
    }
}

/// One labelled figure of a season summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    /// Display label ("PPG")
    pub label: String,
    /// Where the figure comes from
    pub source: StatSource,
}

fn field(label: &str, source: StatSource) -> LayoutField {
    LayoutField {
        label: label.to_string(),
        source,
    }
}

/// Minimum sample a player needs to appear in a leaderboard category.
#[derive(Debug, Clone, PartialEq)]
pub enum MinSample {
    /// No minimum
    None,
    /// At least this many qualifying games
    Games(u32),
    /// Season total of a stat at least `min` (at-bats, innings)
    StatTotal {
        /// Stat summed over the season
        stat: String,
        /// Inclusive minimum
        min: f64,
    },
}

/// A leaderboard category.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct LeaderCategory {
    /// Display label
    label: String,
    /// Figure ranked by
    source: StatSource,
    /// Eligibility threshold
    min_sample: MinSample,
    /// Ranking direction
    order: SortOrder,
    /// Provider field to request sorted rows by
    sort_key: String,
    /// Only players of this role are ranked
    role: Option<Role>,
    /// Provider pages to read for this category
    pages: usize,
}

impl LeaderCategory {
    /// Descending category over one page with no minimum sample.
    pub fn new(label: &str, source: StatSource, sort_key: &str) -> Self {
        Self {
            label: label.to_string(),
            source,
            min_sample: MinSample::None,
            order: SortOrder::Descending,
            sort_key: sort_key.to_string(),
            role: None,
            pages: 1,
        }
    }

    /// Rank lower values first.
    pub fn ascending(mut self) -> Self {
        self.order = SortOrder::Ascending;
        self
    }

    /// Require a minimum sample.
    pub fn with_min_sample(mut self, min_sample: MinSample) -> Self {
        self.min_sample = min_sample;
        self
    }

    /// Restrict to one role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Read this many provider pages.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }
}

/// A statistic offered for recent-form queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChoice {
    /// Display label ("Points + Rebounds + Assists")
    pub label: String,
    /// Stat or ratio key ("pts+reb+ast")
    pub key: String,
}

/// Complete aggregation rules for one league and one record shape.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct SportRules {
    league: League,
    qualifier: Qualifier,
    role_rule: RoleRule,
    ratios: Vec<RatioStat>,
    layouts: Vec<(Role, Vec<LayoutField>)>,
    categories: Vec<LeaderCategory>,
    choices: Vec<StatChoice>,
}

impl SportRules {
    /// Rules for per-game (football: per-week) logs.
    pub fn for_league(league: League) -> Self {
        match league {
            League::Nba => nba_game_logs(),
            League::Nfl => nfl_game_logs(),
            League::Mlb => mlb_game_logs(),
        }
    }

    /// Rules for provider season rows, one row per player.
    pub fn season_rows(league: League) -> Self {
        match league {
            League::Nba => nba_season_rows(),
            League::Nfl => nfl_season_rows(),
            League::Mlb => mlb_season_rows(),
        }
    }

    /// Ratio definition by name.
    pub fn ratio(&self, name: &str) -> Option<&RatioStat> {
        self.ratios.iter().find(|r| r.name == name)
    }

    /// Summary layout for a role; empty when the role has none.
    pub fn layout(&self, role: Role) -> &[LayoutField] {
        self.layouts
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or(&[])
    }

    /// Offered stat by key.
    pub fn choice(&self, key: &str) -> Option<&StatChoice> {
        self.choices.iter().find(|c| c.key == key)
    }

    /// True when `stat` may be asked for in a recent-form query.
    pub fn offers(&self, stat: &str) -> bool {
        self.choice(stat).is_some() || self.ratio(stat).is_some()
    }
}

fn choices(pairs: &[(&str, &str)]) -> Vec<StatChoice> {
    pairs
        .iter()
        .map(|(label, key)| StatChoice {
            label: label.to_string(),
            key: key.to_string(),
        })
        .collect()
}

fn nfl_positions() -> RoleRule {
    let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    RoleRule::ByPosition {
        positions: vec![
            (names(&["Quarterback", "QB"]), Role::Quarterback),
            (
                names(&["Running Back", "Fullback", "RB", "FB"]),
                Role::RunningBack,
            ),
            (
                names(&["Wide Receiver", "Tight End", "WR", "TE"]),
                Role::Receiver,
            ),
        ],
        fallback: Role::General,
    }
}

fn nba_game_logs() -> SportRules {
    use StatSource as S;
    SportRules {
        league: League::Nba,
        qualifier: Qualifier::StatPositive("min".to_string()),
        role_rule: RoleRule::Fixed(Role::General),
        ratios: vec![
            RatioStat::new("fg_pct", "fgm", "fga"),
            RatioStat::new("fg3_pct", "fg3m", "fg3a"),
            RatioStat::new("ft_pct", "ftm", "fta"),
        ],
        layouts: vec![(
            Role::General,
            vec![
                field("PPG", S::average("pts")),
                field("RPG", S::average("reb")),
                field("APG", S::average("ast")),
                field("SPG", S::average("stl")),
                field("BPG", S::average("blk")),
                field("FG%", S::ratio("fg_pct")),
                field("3P%", S::ratio("fg3_pct")),
                field("FT%", S::ratio("ft_pct")),
                field("GP", S::Games),
            ],
        )],
        categories: vec![
            LeaderCategory::new("Points", S::average("pts"), "pts").with_min_sample(MinSample::Games(5)),
            LeaderCategory::new("Rebounds", S::average("reb"), "reb")
                .with_min_sample(MinSample::Games(5)),
            LeaderCategory::new("Assists", S::average("ast"), "ast")
                .with_min_sample(MinSample::Games(5)),
            LeaderCategory::new("FG%", S::ratio("fg_pct"), "fg_pct").with_min_sample(
                MinSample::StatTotal {
                    stat: "fga".to_string(),
                    min: 50.0,
                },
            ),
        ],
        choices: choices(&[
            ("Points", "pts"),
            ("Rebounds", "reb"),
            ("Assists", "ast"),
            ("Blocks", "blk"),
            ("Steals", "stl"),
            ("Turnovers", "turnover"),
            ("3-Pointers Made", "fg3m"),
            ("Points + Rebounds + Assists", "pts+reb+ast"),
            ("FG%", "fg_pct"),
            ("3P%", "fg3_pct"),
            ("FT%", "ft_pct"),
        ]),
    }
}

/// Season rows report games played as a stat.
fn played_at_least(games: f64) -> MinSample {
    MinSample::StatTotal {
        stat: "games_played".to_string(),
        min: games,
    }
}

fn nba_season_rows() -> SportRules {
    use StatSource as S;
    SportRules {
        league: League::Nba,
        qualifier: Qualifier::AnyStat,
        role_rule: RoleRule::Fixed(Role::General),
        ratios: Vec::new(),
        layouts: Vec::new(),
        // Leader values are per-game averages.
        categories: [
            ("Points", "pts"),
            ("Rebounds", "reb"),
            ("Assists", "ast"),
            ("Steals", "stl"),
            ("Blocks", "blk"),
        ]
        .into_iter()
        .map(|(label, key)| {
            LeaderCategory::new(label, S::total(key), key).with_min_sample(played_at_least(10.0))
        })
        .collect(),
        choices: Vec::new(),
    }
}

fn nfl_ratios() -> Vec<RatioStat> {
    vec![
        RatioStat::new("completion_pct", "passing_completions", "passing_attempts"),
        RatioStat::new("yards_per_carry", "rushing_yards", "rushing_attempts"),
        RatioStat::new("yards_per_reception", "receiving_yards", "receptions"),
    ]
}

fn nfl_game_logs() -> SportRules {
    use StatSource as S;
    SportRules {
        league: League::Nfl,
        qualifier: Qualifier::AnyStat,
        role_rule: nfl_positions(),
        ratios: nfl_ratios(),
        layouts: vec![
            (
                Role::Quarterback,
                vec![
                    field("Pass Yds", S::total("passing_yards")),
                    field("Pass TDs", S::total("passing_touchdowns")),
                    field("INTs", S::total("passing_interceptions")),
                    field("Comp %", S::ratio("completion_pct")),
                    field("Rush Yds", S::total("rushing_yards")),
                    field("Rush TDs", S::total("rushing_touchdowns")),
                ],
            ),
            (
                Role::RunningBack,
                vec![
                    field("Rush Yds", S::total("rushing_yards")),
                    field("Rush Att", S::total("rushing_attempts")),
                    field("Rush TDs", S::total("rushing_touchdowns")),
                    field("YPC", S::ratio("yards_per_carry")),
                    field("Rec Yds", S::total("receiving_yards")),
                    field("Receptions", S::total("receptions")),
                    field("Rec TDs", S::total("receiving_touchdowns")),
                ],
            ),
            (
                Role::Receiver,
                vec![
                    field("Rec Yds", S::total("receiving_yards")),
                    field("Receptions", S::total("receptions")),
                    field("Targets", S::total("receiving_targets")),
                    field("Rec TDs", S::total("receiving_touchdowns")),
                    field("Rush Yds", S::total("rushing_yards")),
                    field("Rush TDs", S::total("rushing_touchdowns")),
                ],
            ),
            (Role::General, vec![field("Weeks", S::Games)]),
        ],
        categories: vec![
            LeaderCategory::new("Passing Yards", S::total("passing_yards"), "passing_yards"),
            LeaderCategory::new("Rushing Yards", S::total("rushing_yards"), "rushing_yards"),
            LeaderCategory::new(
                "Receiving Yards",
                S::total("receiving_yards"),
                "receiving_yards",
            ),
            LeaderCategory::new("Yards per Carry", S::ratio("yards_per_carry"), "rushing_yards")
                .with_min_sample(MinSample::StatTotal {
                    stat: "rushing_attempts".to_string(),
                    min: 50.0,
                })
                .with_role(Role::RunningBack),
        ],
        choices: choices(&[
            ("Passing Yards", "passing_yards"),
            ("Passing TDs", "passing_touchdowns"),
            ("Rushing Yards", "rushing_yards"),
            ("Rushing TDs", "rushing_touchdowns"),
            ("Receptions", "receptions"),
            ("Receiving Yards", "receiving_yards"),
            ("Receiving TDs", "receiving_touchdowns"),
        ]),
    }
}

fn nfl_season_rows() -> SportRules {
    use StatSource as S;
    let total = |label: &str, key: &str| {
        LeaderCategory::new(label, S::total(key), key).with_min_sample(played_at_least(4.0))
    };
    let passing = |label: &str, key: &str| {
        LeaderCategory::new(label, S::total(key), key).with_min_sample(MinSample::StatTotal {
            stat: "passing_attempts".to_string(),
            min: 100.0,
        })
    };
    SportRules {
        league: League::Nfl,
        qualifier: Qualifier::AnyStat,
        role_rule: nfl_positions(),
        ratios: nfl_ratios(),
        layouts: Vec::new(),
        categories: vec![
            passing("Passing Yards", "passing_yards"),
            passing("Passing TDs", "passing_touchdowns"),
            total("Rushing Yards", "rushing_yards"),
            total("Rushing TDs", "rushing_touchdowns"),
            total("Receptions", "receptions"),
            total("Receiving Yards", "receiving_yards"),
            total("Receiving TDs", "receiving_touchdowns"),
            passing("Interceptions", "passing_interceptions"),
        ],
        choices: Vec::new(),
    }
}

fn mlb_game_logs() -> SportRules {
    use StatSource as S;
    SportRules {
        league: League::Mlb,
        qualifier: Qualifier::AnyStat,
        role_rule: RoleRule::ByRecordCounts(RoleContest::new(
            Role::Pitcher,
            "ip",
            Role::Hitter,
            "at_bats",
        )),
        ratios: vec![
            RatioStat::new("avg", "hits", "at_bats"),
            RatioStat::scaled("era", "er", "ip", 9.0),
            RatioStat::new("whip", "p_bb+h_allowed", "ip"),
        ],
        layouts: vec![
            (
                Role::Hitter,
                vec![
                    field("AVG", S::ratio("avg")),
                    field("HR", S::total("hr")),
                    field("RBI", S::total("rbi")),
                    field("Runs", S::total("runs")),
                    field("Hits", S::total("hits")),
                    field("SB", S::total("sb")),
                ],
            ),
            (
                Role::Pitcher,
                vec![
                    field("ERA", S::ratio("era")),
                    field("WHIP", S::ratio("whip")),
                    field("SO", S::total("p_k")),
                    field("IP", S::total("ip")),
                    field("GP", S::Games),
                ],
            ),
        ],
        categories: vec![
            LeaderCategory::new("Home Runs", S::total("hr"), "batting_hr"),
            LeaderCategory::new("Batting Average", S::ratio("avg"), "batting_avg")
                .with_min_sample(MinSample::StatTotal {
                    stat: "at_bats".to_string(),
                    min: 50.0,
                })
                .with_role(Role::Hitter),
            LeaderCategory::new("ERA", S::ratio("era"), "pitching_era")
                .ascending()
                .with_min_sample(MinSample::StatTotal {
                    stat: "ip".to_string(),
                    min: 20.0,
                })
                .with_role(Role::Pitcher),
            LeaderCategory::new("Strikeouts", S::total("p_k"), "pitching_k")
                .with_role(Role::Pitcher),
        ],
        choices: choices(&[
            ("Hits", "hits"),
            ("Home Runs", "hr"),
            ("RBIs", "rbi"),
            ("Runs", "runs"),
            ("Stolen Bases", "sb"),
            ("Strikeouts (Pitching)", "p_k"),
            ("Wins", "wins"),
            ("Saves", "sv"),
            ("ERA", "era"),
        ]),
    }
}

fn mlb_season_rows() -> SportRules {
    use StatSource as S;
    let total = |label: &str, key: &str| LeaderCategory::new(label, S::total(key), key);
    SportRules {
        league: League::Mlb,
        qualifier: Qualifier::AnyStat,
        role_rule: RoleRule::ByTotals(RoleContest::new(
            Role::Pitcher,
            "pitching_gp",
            Role::Hitter,
            "batting_gp",
        )),
        ratios: Vec::new(),
        layouts: Vec::new(),
        categories: vec![
            total("Home Runs", "batting_hr"),
            total("RBIs", "batting_rbi"),
            total("Batting Average", "batting_avg")
                .with_min_sample(MinSample::StatTotal {
                    stat: "batting_ab".to_string(),
                    min: 100.0,
                })
                .with_pages(3),
            total("Hits", "batting_h"),
            total("Stolen Bases", "batting_sb"),
            total("Wins", "pitching_w"),
            total("ERA", "pitching_era")
                .ascending()
                .with_min_sample(MinSample::StatTotal {
                    stat: "pitching_ip".to_string(),
                    min: 50.0,
                })
                .with_pages(3),
            total("Saves", "pitching_sv"),
            total("Strikeouts", "pitching_k"),
        ],
        choices: Vec::new(),
    }
}
