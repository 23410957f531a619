//! Domain-level statistics error types.

/// Conditions where a fetch succeeded but no usable statistics exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StatsErrorKind {
    /// No qualifying records for the requested scope
    #[display("No stats found for {}", scope)]
    Unavailable {
        /// Human readable scope, e.g. "player 237 in the 2024 season"
        scope: String,
    },
    /// Player search returned nothing
    #[display("No player found matching '{}'", _0)]
    PlayerNotFound(String),
    /// Statistic name is not known to the league rules
    #[display("Unknown statistic '{}'", _0)]
    UnknownStat(String),
}

/// Statistics error with source location.
///
/// # Examples
///
/// ```
/// use statline_error::{StatsError, StatsErrorKind};
///
/// let err = StatsError::unavailable("player 115 in the 2024 season");
/// assert!(matches!(err.kind, StatsErrorKind::Unavailable { .. }));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stats Error: {} at line {} in {}", kind, line, file)]
pub struct StatsError {
    /// The specific condition
    pub kind: StatsErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl StatsError {
    /// Create a new StatsError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StatsErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`StatsErrorKind::Unavailable`].
    #[track_caller]
    pub fn unavailable(scope: impl Into<String>) -> Self {
        Self::new(StatsErrorKind::Unavailable {
            scope: scope.into(),
        })
    }
}
