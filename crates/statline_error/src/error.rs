//! Top-level error wrapper types.

use crate::{ApiError, ConfigError, StatsError};

/// Every condition that may cross the engine boundary.
///
/// # Examples
///
/// ```
/// use statline_error::{StatlineError, StatsError};
///
/// let err: StatlineError = StatsError::unavailable("player 3").into();
/// assert!(format!("{}", err).contains("Stats Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StatlineErrorKind {
    /// Transport or HTTP failure from a remote data source
    #[from(ApiError)]
    Api(ApiError),
    /// Fetch succeeded but no qualifying statistics exist
    #[from(StatsError)]
    Stats(StatsError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Statline error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Statline Error: {}", _0)]
pub struct StatlineError(Box<StatlineErrorKind>);

impl StatlineError {
    /// Create a new error from a kind.
    pub fn new(kind: StatlineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StatlineErrorKind {
        &self.0
    }

    /// True when the error came from the remote data source.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), StatlineErrorKind::Api(_))
    }

    /// True when the data was fetched but nothing qualified.
    pub fn is_stats_unavailable(&self) -> bool {
        matches!(
            self.kind(),
            StatlineErrorKind::Stats(StatsError {
                kind: crate::StatsErrorKind::Unavailable { .. },
                ..
            })
        )
    }
}

// Generic From implementation for any type that converts to StatlineErrorKind
impl<T> From<T> for StatlineError
where
    T: Into<StatlineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Statline operations.
pub type StatlineResult<T> = std::result::Result<T, StatlineError>;
