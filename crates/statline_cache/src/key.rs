//! Cache keys.

use std::fmt;

/// Operation name plus its ordered arguments.
///
/// # Examples
///
/// ```
/// use statline_cache::CacheKey;
///
/// let key = CacheKey::new("nba.game_logs", [237.to_string(), 2024.to_string()]);
/// assert_eq!(key.to_string(), "nba.game_logs(237, 2024)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    operation: String,
    args: Vec<String>,
}

impl CacheKey {
    /// Key for an operation and its arguments.
    pub fn new<I, S>(operation: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation: operation.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Ordered arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.args.join(", "))
    }
}
