//! Remote data source error types.

/// Specific failure conditions when talking to a remote data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ApiErrorKind {
    /// Network or connection failure before a response arrived
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Non-success HTTP status other than 404 and 429
    #[display("HTTP {} error: {}", status, body)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// Response body could not be decoded as JSON
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// Still rate limited after the configured number of retries
    #[display("Rate limited after {} attempts", attempts)]
    RateLimitExhausted {
        /// Total attempts made, including the first
        attempts: u32,
    },
    /// The request did not finish within the configured timeout
    #[display("Request timed out after {} seconds", seconds)]
    Timeout {
        /// Timeout that elapsed
        seconds: u64,
    },
}

/// API error carrying the failing URL and source location.
///
/// # Examples
///
/// ```
/// use statline_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(
///     "https://api.example.com/v1/players",
///     ApiErrorKind::Transport("connection refused".into()),
/// );
/// assert!(format!("{}", err).contains("/v1/players"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} for {} at line {} in {}", kind, url, line, file)]
pub struct ApiError {
    /// The specific failure
    pub kind: ApiErrorKind,
    /// URL of the request that failed
    pub url: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ApiError {
    /// Create a new ApiError for `url` at the current location.
    #[track_caller]
    pub fn new(url: impl Into<String>, kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            url: url.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
