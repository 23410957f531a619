//! Single fetches with bounded rate-limit retry, and cursor pagination.

use crate::{FetchConfig, Transport};
use serde_json::Value as JsonValue;
use statline_error::{ApiError, ApiErrorKind};
use std::sync::Arc;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Query pairs in send order. Keys may repeat.
pub type Query = Vec<(String, String)>;

/// Build one query pair.
pub fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

const FIRST_CURSOR: &str = "0";

/// Issues logical queries against a remote data source.
///
/// One attempt is one network call. A 404 is an absent result, a 429 waits
/// the configured cooldown and tries again up to the configured number of
/// times, and the whole call is bounded by the request timeout.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    config: FetchConfig,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Fetcher over a transport.
    pub fn new(transport: Arc<dyn Transport>, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    /// Limits in effect.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch one JSON document.
    ///
    /// Returns `Ok(None)` on 404.
    ///
    /// # Errors
    ///
    /// [`ApiErrorKind::RateLimitExhausted`] when every attempt was rate
    /// limited, [`ApiErrorKind::Timeout`] when the request timeout elapsed,
    /// [`ApiErrorKind::Status`] for other non-success statuses,
    /// [`ApiErrorKind::Decode`] when the body is not JSON and
    /// [`ApiErrorKind::Transport`] when no response arrived.
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub async fn fetch(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Option<JsonValue>, ApiError> {
        let url = join_url(base, endpoint);
        let timeout = self.config.request_timeout();

        match tokio::time::timeout(timeout, self.fetch_with_retry(&url, params)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = %url, seconds = timeout.as_secs(), "Request timed out");
                Err(ApiError::new(
                    url,
                    ApiErrorKind::Timeout {
                        seconds: timeout.as_secs(),
                    },
                ))
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Option<JsonValue>, ApiError> {
        let retries = *self.config.max_rate_limit_retries();
        let strategy = FixedInterval::from_millis(self.config.cooldown().as_millis() as u64)
            .take(retries as usize);

        Retry::spawn(strategy, || async {
            let response = self
                .transport
                .get(url, params)
                .await
                .map_err(RetryError::Permanent)?;

            match response.status {
                404 => {
                    debug!(url = %url, "Resource not found");
                    Ok(None)
                }
                429 => {
                    warn!(
                        url = %url,
                        cooldown_secs = self.config.cooldown_secs(),
                        "Rate limited, waiting before retry"
                    );
                    Err(RetryError::Transient {
                        err: ApiError::new(
                            url,
                            ApiErrorKind::RateLimitExhausted {
                                attempts: retries + 1,
                            },
                        ),
                        retry_after: None,
                    })
                }
                status if (200..300).contains(&status) => serde_json::from_str(&response.body)
                    .map(Some)
                    .map_err(|e| {
                        RetryError::Permanent(ApiError::new(
                            url,
                            ApiErrorKind::Decode(e.to_string()),
                        ))
                    }),
                status => Err(RetryError::Permanent(ApiError::new(
                    url,
                    ApiErrorKind::Status {
                        status,
                        body: response.body,
                    },
                ))),
            }
        })
        .await
    }

    /// Fetch every page of a list endpoint, up to the configured page guard.
    pub async fn fetch_all_pages(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Vec<JsonValue>, ApiError> {
        self.fetch_pages(base, endpoint, params, *self.config.max_pages())
            .await
    }

    /// Fetch at most `max_pages` pages of a list endpoint and concatenate
    /// their `data` arrays in cursor order.
    ///
    /// The loop starts at cursor `"0"` and stops when a page is absent, its
    /// `data` is missing or empty, `meta.next_cursor` is missing or null, or
    /// the next cursor repeats one already requested.
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub async fn fetch_pages(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(String, String)],
        max_pages: usize,
    ) -> Result<Vec<JsonValue>, ApiError> {
        let mut records = Vec::new();
        let mut seen = Vec::new();
        let mut cursor = FIRST_CURSOR.to_string();

        for page in 0..max_pages {
            let mut query: Query = params.to_vec();
            query.push(param("per_page", self.config.per_page()));
            query.push(param("cursor", &cursor));
            seen.push(cursor.clone());

            let Some(document) = self.fetch(base, endpoint, &query).await? else {
                debug!(page, "Page absent, stopping");
                break;
            };

            let data = match document.get("data").and_then(JsonValue::as_array) {
                Some(data) if !data.is_empty() => data,
                _ => {
                    debug!(page, "Page has no data, stopping");
                    break;
                }
            };
            records.extend(data.iter().cloned());
            debug!(page, rows = data.len(), total = records.len(), "Fetched page");

            match next_cursor(&document) {
                Some(next) if seen.contains(&next) => {
                    warn!(cursor = %next, "Cursor repeated, stopping");
                    break;
                }
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(records)
    }
}

fn next_cursor(document: &JsonValue) -> Option<String> {
    match document.get("meta")?.get("next_cursor")? {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
