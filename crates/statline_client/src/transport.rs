//! Network boundary of the fetcher.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use statline_error::{ApiError, ApiErrorKind};
use tracing::{debug, error, instrument};

/// Raw HTTP response: status and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Body text, possibly empty
    pub body: String,
}

impl TransportResponse {
    /// Response with a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs one GET request.
///
/// Implementations report only failures that happen before a status arrives
/// (connection refused, TLS, DNS). Every status, error statuses included, is
/// returned as a [`TransportResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with the given query pairs. Keys may repeat (`seasons[]`).
    async fn get(&self, url: &str, query: &[(String, String)])
    -> Result<TransportResponse, ApiError>;
}

/// How a request is authenticated.
#[derive(Clone)]
pub enum AuthScheme {
    /// No authorization header
    None,
    /// `Authorization: <key>`
    Raw(String),
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic base64(user:password)`
    Basic {
        /// User part
        user: String,
        /// Password part
        password: String,
    },
}

impl std::fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuthScheme::None => "None",
            AuthScheme::Raw(_) => "Raw",
            AuthScheme::Bearer(_) => "Bearer",
            AuthScheme::Basic { .. } => "Basic",
        };
        write!(f, "AuthScheme::{}(..)", name)
    }
}

impl AuthScheme {
    /// Stats provider scheme: the key is the header value.
    pub fn api_key(key: impl Into<String>) -> Self {
        AuthScheme::Raw(key.into())
    }

    /// Live feed scheme: `key:MYSPORTSFEEDS` as basic credentials.
    pub fn feed_key(key: impl Into<String>) -> Self {
        AuthScheme::Basic {
            user: key.into(),
            password: "MYSPORTSFEEDS".to_string(),
        }
    }

    /// Value of the `Authorization` header, if any.
    ///
    /// ```
    /// use statline_client::AuthScheme;
    ///
    /// let auth = AuthScheme::Basic { user: "key".into(), password: "pw".into() };
    /// assert_eq!(auth.header_value().as_deref(), Some("Basic a2V5OnB3"));
    /// ```
    pub fn header_value(&self) -> Option<String> {
        match self {
            AuthScheme::None => None,
            AuthScheme::Raw(key) => Some(key.clone()),
            AuthScheme::Bearer(token) => Some(format!("Bearer {}", token)),
            AuthScheme::Basic { user, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", user, password))
            )),
        }
    }
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    auth: AuthScheme,
}

impl HttpTransport {
    /// Transport with a fresh client.
    pub fn new(auth: AuthScheme) -> Self {
        Self::with_client(Client::new(), auth)
    }

    /// Transport reusing an existing client (connection pool).
    pub fn with_client(client: Client, auth: AuthScheme) -> Self {
        debug!(auth = ?auth, "Creating HttpTransport");
        Self { client, auth }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, query), fields(params = query.len()))]
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, ApiError> {
        let mut request = self.client.get(url).query(query);
        if let Some(value) = self.auth.header_value() {
            request = request.header(reqwest::header::AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "Request failed before a response arrived");
            ApiError::new(url, ApiErrorKind::Transport(e.to_string()))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, status, "Failed to read response body");
            ApiError::new(url, ApiErrorKind::Transport(e.to_string()))
        })?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(TransportResponse { status, body })
    }
}
