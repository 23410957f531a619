//! Scripted transport for testing, shared by the client and bot tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use statline_client::{Transport, TransportResponse};
use statline_error::{ApiError, ApiErrorKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with a status and body
    Respond(TransportResponse),
    /// Fail before a response arrives
    Fail(String),
}

struct Route {
    suffix: String,
    replies: VecDeque<MockReply>,
}

/// Transport that replies from per-URL queues.
///
/// Replies for a URL suffix are consumed in order; the last one repeats.
/// Unrouted URLs answer 404.
#[derive(Clone)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, suffix: &str, reply: MockReply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|r| r.suffix == suffix) {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(Route {
                    suffix: suffix.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    /// Queue a JSON reply for URLs ending in `suffix`.
    pub fn json(self, suffix: &str, status: u16, body: JsonValue) -> Self {
        self.push(
            suffix,
            MockReply::Respond(TransportResponse::new(status, body.to_string())),
        )
    }

    /// Queue a raw text reply.
    pub fn text(self, suffix: &str, status: u16, body: &str) -> Self {
        self.push(suffix, MockReply::Respond(TransportResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn fail(self, suffix: &str, message: &str) -> Self {
        self.push(suffix, MockReply::Fail(message.to_string()))
    }

    /// Number of requests made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Requests made, in order.
    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Value of a query parameter in the `n`th request.
    pub fn param(&self, n: usize, key: &str) -> Option<String> {
        self.calls.lock().unwrap()[n]
            .1
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), query.to_vec()));

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            let route = routes
                .iter_mut()
                .filter(|r| url.ends_with(&r.suffix))
                .max_by_key(|r| r.suffix.len());
            match route {
                Some(route) if route.replies.len() > 1 => route.replies.pop_front(),
                Some(route) => route.replies.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => {
                Err(ApiError::new(url, ApiErrorKind::Transport(message)))
            }
            None => Ok(TransportResponse::new(404, "")),
        }
    }
}
