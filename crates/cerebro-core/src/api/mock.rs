//! Mock transport for testing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::NetworkError;

/// A configurable mock response for [`MockTransport`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Reply with this status and body.
    Reply { status: u16, body: String },
    /// Simulate a connection-level failure.
    Failure(String),
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        MockResponse::Reply {
            status,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        MockResponse::Reply {
            status,
            body: String::new(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        MockResponse::Reply {
            status,
            body: body.to_string(),
        }
    }
}

/// A hand-rolled mock implementing [`Transport`] for tests.
///
/// Each `(method, path)` route holds a sequence of responses; every call pops
/// the next one and the last is repeated once the sequence runs dry. Unrouted
/// requests get a 404. All requests are recorded.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Vec<MockResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `response` to the sequence for `method path`.
    pub fn on(self, method: Method, path: &str, response: MockResponse) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((method, path.to_string()))
                .or_default()
                .push(response);
        }
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn next_response(&self, method: Method, path: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().ok()?;
        let seq = routes.get_mut(&(method, path.to_string()))?;
        if seq.len() > 1 {
            Some(seq.remove(0))
        } else {
            seq.first().cloned()
        }
    }
}

impl Transport for MockTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, NetworkError>> + Send + 'a>> {
        let response = self.next_response(request.method, &request.path);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            match response {
                Some(MockResponse::Reply { status, body }) => Ok(HttpResponse { status, body }),
                Some(MockResponse::Failure(msg)) => Err(NetworkError::Transport(msg)),
                None => Ok(HttpResponse {
                    status: 404,
                    body: String::new(),
                }),
            }
        })
    }
}
