use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::NetworkError;

/// [`Transport`] over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    /// Per-request timeout; `None` leaves reqwest's default in place.
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, NetworkError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, request.path);

            let mut req = match request.method {
                Method::Get => self.client.get(&url),
                Method::Post => self.client.post(&url),
            };
            if !request.query.is_empty() {
                req = req.query(&request.query);
            }
            if let Some(ref body) = request.body {
                req = req.json(body);
            }
            if let Some(ref token) = request.bearer {
                req = req.bearer_auth(token);
            }
            if let Some(timeout) = self.timeout {
                req = req.timeout(timeout);
            }

            // Strip the URL from errors: login carries credentials in the query string.
            let resp = req
                .send()
                .await
                .map_err(|e| NetworkError::Transport(e.without_url().to_string()))?;

            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .map_err(|e| NetworkError::Transport(e.without_url().to_string()))?;

            Ok(HttpResponse { status, body })
        })
    }
}
