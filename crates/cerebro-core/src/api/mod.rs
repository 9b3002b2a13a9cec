//! Request plumbing between the client state machine and the remote service.
//!
//! All traffic goes through a [`Transport`], so the controllers never see
//! `reqwest` directly and tests can swap in [`mock::MockTransport`].

pub mod http;
pub mod mock;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::NetworkError;
use crate::models::{
    HistoryQuery, QueryHistoryEntry, SearchRequest, SearchResult, SignupRequest, TokenResponse,
};

pub use http::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A fully resolved request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the service root, e.g. `/search`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations only report transport-level failures; status handling
/// happens in [`ApiClient`].
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, NetworkError>> + Send + 'a>>;
}

/// Description of a call before the session token is attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    requires_auth: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            requires_auth: false,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, NetworkError> {
        let value = serde_json::to_value(body).map_err(|e| NetworkError::Decode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// Typed access to the Cerebro endpoints.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client backed by a real HTTP connection to `base_url`.
    pub fn http(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url, timeout)))
    }

    /// Send a request, attaching `token` as a bearer credential when the
    /// request requires auth. A missing token is not an error here: the
    /// request goes out bare and the server decides.
    pub async fn send(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> Result<HttpResponse, NetworkError> {
        let bearer = if request.requires_auth {
            token.map(str::to_string)
        } else {
            None
        };
        if request.requires_auth && bearer.is_none() {
            tracing::debug!(path = %request.path, "sending authenticated request without a token");
        }

        let method = request.method;
        let path = request.path.clone();
        let http_request = HttpRequest {
            method,
            path: request.path,
            query: request.query,
            body: request.body,
            bearer,
        };

        let response = self.transport.send(http_request).await.inspect_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed");
        })?;

        if !response.is_success() {
            tracing::warn!(%method, %path, status = response.status, "request rejected");
            return Err(NetworkError::Status(response.status));
        }
        tracing::debug!(%method, %path, status = response.status, "request completed");
        Ok(response)
    }

    /// Like [`send`](Self::send) but decodes the JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> Result<T, NetworkError> {
        let response = self.send(request, token).await?;
        serde_json::from_str(&response.body).map_err(|e| NetworkError::Decode(e.to_string()))
    }

    /// `POST /login`; returns the access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, NetworkError> {
        let request = ApiRequest::post("/login")
            .query("username", username)
            .query("password", password);
        let token: TokenResponse = self.request(request, None).await?;
        Ok(token.access_token)
    }

    /// `POST /signup`; success carries no session.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), NetworkError> {
        let request = ApiRequest::post("/signup").json(&SignupRequest {
            username,
            email,
            password,
        })?;
        self.send(request, None).await.map(|_| ())
    }

    /// `POST /search` with the query text.
    pub async fn search(
        &self,
        query: &str,
        token: Option<&str>,
    ) -> Result<SearchResult, NetworkError> {
        let request = ApiRequest::post("/search")
            .json(&SearchRequest { query })?
            .authenticated();
        self.request(request, token).await
    }

    /// `GET /queries` for one page of the trailing window.
    pub async fn queries(
        &self,
        query: HistoryQuery,
        token: Option<&str>,
    ) -> Result<Vec<QueryHistoryEntry>, NetworkError> {
        let request = ApiRequest::get("/queries")
            .query("days", query.days)
            .query("page", query.page)
            .query("page_size", query.page_size)
            .authenticated();
        self.request(request, token).await
    }
}
