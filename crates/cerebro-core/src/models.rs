//! Wire and client-side data types exchanged with the Cerebro service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Recency windows (in days) offered by the history screen.
pub const HISTORY_WINDOWS: [u32; 3] = [7, 30, 90];

/// Number of history entries requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A single organic web listing returned alongside the AI answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Combined answer for one search: ordered web listings plus the generated answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub web_results: Vec<WebResult>,
    #[serde(default)]
    pub ai_answer: String,
}

impl SearchResult {
    /// Rebuild an answer-only result from a stored history entry.
    pub fn from_history(entry: &QueryHistoryEntry) -> Self {
        Self {
            web_results: Vec::new(),
            ai_answer: entry.ai_answer.clone().unwrap_or_default(),
        }
    }
}

/// A past query as reported by `GET /queries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryHistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "query")]
    pub query_text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ai_answer: Option<String>,
}

impl QueryHistoryEntry {
    /// Whether this entry carries an answer that can be replayed.
    pub fn has_answer(&self) -> bool {
        self.ai_answer.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Best-effort local user info; never verified against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// Paging and window parameters for a history fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub days: u32,
    pub page: u32,
    pub page_size: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            days: HISTORY_WINDOWS[0],
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
}

/// Accepts RFC 3339 timestamps and naive ISO-8601 ones (taken as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
