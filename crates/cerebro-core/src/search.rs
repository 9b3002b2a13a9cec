//! One search request/response cycle and its held result.

use crate::api::ApiClient;
use crate::error::{NetworkError, SearchError};
use crate::models::{QueryHistoryEntry, SearchResult};

/// An issued search. Completions are matched against the controller's
/// generation so a superseded request cannot overwrite a newer result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
    /// Token snapshot taken when the search was issued.
    pub token: Option<String>,
}

/// What happened to a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    Applied,
    Failed(E),
    /// A newer request or a logout superseded this one.
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchController {
    result: Option<SearchResult>,
    busy: bool,
    generation: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start a search. Blank text is a no-op and issues nothing.
    pub fn begin(&mut self, text: &str, token: Option<&str>) -> Option<SearchTicket> {
        if text.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        self.busy = true;
        Some(SearchTicket {
            generation: self.generation,
            query: text.to_string(),
            token: token.map(str::to_string),
        })
    }

    /// Apply a finished request. Success replaces the held result wholesale;
    /// failure keeps it.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchResult, NetworkError>,
    ) -> Completion<SearchError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale search completion"
            );
            return Completion::Stale;
        }
        self.busy = false;
        match result {
            Ok(result) => {
                self.result = Some(result);
                Completion::Applied
            }
            Err(e) => Completion::Failed(SearchError::from(e)),
        }
    }

    /// Show a past answer without touching the network.
    pub fn show_history_answer(&mut self, entry: &QueryHistoryEntry) {
        // Any in-flight search would otherwise land on top of the replay.
        self.generation += 1;
        self.busy = false;
        self.result = Some(SearchResult::from_history(entry));
    }

    /// Forget everything and orphan in-flight requests.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.busy = false;
        self.result = None;
    }

    /// Issue a search and wait for it. `Ok(None)` means the text was blank
    /// and nothing was sent.
    pub async fn search(
        &mut self,
        api: &ApiClient,
        token: Option<&str>,
        text: &str,
    ) -> Result<Option<&SearchResult>, SearchError> {
        let Some(ticket) = self.begin(text, token) else {
            return Ok(None);
        };
        let result = api.search(&ticket.query, ticket.token.as_deref()).await;
        match self.complete(&ticket, result) {
            Completion::Failed(e) => Err(e),
            Completion::Applied | Completion::Stale => Ok(self.result.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WebResult;
    use chrono::Utc;

    fn answer(text: &str) -> SearchResult {
        SearchResult {
            web_results: vec![WebResult {
                title: text.into(),
                link: format!("https://example.com/{text}"),
                snippet: String::new(),
            }],
            ai_answer: text.into(),
        }
    }

    #[test]
    fn blank_queries_issue_nothing() {
        let mut search = SearchController::new();
        let ticket = search.begin("first", None).unwrap();
        search.complete(&ticket, Ok(answer("first")));

        assert!(search.begin("", None).is_none());
        assert!(search.begin("   ", None).is_none());
        assert!(!search.is_busy());
        assert_eq!(search.result().unwrap().ai_answer, "first");
    }

    #[test]
    fn completion_replaces_wholesale() {
        let mut search = SearchController::new();
        let t1 = search.begin("one", Some("tok")).unwrap();
        assert!(search.is_busy());
        assert_eq!(t1.token.as_deref(), Some("tok"));
        search.complete(&t1, Ok(answer("one")));

        let t2 = search.begin("capital of France", Some("tok")).unwrap();
        // Prior result stays visible while the new one is in flight.
        assert_eq!(search.result().unwrap().ai_answer, "one");
        let replacement = SearchResult {
            web_results: vec![],
            ai_answer: "Paris".into(),
        };
        assert_eq!(search.complete(&t2, Ok(replacement.clone())), Completion::Applied);
        assert_eq!(search.result(), Some(&replacement));
        assert!(!search.is_busy());
    }

    #[test]
    fn older_request_resolving_late_is_discarded() {
        let mut search = SearchController::new();
        let early = search.begin("early", None).unwrap();
        let late = search.begin("late", None).unwrap();

        assert_eq!(search.complete(&late, Ok(answer("late"))), Completion::Applied);
        assert_eq!(search.complete(&early, Ok(answer("early"))), Completion::Stale);
        assert_eq!(search.result().unwrap().ai_answer, "late");
    }

    #[test]
    fn failure_keeps_prior_result() {
        let mut search = SearchController::new();
        let t1 = search.begin("one", None).unwrap();
        search.complete(&t1, Ok(answer("one")));

        let t2 = search.begin("two", None).unwrap();
        let outcome = search.complete(&t2, Err(NetworkError::Status(500)));
        assert!(matches!(outcome, Completion::Failed(SearchError::RequestFailed(_))));
        assert_eq!(search.result().unwrap().ai_answer, "one");
        assert!(!search.is_busy());
    }

    #[test]
    fn replay_builds_answer_only_result() {
        let mut search = SearchController::new();
        let pending = search.begin("pending", None).unwrap();
        let entry = QueryHistoryEntry {
            id: "1".into(),
            query_text: "old".into(),
            created_at: Utc::now(),
            ai_answer: Some("stored answer".into()),
        };
        search.show_history_answer(&entry);
        let result = search.result().unwrap();
        assert!(result.web_results.is_empty());
        assert_eq!(result.ai_answer, "stored answer");

        assert_eq!(search.complete(&pending, Ok(answer("pending"))), Completion::Stale);
        assert_eq!(search.result().unwrap().ai_answer, "stored answer");
    }

    #[test]
    fn invalidate_orphans_in_flight() {
        let mut search = SearchController::new();
        let ticket = search.begin("q", None).unwrap();
        search.invalidate();
        assert_eq!(search.complete(&ticket, Ok(answer("q"))), Completion::Stale);
        assert!(search.result().is_none());
    }
}
