//! Paginated browsing of past queries within a recency window.

use crate::api::ApiClient;
use crate::error::{HistoryError, NetworkError};
use crate::models::{HISTORY_WINDOWS, HistoryQuery, QueryHistoryEntry};
use crate::search::Completion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub generation: u64,
    pub query: HistoryQuery,
    pub token: Option<String>,
}

#[derive(Debug, Default)]
pub struct HistoryController {
    entries: Vec<QueryHistoryEntry>,
    query: HistoryQuery,
    loading: bool,
    generation: u64,
}

impl HistoryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a configured window and page size.
    pub fn with_defaults(days: u32, page_size: u32) -> Self {
        Self {
            query: HistoryQuery {
                days,
                page: 1,
                page_size: page_size.max(1),
            },
            ..Self::default()
        }
    }

    /// The currently displayed page.
    pub fn entries(&self) -> &[QueryHistoryEntry] {
        &self.entries
    }

    pub fn query(&self) -> HistoryQuery {
        self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Step 7 → 30 → 90 → 7. A window outside that list restarts at 7.
    pub fn cycle_days(&mut self) {
        let next = HISTORY_WINDOWS
            .iter()
            .position(|&d| d == self.query.days)
            .map(|i| HISTORY_WINDOWS[(i + 1) % HISTORY_WINDOWS.len()])
            .unwrap_or(HISTORY_WINDOWS[0]);
        self.query.days = next;
        self.query.page = 1;
    }

    pub fn next_page(&mut self) {
        self.query.page += 1;
    }

    /// Returns false when already on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.query.page > 1 {
            self.query.page -= 1;
            true
        } else {
            false
        }
    }

    /// Issue a fetch for the remembered window and page.
    pub fn begin(&mut self, token: Option<&str>) -> HistoryTicket {
        self.begin_with(self.query, token)
    }

    /// Issue a fetch for explicit parameters. `days` is passed through as-is;
    /// page numbers are 1-based.
    pub fn begin_with(&mut self, query: HistoryQuery, token: Option<&str>) -> HistoryTicket {
        self.query = HistoryQuery {
            page: query.page.max(1),
            ..query
        };
        self.generation += 1;
        self.loading = true;
        HistoryTicket {
            generation: self.generation,
            query: self.query,
            token: token.map(str::to_string),
        }
    }

    /// Replace the page wholesale on success; keep it on failure.
    pub fn complete(
        &mut self,
        ticket: &HistoryTicket,
        result: Result<Vec<QueryHistoryEntry>, NetworkError>,
    ) -> Completion<HistoryError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale history completion"
            );
            return Completion::Stale;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                tracing::debug!(
                    count = entries.len(),
                    days = ticket.query.days,
                    page = ticket.query.page,
                    "history page loaded"
                );
                self.entries = entries;
                Completion::Applied
            }
            Err(e) => Completion::Failed(HistoryError::from(e)),
        }
    }

    /// Forget the page and orphan in-flight fetches. Window and paging stay.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.entries.clear();
    }

    pub async fn fetch_history(
        &mut self,
        api: &ApiClient,
        token: Option<&str>,
        days: u32,
        page: u32,
        page_size: u32,
    ) -> Result<&[QueryHistoryEntry], HistoryError> {
        let ticket = self.begin_with(
            HistoryQuery {
                days,
                page,
                page_size,
            },
            token,
        );
        let result = api.queries(ticket.query, ticket.token.as_deref()).await;
        match self.complete(&ticket, result) {
            Completion::Failed(e) => Err(e),
            Completion::Applied | Completion::Stale => Ok(&self.entries),
        }
    }
}
