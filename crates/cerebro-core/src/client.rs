//! The client state machine as a whole.
//!
//! [`Cerebro`] wires session, theme, router, search and history together and
//! keeps the user-visible error/notice state. Every network-backed operation
//! is split into `begin_*` (issue a ticket) and `finish_*` (apply a result) so
//! an event loop can run requests on another task; the async methods are the
//! same two halves joined by an `.await`.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{AuthError, HistoryError, NetworkError, SearchError};
use crate::history::{HistoryController, HistoryTicket};
use crate::models::{HistoryQuery, QueryHistoryEntry, SearchResult, User};
use crate::router::{InvalidTransition, ViewEvent, ViewRouter, ViewState};
use crate::search::{Completion, SearchController, SearchTicket};
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use crate::theme::{ThemeController, ThemePreference};

pub const SIGNUP_NOTICE: &str = "Signup successful! Please log in.";

pub struct Cerebro {
    session: SessionManager,
    theme: ThemeController,
    router: ViewRouter,
    search: SearchController,
    history: HistoryController,
    last_error: Option<String>,
    notice: Option<String>,
}

impl Cerebro {
    /// Rebuild client state from durable storage.
    pub fn restore(store: Arc<dyn KeyValueStore>, ambient: ThemePreference) -> Self {
        let session = SessionManager::restore(store.clone());
        let theme = ThemeController::restore(store, ambient);
        let router = ViewRouter::new(session.is_authenticated());
        Self {
            session,
            theme,
            router,
            search: SearchController::new(),
            history: HistoryController::new(),
            last_error: None,
            notice: None,
        }
    }

    /// Override the history window and page size used on entering history.
    pub fn with_history_defaults(mut self, days: u32, page_size: u32) -> Self {
        self.history = HistoryController::with_defaults(days, page_size);
        self
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn view(&self) -> ViewState {
        self.router.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme.get()
    }

    pub fn search_state(&self) -> &SearchController {
        &self.search
    }

    pub fn search_result(&self) -> Option<&SearchResult> {
        self.search.result()
    }

    pub fn history(&self) -> &HistoryController {
        &self.history
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ── synchronous transitions ─────────────────────────────────

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    pub fn show_signup(&mut self) -> Result<(), InvalidTransition> {
        self.router.apply(ViewEvent::RequestSignup)?;
        self.last_error = None;
        self.notice = None;
        Ok(())
    }

    pub fn show_login(&mut self) -> Result<(), InvalidTransition> {
        self.router.apply(ViewEvent::RequestLogin)?;
        self.last_error = None;
        Ok(())
    }

    /// Move to history and start a fetch for the remembered window/page.
    pub fn open_history(&mut self) -> Result<HistoryTicket, InvalidTransition> {
        self.router.apply(ViewEvent::OpenHistory)?;
        Ok(self.history.begin(self.session.token()))
    }

    pub fn open_search(&mut self) -> Result<(), InvalidTransition> {
        self.router.apply(ViewEvent::OpenSearch)?;
        Ok(())
    }

    /// Re-fetch the current page. Only meaningful on the history view.
    pub fn refresh_history(&mut self) -> Option<HistoryTicket> {
        if self.view() != ViewState::LoggedInHistory {
            return None;
        }
        Some(self.history.begin(self.session.token()))
    }

    pub fn cycle_history_days(&mut self) -> Option<HistoryTicket> {
        if self.view() != ViewState::LoggedInHistory {
            return None;
        }
        self.history.cycle_days();
        self.refresh_history()
    }

    pub fn next_history_page(&mut self) -> Option<HistoryTicket> {
        if self.view() != ViewState::LoggedInHistory {
            return None;
        }
        self.history.next_page();
        self.refresh_history()
    }

    pub fn prev_history_page(&mut self) -> Option<HistoryTicket> {
        if self.view() != ViewState::LoggedInHistory || !self.history.prev_page() {
            return None;
        }
        self.refresh_history()
    }

    /// Replay a stored answer on the search view without a network call.
    pub fn show_history_answer(
        &mut self,
        entry: &QueryHistoryEntry,
    ) -> Result<(), InvalidTransition> {
        self.router.apply(ViewEvent::OpenSearch)?;
        self.search.show_history_answer(entry);
        self.last_error = None;
        Ok(())
    }

    /// Unconditional and immediate. In-flight requests become stale.
    pub fn logout(&mut self) {
        self.session.logout();
        self.search.invalidate();
        self.history.invalidate();
        // LoggedOut is valid from every view.
        let _ = self.router.apply(ViewEvent::LoggedOut);
        self.last_error = None;
        self.notice = None;
        self.check_invariant();
    }

    // ── split network operations ────────────────────────────────

    /// Whether a login submission makes sense right now.
    pub fn can_login(&self) -> bool {
        self.view() == ViewState::LoggedOutLogin
    }

    pub fn finish_login(
        &mut self,
        username: &str,
        result: Result<String, NetworkError>,
    ) -> Completion<AuthError> {
        if !self.can_login() {
            tracing::debug!(view = %self.view(), "ignoring login completion off the login view");
            return Completion::Stale;
        }
        match self.session.complete_login(username, result) {
            Ok(()) => {
                let _ = self.router.apply(ViewEvent::LoginSucceeded);
                self.last_error = None;
                self.notice = None;
                self.check_invariant();
                Completion::Applied
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    pub fn finish_signup(&mut self, result: Result<(), NetworkError>) -> Completion<AuthError> {
        match SessionManager::complete_signup(result) {
            Ok(()) => {
                if self.view() == ViewState::LoggedOutSignup {
                    let _ = self.router.apply(ViewEvent::RequestLogin);
                }
                self.last_error = None;
                self.notice = Some(SIGNUP_NOTICE.to_string());
                Completion::Applied
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Completion::Failed(e)
            }
        }
    }

    /// `None` for blank text: nothing is issued and nothing changes.
    pub fn begin_search(&mut self, text: &str) -> Option<SearchTicket> {
        let ticket = self.search.begin(text, self.session.token())?;
        self.last_error = None;
        Some(ticket)
    }

    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchResult, NetworkError>,
    ) -> Completion<SearchError> {
        let outcome = self.search.complete(ticket, result);
        match &outcome {
            Completion::Applied => self.last_error = None,
            Completion::Failed(e) => {
                self.record_failure(e.to_string(), *e == SearchError::SessionExpired)
            }
            Completion::Stale => {}
        }
        outcome
    }

    pub fn begin_history(&mut self, query: HistoryQuery) -> HistoryTicket {
        self.history.begin_with(query, self.session.token())
    }

    pub fn finish_history(
        &mut self,
        ticket: &HistoryTicket,
        result: Result<Vec<QueryHistoryEntry>, NetworkError>,
    ) -> Completion<HistoryError> {
        let outcome = self.history.complete(ticket, result);
        match &outcome {
            Completion::Applied => self.last_error = None,
            Completion::Failed(e) => {
                self.record_failure(e.to_string(), *e == HistoryError::SessionExpired)
            }
            Completion::Stale => {}
        }
        outcome
    }

    /// A 401 on an authenticated call ends the session.
    fn record_failure(&mut self, message: String, session_expired: bool) {
        if session_expired {
            tracing::info!("server rejected the session token, logging out");
            self.logout();
        }
        self.last_error = Some(message);
    }

    fn check_invariant(&self) {
        debug_assert!(
            self.router.is_consistent_with(self.session.is_authenticated()),
            "view {} disagrees with authenticated={}",
            self.router.state(),
            self.session.is_authenticated()
        );
    }

    // ── async conveniences ──────────────────────────────────────

    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if !self.can_login() {
            return Err(AuthError::NotOnLoginScreen);
        }
        let result = api.login(username, password).await;
        match self.finish_login(username, result) {
            Completion::Applied => Ok(()),
            Completion::Failed(e) => Err(e),
            Completion::Stale => Err(AuthError::NotOnLoginScreen),
        }
    }

    pub async fn signup(
        &mut self,
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let result = api.signup(username, email, password).await;
        match self.finish_signup(result) {
            Completion::Failed(e) => Err(e),
            Completion::Applied | Completion::Stale => Ok(()),
        }
    }

    /// `Ok(None)` when the text was blank.
    pub async fn search(
        &mut self,
        api: &ApiClient,
        text: &str,
    ) -> Result<Option<&SearchResult>, SearchError> {
        let Some(ticket) = self.begin_search(text) else {
            return Ok(None);
        };
        let result = api.search(&ticket.query, ticket.token.as_deref()).await;
        match self.finish_search(&ticket, result) {
            Completion::Failed(e) => Err(e),
            Completion::Applied | Completion::Stale => Ok(self.search.result()),
        }
    }

    pub async fn fetch_history(
        &mut self,
        api: &ApiClient,
        days: u32,
        page: u32,
        page_size: u32,
    ) -> Result<&[QueryHistoryEntry], HistoryError> {
        let ticket = self.begin_history(HistoryQuery {
            days,
            page,
            page_size,
        });
        let result = api.queries(ticket.query, ticket.token.as_deref()).await;
        match self.finish_history(&ticket, result) {
            Completion::Failed(e) => Err(e),
            Completion::Applied | Completion::Stale => Ok(self.history.entries()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TOKEN_KEY};
    use chrono::Utc;

    fn fresh() -> (MemoryStore, Cerebro) {
        let mem = MemoryStore::new();
        let client = Cerebro::restore(Arc::new(mem.clone()), ThemePreference::Dark);
        (mem, client)
    }

    fn logged_in() -> (MemoryStore, Cerebro) {
        let (mem, mut client) = fresh();
        client.finish_login("alice", Ok("tok".into()));
        (mem, client)
    }

    fn entry(answer: Option<&str>) -> QueryHistoryEntry {
        QueryHistoryEntry {
            id: "e1".into(),
            query_text: "old question".into(),
            created_at: Utc::now(),
            ai_answer: answer.map(String::from),
        }
    }

    #[test]
    fn restored_token_starts_on_search() {
        let mem = MemoryStore::new();
        mem.set(TOKEN_KEY, "tok").unwrap();
        let client = Cerebro::restore(Arc::new(mem), ThemePreference::Dark);
        assert_eq!(client.view(), ViewState::LoggedInSearch);
        assert!(client.is_authenticated());
    }

    #[test]
    fn login_failure_stays_on_login_with_error() {
        let (_, mut client) = fresh();
        let outcome = client.finish_login("alice", Err(NetworkError::Status(401)));
        assert!(matches!(outcome, Completion::Failed(AuthError::InvalidCredentials(_))));
        assert_eq!(client.view(), ViewState::LoggedOutLogin);
        assert!(!client.is_authenticated());
        assert_eq!(client.last_error(), Some("Login failed. Check your credentials."));
    }

    #[test]
    fn login_success_moves_to_search() {
        let (mem, client) = logged_in();
        assert_eq!(client.view(), ViewState::LoggedInSearch);
        assert_eq!(client.user().unwrap().username, "alice");
        assert_eq!(mem.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert!(client.last_error().is_none());
    }

    #[test]
    fn login_completion_off_login_view_is_ignored() {
        let (mem, mut client) = fresh();
        client.show_signup().unwrap();
        let outcome = client.finish_login("alice", Ok("tok".into()));
        assert_eq!(outcome, Completion::Stale);
        assert!(!client.is_authenticated());
        assert_eq!(mem.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn signup_success_returns_to_login_without_session() {
        let (_, mut client) = fresh();
        client.show_signup().unwrap();
        assert_eq!(client.finish_signup(Ok(())), Completion::Applied);
        assert_eq!(client.view(), ViewState::LoggedOutLogin);
        assert!(!client.is_authenticated());
        assert_eq!(client.notice(), Some(SIGNUP_NOTICE));
    }

    #[test]
    fn signup_failure_stays_on_signup() {
        let (_, mut client) = fresh();
        client.show_signup().unwrap();
        client.finish_signup(Err(NetworkError::Status(400)));
        assert_eq!(client.view(), ViewState::LoggedOutSignup);
        assert_eq!(
            client.last_error(),
            Some("Signup failed. Username or email might already exist.")
        );
    }

    #[test]
    fn logout_discards_everything_and_orphans_requests() {
        let (mem, mut client) = logged_in();
        let search = client.begin_search("pending").unwrap();
        let history = client.open_history().unwrap();

        client.logout();
        assert_eq!(client.view(), ViewState::LoggedOutLogin);
        assert_eq!(mem.get(TOKEN_KEY).unwrap(), None);
        assert!(client.user().is_none());

        let late = SearchResult {
            web_results: vec![],
            ai_answer: "late".into(),
        };
        assert_eq!(client.finish_search(&search, Ok(late)), Completion::Stale);
        assert_eq!(client.finish_history(&history, Ok(vec![entry(None)])), Completion::Stale);
        assert!(client.search_result().is_none());
        assert!(client.history().entries().is_empty());
    }

    #[test]
    fn unauthorized_search_forces_logout() {
        let (mem, mut client) = logged_in();
        let ticket = client.begin_search("q").unwrap();
        let outcome = client.finish_search(&ticket, Err(NetworkError::Status(401)));
        assert_eq!(outcome, Completion::Failed(SearchError::SessionExpired));
        assert_eq!(client.view(), ViewState::LoggedOutLogin);
        assert!(!client.is_authenticated());
        assert_eq!(mem.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(
            client.last_error(),
            Some("Your session has expired. Please log in again.")
        );
    }

    #[test]
    fn server_error_keeps_session() {
        let (_, mut client) = logged_in();
        let ticket = client.open_history().unwrap();
        client.finish_history(&ticket, Err(NetworkError::Status(500)));
        assert_eq!(client.view(), ViewState::LoggedInHistory);
        assert!(client.is_authenticated());
        assert_eq!(client.last_error(), Some("Failed to fetch query history."));
    }

    #[test]
    fn history_requires_login() {
        let (_, mut client) = fresh();
        assert!(client.open_history().is_err());
        assert!(client.refresh_history().is_none());
        assert_eq!(client.view(), ViewState::LoggedOutLogin);
    }

    #[test]
    fn open_history_fetches_with_token() {
        let (_, mut client) = logged_in();
        let ticket = client.open_history().unwrap();
        assert_eq!(ticket.token.as_deref(), Some("tok"));
        assert_eq!(ticket.query, HistoryQuery::default());
        assert!(client.history().is_loading());
    }

    #[test]
    fn replay_switches_to_search() {
        let (_, mut client) = logged_in();
        client.open_history().unwrap();
        client.show_history_answer(&entry(Some("stored"))).unwrap();
        assert_eq!(client.view(), ViewState::LoggedInSearch);
        let result = client.search_result().unwrap();
        assert!(result.web_results.is_empty());
        assert_eq!(result.ai_answer, "stored");
    }

    #[test]
    fn blank_search_leaves_error_untouched() {
        let (_, mut client) = logged_in();
        let ticket = client.begin_search("q").unwrap();
        client.finish_search(&ticket, Err(NetworkError::Status(500)));
        assert!(client.begin_search("  ").is_none());
        assert_eq!(client.last_error(), Some("Search failed. Please try again."));
    }

    #[test]
    fn paging_only_on_history_view() {
        let (_, mut client) = logged_in();
        assert!(client.next_history_page().is_none());
        client.open_history().unwrap();
        let ticket = client.next_history_page().unwrap();
        assert_eq!(ticket.query.page, 2);
        let ticket = client.prev_history_page().unwrap();
        assert_eq!(ticket.query.page, 1);
        assert!(client.prev_history_page().is_none());
        let ticket = client.cycle_history_days().unwrap();
        assert_eq!(ticket.query.days, 30);
    }
}
