//! Which screen is active.
//!
//! Transitions are an explicit table; anything not listed is rejected and
//! leaves the current view in place.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    LoggedOutLogin,
    LoggedOutSignup,
    LoggedInSearch,
    LoggedInHistory,
}

impl ViewState {
    /// Whether this view belongs to the authenticated partition.
    pub fn requires_auth(self) -> bool {
        matches!(self, ViewState::LoggedInSearch | ViewState::LoggedInHistory)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewState::LoggedOutLogin => "login",
            ViewState::LoggedOutSignup => "signup",
            ViewState::LoggedInSearch => "search",
            ViewState::LoggedInHistory => "history",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// User asked to create an account.
    RequestSignup,
    /// User backed out of signup, or signup succeeded.
    RequestLogin,
    LoginSucceeded,
    OpenHistory,
    OpenSearch,
    /// Explicit or forced logout; valid from every view.
    LoggedOut,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot apply {event:?} while on the {from} view")]
pub struct InvalidTransition {
    pub from: ViewState,
    pub event: ViewEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRouter {
    state: ViewState,
}

impl ViewRouter {
    /// Start on search when a session was restored, otherwise on login.
    pub fn new(authenticated: bool) -> Self {
        let state = if authenticated {
            ViewState::LoggedInSearch
        } else {
            ViewState::LoggedOutLogin
        };
        Self { state }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// The transition table.
    pub fn next(from: ViewState, event: ViewEvent) -> Option<ViewState> {
        use ViewEvent::*;
        use ViewState::*;
        match (from, event) {
            (_, LoggedOut) => Some(LoggedOutLogin),
            (LoggedOutLogin, RequestSignup) => Some(LoggedOutSignup),
            (LoggedOutSignup, RequestLogin) => Some(LoggedOutLogin),
            (LoggedOutLogin, LoginSucceeded) => Some(LoggedInSearch),
            (LoggedInSearch, OpenHistory) => Some(LoggedInHistory),
            (LoggedInHistory, OpenSearch) => Some(LoggedInSearch),
            // Replaying a history answer re-enters search; staying put is allowed.
            (LoggedInSearch, OpenSearch) => Some(LoggedInSearch),
            _ => None,
        }
    }

    pub fn apply(&mut self, event: ViewEvent) -> Result<ViewState, InvalidTransition> {
        let from = self.state;
        let to = Self::next(from, event).ok_or(InvalidTransition { from, event })?;
        if from != to {
            tracing::debug!(%from, %to, "view changed");
        }
        self.state = to;
        Ok(to)
    }

    /// The active view agrees with the authentication status.
    pub fn is_consistent_with(&self, authenticated: bool) -> bool {
        self.state.requires_auth() == authenticated
    }
}
