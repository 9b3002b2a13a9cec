use cerebro_core::Completion;

use super::App;
use crate::model::form::{Form, PASSWORD, USERNAME};
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::LoginFinished { username, result } => {
                self.auth_pending = false;
                if self.client.finish_login(&username, result) == Completion::Stale {
                    return;
                }
                if self.client.is_authenticated() {
                    self.login_form.clear_secrets();
                    self.search_input.clear();
                    self.shown_query = None;
                } else {
                    self.login_form.focus_label(PASSWORD);
                }
            }
            BackendEvent::SignupFinished { result } => {
                self.auth_pending = false;
                if self.client.finish_signup(result) == Completion::Applied {
                    let username = self.signup_form.value(USERNAME).to_string();
                    self.signup_form = Form::signup();
                    self.login_form.set(USERNAME, &username);
                    self.login_form.focus_label(PASSWORD);
                }
            }
            BackendEvent::SearchFinished { ticket, result } => {
                match self.client.finish_search(&ticket, result) {
                    Completion::Applied => self.result_scroll = 0,
                    Completion::Failed(_) if !self.client.is_authenticated() => {
                        self.reset_session_ui()
                    }
                    Completion::Failed(_) | Completion::Stale => {}
                }
            }
            BackendEvent::HistoryFinished { ticket, result } => {
                match self.client.finish_history(&ticket, result) {
                    Completion::Applied => {
                        let count = self.client.history().entries().len();
                        self.history_cursor = self.history_cursor.min(count.saturating_sub(1));
                    }
                    Completion::Failed(_) if !self.client.is_authenticated() => {
                        self.reset_session_ui()
                    }
                    Completion::Failed(_) | Completion::Stale => {}
                }
            }
        }
    }
}
