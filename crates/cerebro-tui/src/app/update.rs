use cerebro_core::{HistoryTicket, ViewState};

use super::App;
use crate::action::Action;
use crate::model::form::{EMAIL, PASSWORD, TextField, USERNAME};
use crate::tui_event::BackendCommand;

/// Apply an editing action to a text field. Returns false for non-editing
/// actions.
fn edit(field: &mut TextField, action: Action) -> bool {
    match action {
        Action::Input(ch) => field.insert(ch),
        Action::Backspace => field.backspace(),
        Action::DeleteForward => field.delete_forward(),
        Action::CursorLeft => field.left(),
        Action::CursorRight => field.right(),
        Action::CursorHome => field.home(),
        Action::CursorEnd => field.end(),
        _ => return false,
    }
    true
}

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(6);
                return false;
            }
            Action::ToggleTheme => {
                self.client.toggle_theme();
                return false;
            }
            Action::Logout => {
                if self.client.is_authenticated() {
                    self.client.logout();
                    self.reset_session_ui();
                }
                return false;
            }
            _ => {}
        }

        match self.client.view() {
            ViewState::LoggedOutLogin => self.update_login(action),
            ViewState::LoggedOutSignup => self.update_signup(action),
            ViewState::LoggedInSearch => self.update_search(action),
            ViewState::LoggedInHistory => self.update_history(action),
        }
        false
    }

    fn update_login(&mut self, action: Action) {
        if edit(self.login_form.focused_mut(), action) {
            return;
        }
        match action {
            Action::NextField => self.login_form.next_field(),
            Action::PrevField => self.login_form.prev_field(),
            Action::ShowSignup => {
                if self.client.show_signup().is_ok() {
                    self.signup_form.focus_label(USERNAME);
                }
            }
            Action::Submit => {
                if self.auth_pending {
                    return;
                }
                self.auth_pending = true;
                self.client.dismiss_notice();
                self.send(BackendCommand::Login {
                    username: self.login_form.value(USERNAME).to_string(),
                    password: self.login_form.value(PASSWORD).to_string(),
                });
            }
            _ => {}
        }
    }

    fn update_signup(&mut self, action: Action) {
        if edit(self.signup_form.focused_mut(), action) {
            return;
        }
        match action {
            Action::NextField => self.signup_form.next_field(),
            Action::PrevField => self.signup_form.prev_field(),
            Action::NavigateBack => {
                let _ = self.client.show_login();
            }
            Action::Submit => {
                if self.auth_pending {
                    return;
                }
                self.auth_pending = true;
                self.send(BackendCommand::Signup {
                    username: self.signup_form.value(USERNAME).to_string(),
                    email: self.signup_form.value(EMAIL).to_string(),
                    password: self.signup_form.value(PASSWORD).to_string(),
                });
            }
            _ => {}
        }
    }

    fn update_search(&mut self, action: Action) {
        if edit(&mut self.search_input, action) {
            return;
        }
        match action {
            Action::Submit => {
                let text = self.search_input.value().to_string();
                if let Some(ticket) = self.client.begin_search(&text) {
                    self.shown_query = Some(text);
                    self.result_scroll = 0;
                    self.send(BackendCommand::Search(ticket));
                }
            }
            Action::OpenHistory => match self.client.open_history() {
                Ok(ticket) => {
                    self.history_cursor = 0;
                    self.send(BackendCommand::FetchHistory(ticket));
                }
                Err(e) => tracing::warn!(error = %e, "cannot open history"),
            },
            Action::NavigateBack => self.search_input.clear(),
            Action::MoveUp => self.result_scroll = self.result_scroll.saturating_sub(1),
            Action::MoveDown => self.result_scroll = self.result_scroll.saturating_add(1),
            Action::PageUp => {
                self.result_scroll = self.result_scroll.saturating_sub(self.page_step())
            }
            Action::PageDown => {
                self.result_scroll = self.result_scroll.saturating_add(self.page_step())
            }
            _ => {}
        }
    }

    fn update_history(&mut self, action: Action) {
        let count = self.client.history().entries().len();
        match action {
            Action::MoveDown => {
                if self.history_cursor + 1 < count {
                    self.history_cursor += 1;
                }
            }
            Action::MoveUp => {
                self.history_cursor = self.history_cursor.saturating_sub(1);
            }
            Action::Submit => {
                let Some(entry) = self.selected_entry().cloned() else {
                    return;
                };
                if !entry.has_answer() {
                    return;
                }
                if self.client.show_history_answer(&entry).is_ok() {
                    self.search_input.set(&entry.query_text);
                    self.shown_query = Some(entry.query_text);
                    self.result_scroll = 0;
                }
            }
            Action::NavigateBack => {
                let _ = self.client.open_search();
            }
            Action::CycleWindow => {
                let ticket = self.client.cycle_history_days();
                self.dispatch_history(ticket);
            }
            Action::NextPage => {
                let ticket = self.client.next_history_page();
                self.dispatch_history(ticket);
            }
            Action::PrevPage => {
                let ticket = self.client.prev_history_page();
                self.dispatch_history(ticket);
            }
            Action::Refresh => {
                let ticket = self.client.refresh_history();
                self.dispatch_history(ticket);
            }
            _ => {}
        }
    }

    fn dispatch_history(&mut self, ticket: Option<HistoryTicket>) {
        if let Some(ticket) = ticket {
            self.history_cursor = 0;
            self.send(BackendCommand::FetchHistory(ticket));
        }
    }

    fn page_step(&self) -> u16 {
        (self.visible_rows as u16 / 2).max(1)
    }
}
