mod backend;
mod update;

use ratatui::Frame;
use tokio::sync::mpsc;

use cerebro_core::{Cerebro, QueryHistoryEntry, ViewState};

use crate::model::form::{Form, TextField};
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key commands (history browser).
    Normal,
    /// Printable keys go into the focused field.
    TextInput,
}

/// Main application state.
pub struct App {
    pub client: Cerebro,
    /// Shown in the header so the user knows which server they are on.
    pub api_url: String,

    pub login_form: Form,
    pub signup_form: Form,
    pub search_input: TextField,
    /// Query whose result is on screen, for the result header.
    pub shown_query: Option<String>,
    pub result_scroll: u16,
    pub history_cursor: usize,
    /// A login or signup request is in flight.
    pub auth_pending: bool,

    pub tick: usize,
    pub visible_rows: usize,
    pub should_quit: bool,
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(client: Cerebro, api_url: String) -> Self {
        Self {
            client,
            api_url,
            login_form: Form::login(),
            signup_form: Form::signup(),
            search_input: TextField::new(),
            shown_query: None,
            result_scroll: 0,
            history_cursor: 0,
            auth_pending: false,
            tick: 0,
            visible_rows: 20,
            should_quit: false,
            backend_cmd_tx: None,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::for_preference(self.client.theme())
    }

    pub fn input_mode(&self) -> InputMode {
        match self.client.view() {
            ViewState::LoggedInHistory => InputMode::Normal,
            _ => InputMode::TextInput,
        }
    }

    pub fn selected_entry(&self) -> Option<&QueryHistoryEntry> {
        self.client.history().entries().get(self.history_cursor)
    }

    /// Hand a command to the backend task.
    fn send(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!("backend task is gone, dropping command");
                }
            }
            None => tracing::debug!("no backend attached, dropping command"),
        }
    }

    /// Forget per-session UI state after the session ends, voluntarily or not.
    fn reset_session_ui(&mut self) {
        self.search_input.clear();
        self.shown_query = None;
        self.result_scroll = 0;
        self.history_cursor = 0;
        self.login_form.clear_secrets();
    }

    pub fn view(&self, f: &mut Frame) {
        crate::view::render(f, self);
    }
}
