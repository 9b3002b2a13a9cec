//! Runs network requests off the UI task.
//!
//! Each command gets its own task, so responses can come back in any order.
//! The client's generation tickets decide which completions still apply.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cerebro_core::ApiClient;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires.
pub async fn run(
    api: Arc<ApiClient>,
    mut commands: mpsc::UnboundedReceiver<BackendCommand>,
    events: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = commands.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        let api = api.clone();
        let events = events.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let event = tokio::select! {
                _ = cancel.cancelled() => return,
                event = execute(&api, cmd) => event,
            };
            // The UI may already be gone on shutdown.
            let _ = events.send(event);
        });
    }
    tracing::debug!("backend loop stopped");
}

/// Perform one command and package the outcome.
pub async fn execute(api: &ApiClient, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::Login { username, password } => {
            let result = api.login(&username, &password).await;
            BackendEvent::LoginFinished { username, result }
        }
        BackendCommand::Signup {
            username,
            email,
            password,
        } => BackendEvent::SignupFinished {
            result: api.signup(&username, &email, &password).await,
        },
        BackendCommand::Search(ticket) => {
            let result = api.search(&ticket.query, ticket.token.as_deref()).await;
            BackendEvent::SearchFinished { ticket, result }
        }
        BackendCommand::FetchHistory(ticket) => {
            let result = api.queries(ticket.query, ticket.token.as_deref()).await;
            BackendEvent::HistoryFinished { ticket, result }
        }
    }
}
