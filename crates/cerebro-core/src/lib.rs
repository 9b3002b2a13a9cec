//! Client core for the Cerebro AI search service.
//!
//! Holds the session/view state machine and its contract with the remote
//! API. Rendering lives in the frontends (`cerebro-tui`, `cerebro-cli`).

pub mod api;
pub mod client;
pub mod config_file;
pub mod error;
pub mod history;
pub mod models;
pub mod router;
pub mod search;
pub mod session;
pub mod storage;
pub mod theme;

// Re-export for convenience
pub use api::{ApiClient, HttpTransport, Transport};
pub use client::Cerebro;
pub use config_file::Settings;
pub use error::{AuthError, HistoryError, NetworkError, SearchError, StorageError};
pub use history::{HistoryController, HistoryTicket};
pub use models::{HistoryQuery, QueryHistoryEntry, SearchResult, User, WebResult};
pub use router::{InvalidTransition, ViewEvent, ViewRouter, ViewState};
pub use search::{Completion, SearchController, SearchTicket};
pub use session::{Session, SessionManager};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{ThemeController, ThemePreference, ambient_preference};
