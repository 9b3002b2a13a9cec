use cerebro_core::{HistoryTicket, NetworkError, QueryHistoryEntry, SearchResult, SearchTicket};

/// Commands sent from the TUI to the backend.
pub enum BackendCommand {
    Login {
        username: String,
        password: String,
    },
    Signup {
        username: String,
        email: String,
        password: String,
    },
    Search(SearchTicket),
    FetchHistory(HistoryTicket),
}

/// Results flowing back from the backend. Each carries what the matching
/// `finish_*` call on the client needs.
#[derive(Debug)]
pub enum BackendEvent {
    LoginFinished {
        username: String,
        result: Result<String, NetworkError>,
    },
    SignupFinished {
        result: Result<(), NetworkError>,
    },
    SearchFinished {
        ticket: SearchTicket,
        result: Result<SearchResult, NetworkError>,
    },
    HistoryFinished {
        ticket: HistoryTicket,
        result: Result<Vec<QueryHistoryEntry>, NetworkError>,
    },
}
