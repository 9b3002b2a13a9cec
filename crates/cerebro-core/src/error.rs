use thiserror::Error;

/// Any failure talking to the remote service.
///
/// Callers collapse this into their own user-facing error; the variant is
/// only inspected to detect an expired session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl NetworkError {
    /// The server rejected the bearer credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NetworkError::Status(401))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Login failed. Check your credentials.")]
    InvalidCredentials(#[source] NetworkError),
    #[error("Signup failed. Username or email might already exist.")]
    RegistrationFailed(#[source] NetworkError),
    #[error("Logging in is only possible from the login screen.")]
    NotOnLoginScreen,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search failed. Please try again.")]
    RequestFailed(#[source] NetworkError),
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Failed to fetch query history.")]
    FetchFailed(#[source] NetworkError),
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
}

impl From<NetworkError> for SearchError {
    fn from(err: NetworkError) -> Self {
        if err.is_unauthorized() {
            SearchError::SessionExpired
        } else {
            SearchError::RequestFailed(err)
        }
    }
}

impl From<NetworkError> for HistoryError {
    fn from(err: NetworkError) -> Self {
        if err.is_unauthorized() {
            HistoryError::SessionExpired
        } else {
            HistoryError::FetchFailed(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("could not determine a data directory for client state")]
    NoDataDir,
    #[error("failed to access stored {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
