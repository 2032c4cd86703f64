use std::time::Duration;
use thiserror::Error;

/// Failure at the network boundary. Timeouts, transport failures, non-2xx
/// answers and undecodable bodies all surface as this one kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Request took too long! Timeout after {0:?}")]
    Timeout(Duration),
    #[error("{message} ({status})")]
    Status { message: String, status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, when the server actually answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Timeout(_))
    }
}

/// Malformed user input on recipe submission. The message is shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Nothing to render. Views turn this into an error message panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data to render")]
pub struct EmptyResultError;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view is not showing content; render it before updating")]
    NotShowingContent,
}

pub type StoreResult<T> = Result<T, StoreError>;
