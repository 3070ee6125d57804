// Error types for store operations

use deskbot_contracts::TicketId;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by ticket store implementations.
///
/// Every operation may fail; a failed write is never reported as success.
/// Callers convert these into scoped, user-visible outcomes - nothing here is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No ticket with the requested id
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The store refused the write (constraint violation or rejected mutation)
    #[error("store rejected the write: {0}")]
    Rejected(String),

    /// Network-level or protocol failure talking to the store
    #[error("store transport error: {0}")]
    Transport(String),

    /// A record came back in a shape this client cannot decode
    #[error("malformed store record: {0}")]
    Malformed(String),

    /// Missing or unusable client configuration
    #[error("store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a rejected-write error
    pub fn rejected(msg: impl Into<String>) -> Self {
        StoreError::Rejected(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        StoreError::Transport(msg.into())
    }

    /// Create a malformed-record error
    pub fn malformed(msg: impl Into<String>) -> Self {
        StoreError::Malformed(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        StoreError::Config(msg.into())
    }

    /// Whether this error means the ticket does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}
