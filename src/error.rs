//! Error types shared by the client core.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure talking to the server
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered but rejected the request (null result or non-OK status)
    #[error("Server error: {0}")]
    Server(String),

    /// Settings or queue snapshot could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Caller-supplied value was rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation was cancelled through its token
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
