//! Error types for the completion client

use thiserror::Error;

/// Errors produced by the transport boundary.
///
/// Every variant's Display string is what ends up in
/// [`RequestResult::error`](crate::metrics::RequestResult) when a request
/// fails, so the wording doubles as the error-histogram key.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection-level failure (refused, DNS, broken transfer)
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request exceeded the configured timeout. Kept separate from
    /// [`ClientError::Transport`] so repeated timeouts aggregate under one
    /// stable histogram entry.
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected completion shape
    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    /// Client-side configuration problem (e.g. an invalid base URL)
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, ClientError>;
