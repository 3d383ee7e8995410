//! Error types for the websh client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by a [`RemoteExecutor`](crate::RemoteExecutor).
///
/// None of these are fatal to an interactive session; callers report them
/// and carry on.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The liveness endpoint could not be reached.
    #[error("websh server is unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The execution request failed in transit (connection error or timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("unexpected response status: {status}")]
    BadStatus { status: StatusCode },

    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the expected JSON document.
    #[error("failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// Returns true if the request was aborted by the client timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Unreachable(err) | Self::Transport(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Returns true for server-side protocol violations (bad status or body).
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::BadStatus { .. } | Self::Decode(_))
    }
}
