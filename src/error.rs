//! Error taxonomy for the NHL feed.
//!
//! Transport failures and 5xx/429 responses are transient and retried by the
//! client with backoff; anything else surfaces to the caller, which logs and
//! skips the poll cycle instead of crashing.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FeedError {
    /// Whether the client should retry this failure with backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Malformed { .. } => false,
        }
    }
}
