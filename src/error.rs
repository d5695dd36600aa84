use thiserror::Error;

use crate::signaling::types::MediaKind;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("signaling request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("signaling call {path} returned status {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid response from {path}: {source}")]
    Response {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("device cannot produce {0} media")]
    MediaUnsupported(MediaKind),

    #[error("media engine error: {0}")]
    Media(String),

    #[error("negotiation cancelled by media engine")]
    NegotiationCancelled,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, ClientError>;
