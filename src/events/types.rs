//! Abort notification types
//!
//! An abort is a notification, not an error: it tells the subscriber that
//! the transport or producer can no longer carry media. Teardown policy
//! belongs to whoever subscribes.

use serde::{Deserialize, Serialize};

/// Reason the session can no longer upload media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// Transport connection state reached "disconnected"
    Disconnected,
    /// The producer's transport was closed underneath it
    TransportClosed,
    /// The capture track ended (e.g. device removal)
    TrackEnded,
}

impl AbortReason {
    /// Human-readable reason string reported to the subscriber
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected from server.",
            Self::TransportClosed => "Transport closed.",
            Self::TrackEnded => "Recording track ended.",
        }
    }
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
