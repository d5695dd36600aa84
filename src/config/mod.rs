//! Session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::signaling::types::{IceServer, IceTransportPolicy};

/// Default keepalive cadence while a recording is live
fn default_ping_interval_ms() -> u64 {
    5_000
}

/// Caller-supplied session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// ICE server override. `None` keeps the server-provided list;
    /// `Some(vec![])` is a valid override forcing an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice_servers: Option<Vec<IceServer>>,

    /// ICE transport policy, always applied over the server default
    #[serde(default)]
    pub ice_transport_policy: IceTransportPolicy,

    /// Interval between recording keepalive pings, in milliseconds
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
}

impl SessionConfig {
    pub fn ping_interval(&self) -> Duration {
        // interval(0) panics in tokio
        Duration::from_millis(self.ping_interval_ms.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ice_servers: None,
            ice_transport_policy: IceTransportPolicy::default(),
            ping_interval_ms: default_ping_interval_ms(),
        }
    }
}
