//! Signaling payload types
//!
//! JSON shapes for the session-scoped signaling endpoint. Capability and
//! parameter blobs are negotiated between the server and the media engine;
//! this client carries them opaquely and only gives names to the fields it
//! actually reads or rewrites.

use serde::{Deserialize, Serialize};

/// Media kind of an outgoing track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Router RTP capability descriptor, consumed by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RtpCapabilities(pub serde_json::Value);

/// Local DTLS parameters supplied by the transport during connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DtlsParameters(pub serde_json::Value);

/// RTP parameters supplied by the transport during produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RtpParameters(pub serde_json::Value);

/// ICE server entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServer {
    /// Server URLs (e.g. ["turn:turn.example.com:3478?transport=udp"])
    pub urls: Vec<String>,
    /// Username for TURN authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Credential for TURN authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// Create an IceServer with a single URL and no credentials
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// ICE transport policy applied to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceTransportPolicy {
    /// Use all candidate types
    #[default]
    All,
    /// Use relay candidates only
    Relay,
}

impl std::fmt::Display for IceTransportPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IceTransportPolicy::All => write!(f, "all"),
            IceTransportPolicy::Relay => write!(f, "relay"),
        }
    }
}

/// Connection parameters for the send transport
///
/// `ice_servers` and `ice_transport_policy` are the two fields the session
/// rewrites after initialization; everything else (ICE candidates, DTLS
/// fingerprints, transport id) passes through untouched in `connection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInfo {
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
    #[serde(default)]
    pub ice_transport_policy: IceTransportPolicy,
    #[serde(flatten)]
    pub connection: serde_json::Map<String, serde_json::Value>,
}

/// Response to `POST /initialize`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    /// Routing address for all subsequent calls
    pub fqdn: String,
    /// Session credential, attached as `X-Session-Token` from now on
    pub session_token: String,
    pub router_rtp_capabilities: RtpCapabilities,
    pub transport_info: TransportInfo,
}

/// Request body for `POST /transport/connect`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub dtls_parameters: DtlsParameters,
}

/// Request body for `POST /transport/produce`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProduceRequest {
    pub kind: MediaKind,
    pub rtp_parameters: RtpParameters,
}

/// Response to `POST /transport/produce`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProduceResponse {
    /// Server-side producer identifier
    pub id: String,
}

/// Request body for `POST /record/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStartRequest {
    pub producer_id: String,
}

/// Response to `POST /record/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordStartResponse {
    /// Recording identifier
    pub id: String,
}
