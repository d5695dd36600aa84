//! Media engine boundary
//!
//! The engine that owns device capabilities, ICE/DTLS transports and RTP
//! production is an external collaborator. This module pins down the
//! narrow interface the session orchestration needs from it: capability
//! loading, send-transport creation, the two one-shot negotiation
//! requests a transport raises while connecting, a recurring
//! connection-state signal, and producer liveness signals.
//!
//! Negotiation requests carry an owned reply handle resolved via
//! [`NegotiationReply::accept`] or [`NegotiationReply::reject`]; the
//! handle is consumed by either call, so each negotiation is answered at
//! most once by construction.


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::error::Result;
use crate::signaling::types::{
    DtlsParameters, MediaKind, RtpCapabilities, RtpParameters, TransportInfo,
};

/// Transport connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::New => write!(f, "new"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Failed => write!(f, "failed"),
            ConnectionState::Closed => write!(f, "closed"),
        }
    }
}

/// Local audio capture track handed to the transport for production
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    /// Engine-side track identifier
    pub id: String,
    /// Human-readable source label, if the engine has one
    pub label: Option<String>,
}

impl AudioTrack {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), label: None }
    }
}

/// One-shot reply handle for a pending transport negotiation
///
/// Accepting or rejecting consumes the handle; an unanswered handle that
/// is dropped resolves the engine side with a cancellation error.
#[derive(Debug)]
pub struct NegotiationReply<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> NegotiationReply<T> {
    /// Create a reply handle and the receiver the engine awaits
    pub fn channel() -> (Self, oneshot::Receiver<Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Acknowledge the pending negotiation
    pub fn accept(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Fail the pending negotiation with the signaling error
    pub fn reject(self, error: crate::error::ClientError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Negotiation request raised by the transport while it comes up
///
/// Each variant fires at most once per transport instance. Connect and
/// produce are independent negotiations and may be in flight at the same
/// time.
#[derive(Debug)]
pub enum TransportNegotiation {
    /// The transport needs its DTLS parameters registered with the server
    Connect {
        dtls_parameters: DtlsParameters,
        reply: NegotiationReply<()>,
    },
    /// The transport needs a server-side producer for an outgoing track;
    /// the accepted value is the server-assigned producer id
    Produce {
        kind: MediaKind,
        rtp_parameters: RtpParameters,
        reply: NegotiationReply<String>,
    },
}

/// Producer liveness signals, each fired at most once
#[derive(Debug)]
pub struct ProducerEvents {
    pub transport_closed: oneshot::Receiver<()>,
    pub track_ended: oneshot::Receiver<()>,
}

/// Capability-negotiation device, built once per session
#[async_trait]
pub trait MediaDevice: Send {
    type Transport: SendTransport;

    /// Load the device with the router's RTP capabilities
    async fn load(&mut self, router_rtp_capabilities: &RtpCapabilities) -> Result<()>;

    /// Whether the loaded device can produce the given media kind
    fn can_produce(&self, kind: MediaKind) -> bool;

    /// Create the send transport from connection parameters; no network
    /// activity happens here, negotiation is event-driven
    fn create_send_transport(&mut self, transport_info: &TransportInfo) -> Result<Self::Transport>;
}

/// Send-direction transport created from the device
#[async_trait]
pub trait SendTransport: Send + 'static {
    type Producer: MediaProducer;

    /// Take the negotiation request stream; `None` after the first take,
    /// which makes handler registration one-shot
    fn negotiations(&mut self) -> Option<mpsc::UnboundedReceiver<TransportNegotiation>>;

    /// Recurring connection-state signal
    fn connection_state(&self) -> watch::Receiver<ConnectionState>;

    /// Produce the track into a new producer; synchronously raises the
    /// one-shot produce negotiation and resolves with its accepted id
    async fn produce(&mut self, track: AudioTrack) -> Result<Self::Producer>;

    /// Close the transport; idempotent
    fn close(&mut self);
}

/// Outgoing media track bound to a transport
pub trait MediaProducer: Send + 'static {
    /// Server-assigned producer identifier
    fn id(&self) -> &str;

    /// Take the liveness signals; `None` after the first take
    fn events(&mut self) -> Option<ProducerEvents>;

    /// Close the producer; idempotent
    fn close(&mut self);
}
