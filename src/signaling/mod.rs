//! Signaling channel to the media server
//!
//! Out-of-band request/response calls against a session-scoped endpoint:
//! session initialization, transport negotiation round-trips, and the
//! record start/ping/stop workflow.

pub mod client;
pub mod types;

pub use client::{PingGuard, Signaler, SESSION_TOKEN_HEADER};
pub use types::{
    ConnectRequest, DtlsParameters, IceServer, IceTransportPolicy, InitializeResponse, MediaKind,
    ProduceRequest, ProduceResponse, RecordStartRequest, RecordStartResponse, RtpCapabilities,
    RtpParameters, TransportInfo,
};
