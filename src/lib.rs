//! reclink - real-time audio recording uplink client
//!
//! Orchestrates the lifecycle of a single media-upload session: session
//! initialization over a signaling endpoint, send-transport negotiation
//! against a media engine, audio production, and a start/stop recording
//! workflow with a cancellable keepalive. The media engine itself is an
//! external collaborator behind the traits in [`media`].

pub mod config;
pub mod error;
pub mod events;
pub mod media;
pub mod session;
pub mod signaling;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::SessionConfig;
pub use error::{ClientError, Result};
pub use events::{AbortBus, AbortReason};
pub use media::{AudioTrack, ConnectionState, MediaDevice, MediaProducer, SendTransport};
pub use session::{RecordingHandle, SessionController, SessionSetup};
pub use signaling::{IceServer, IceTransportPolicy, Signaler};
