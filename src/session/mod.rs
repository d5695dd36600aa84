//! Session orchestration
//!
//! Drives the strict creation chain (initialize, device, transport,
//! producer, recording) and owns the abort notification channel. The
//! chain never retries: a failure at any stage fails that stage's caller
//! and the session is expected to be torn down.

pub mod producer;
pub mod transport;

use serde_json::json;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::SessionConfig;
use crate::error::{ClientError, Result};
use crate::events::{AbortBus, AbortReason};
use crate::media::{AudioTrack, MediaDevice, MediaProducer, SendTransport};
use crate::signaling::types::{
    InitializeResponse, MediaKind, RecordStartRequest, RecordStartResponse, RtpCapabilities,
    TransportInfo,
};
use crate::signaling::{PingGuard, Signaler};

/// Capabilities and connection parameters produced by initialization
#[derive(Debug, Clone)]
pub struct SessionSetup {
    pub router_rtp_capabilities: RtpCapabilities,
    /// Transport parameters with the caller's ICE override applied
    pub transport_info: TransportInfo,
}

/// Live recording: the server-side id plus the keepalive handle
#[derive(Debug)]
pub struct RecordingHandle {
    id: String,
    ping: PingGuard,
}

impl RecordingHandle {
    /// Server-issued recording identifier
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Orchestrates one media-upload session
///
/// Owns the signaler, the configuration and the abort bus. Abort policy
/// stays with the caller: subscribe via [`SessionController::abort_events`]
/// and decide what teardown means.
pub struct SessionController {
    signaler: Signaler,
    config: SessionConfig,
    abort: AbortBus,
}

impl SessionController {
    pub fn new(signaler: Signaler, config: SessionConfig) -> Self {
        Self {
            signaler,
            config,
            abort: AbortBus::new(),
        }
    }

    /// Subscribe to abort notifications for this session
    pub fn abort_events(&self) -> broadcast::Receiver<AbortReason> {
        self.abort.subscribe()
    }

    pub fn signaler(&self) -> &Signaler {
        &self.signaler
    }

    /// Initialize the session
    ///
    /// Rebinds the signaler to the returned routing address, attaches the
    /// session credential, and applies the caller's ICE override: a
    /// supplied server list (even an empty one) replaces the server's,
    /// and the configured transport policy always wins.
    pub async fn initialize(&self, auth: serde_json::Value) -> Result<SessionSetup> {
        let auth = if auth.is_null() { json!({}) } else { auth };
        let response: InitializeResponse = self.signaler.post("/initialize", &auth).await?;

        self.signaler.bind_session(&response.fqdn, &response.session_token);

        let mut transport_info = response.transport_info;
        if let Some(servers) = &self.config.ice_servers {
            transport_info.ice_servers = servers.clone();
        }
        transport_info.ice_transport_policy = self.config.ice_transport_policy;

        info!(fqdn = %response.fqdn, policy = %transport_info.ice_transport_policy, "session initialized");
        Ok(SessionSetup {
            router_rtp_capabilities: response.router_rtp_capabilities,
            transport_info,
        })
    }

    /// Load the device and check the audio precondition
    ///
    /// Runs before any transport work; a device that cannot produce audio
    /// fails the whole session with [`ClientError::MediaUnsupported`].
    pub async fn prepare_device<D: MediaDevice>(
        &self,
        device: &mut D,
        router_rtp_capabilities: &RtpCapabilities,
    ) -> Result<()> {
        device.load(router_rtp_capabilities).await?;
        if !device.can_produce(MediaKind::Audio) {
            return Err(ClientError::MediaUnsupported(MediaKind::Audio));
        }
        Ok(())
    }

    /// Create the send transport; no network activity happens here
    pub fn create_transport<D: MediaDevice>(
        &self,
        device: &mut D,
        transport_info: &TransportInfo,
    ) -> Result<D::Transport> {
        device.create_send_transport(transport_info)
    }

    /// Attach the negotiation bridge and disconnect watcher
    ///
    /// Must run before [`SessionController::create_producer`] so the
    /// in-band negotiation requests find a handler.
    pub fn wire_transport<T: SendTransport>(&self, transport: &mut T) -> Result<()> {
        transport::wire(transport, self.signaler.clone(), self.abort.clone())
    }

    /// Produce the audio track; raises the one-shot produce negotiation
    pub async fn create_producer<T: SendTransport>(
        &self,
        transport: &mut T,
        track: AudioTrack,
    ) -> Result<T::Producer> {
        let producer = transport.produce(track).await?;
        info!(producer_id = %producer.id(), "producer created");
        Ok(producer)
    }

    /// Attach the producer lifecycle monitor
    pub fn wire_producer<P: MediaProducer>(&self, producer: &mut P) -> Result<()> {
        producer::monitor(producer, self.abort.clone())
    }

    /// Start recording the producer's track
    ///
    /// Returns the recording id together with the keepalive guard; the
    /// keepalive pings at the configured interval until stopped.
    pub async fn start_recording(&self, producer_id: &str) -> Result<RecordingHandle> {
        let request = RecordStartRequest { producer_id: producer_id.to_string() };
        let response: RecordStartResponse = self.signaler.post("/record/start", &request).await?;
        let ping = self.signaler.start_ping(self.config.ping_interval());

        info!(recording_id = %response.id, "recording started");
        Ok(RecordingHandle { id: response.id, ping })
    }

    /// Stop recording
    ///
    /// Cancels the keepalive first, then issues the stop call; no ping may
    /// start once the recording is being torn down.
    pub async fn stop_recording(&self, recording: RecordingHandle) -> Result<()> {
        recording.ping.cancel();
        self.signaler.post_ok("/record/stop", &json!({})).await?;
        info!(recording_id = %recording.id, "recording stopped");
        Ok(())
    }

    /// Tear down the media path: producer first, then its transport
    pub fn close_transport<P: MediaProducer, T: SendTransport>(
        &self,
        producer: &mut P,
        transport: &mut T,
    ) {
        producer.close();
        transport.close();
        info!("transport closed");
    }

    /// Run the whole setup chain and start recording
    ///
    /// Convenience wrapper over the individual steps; returns the live
    /// transport, producer and recording handle. The caller keeps abort
    /// handling and teardown.
    pub async fn start<D: MediaDevice>(
        &self,
        device: &mut D,
        track: AudioTrack,
        auth: serde_json::Value,
    ) -> Result<(D::Transport, <D::Transport as SendTransport>::Producer, RecordingHandle)> {
        let setup = self.initialize(auth).await?;
        self.prepare_device(device, &setup.router_rtp_capabilities).await?;

        let mut transport = self.create_transport(device, &setup.transport_info)?;
        self.wire_transport(&mut transport)?;

        let mut producer = self.create_producer(&mut transport, track).await?;
        self.wire_producer(&mut producer)?;

        let recording = self.start_recording(producer.id()).await?;
        Ok((transport, producer, recording))
    }
}
