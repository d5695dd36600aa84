//! Transport negotiation bridge
//!
//! Translates the transport's in-band negotiation requests into signaling
//! round-trips and surfaces transport-level disconnection on the abort
//! bus. Each negotiation kind is honored at most once per transport; a
//! duplicate request is rejected so the engine never hangs on an
//! unanswered reply.

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::events::{AbortBus, AbortReason};
use crate::media::{ConnectionState, SendTransport, TransportNegotiation};
use crate::signaling::types::{ConnectRequest, ProduceRequest, ProduceResponse};
use crate::signaling::Signaler;

/// Attach the negotiation bridge and the disconnect watcher
///
/// Must run before any media is produced so the produce negotiation finds
/// its handler. Fails if the transport's negotiation stream was already
/// taken.
pub(crate) fn wire<T: SendTransport>(
    transport: &mut T,
    signaler: Signaler,
    abort: AbortBus,
) -> Result<()> {
    let negotiations = transport
        .negotiations()
        .ok_or_else(|| ClientError::Media("transport negotiation stream already taken".into()))?;
    spawn_negotiation_bridge(negotiations, signaler);
    spawn_state_watcher(transport.connection_state(), abort);
    Ok(())
}

fn spawn_negotiation_bridge(
    mut requests: mpsc::UnboundedReceiver<TransportNegotiation>,
    signaler: Signaler,
) {
    tokio::spawn(async move {
        let mut connect_handled = false;
        let mut produce_handled = false;

        // Connect and produce are independent negotiations; each dispatch
        // runs in its own task so one slow or failing call cannot block
        // the other.
        while let Some(request) = requests.recv().await {
            match request {
                TransportNegotiation::Connect { dtls_parameters, reply } => {
                    if connect_handled {
                        warn!("duplicate connect negotiation ignored");
                        reply.reject(ClientError::Media(
                            "connect negotiation already handled".into(),
                        ));
                        continue;
                    }
                    connect_handled = true;

                    let signaler = signaler.clone();
                    tokio::spawn(async move {
                        let request = ConnectRequest { dtls_parameters };
                        match signaler.post_ok("/transport/connect", &request).await {
                            Ok(()) => {
                                debug!("transport connect acknowledged");
                                reply.accept(());
                            }
                            Err(error) => {
                                warn!(%error, "transport connect failed");
                                reply.reject(error);
                            }
                        }
                    });
                }
                TransportNegotiation::Produce { kind, rtp_parameters, reply } => {
                    if produce_handled {
                        warn!("duplicate produce negotiation ignored");
                        reply.reject(ClientError::Media(
                            "produce negotiation already handled".into(),
                        ));
                        continue;
                    }
                    produce_handled = true;

                    let signaler = signaler.clone();
                    tokio::spawn(async move {
                        let request = ProduceRequest { kind, rtp_parameters };
                        match signaler
                            .post::<_, ProduceResponse>("/transport/produce", &request)
                            .await
                        {
                            Ok(response) => {
                                debug!(producer_id = %response.id, "producer registered");
                                reply.accept(response.id);
                            }
                            Err(error) => {
                                warn!(%error, "producer registration failed");
                                reply.reject(error);
                            }
                        }
                    });
                }
            }
        }
        debug!("transport negotiation stream closed");
    });
}

fn spawn_state_watcher(mut state: watch::Receiver<ConnectionState>, abort: AbortBus) {
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = *state.borrow();
            debug!(state = %current, "transport connection state changed");
            if current == ConnectionState::Disconnected {
                abort.publish(AbortReason::Disconnected);
            }
        }
    });
}
