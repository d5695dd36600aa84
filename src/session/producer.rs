//! Producer lifecycle monitor
//!
//! Watches the two one-shot liveness signals of an outgoing track and
//! reports them on the abort bus. Both signals are terminal; no recovery
//! happens here.

use tracing::debug;

use crate::error::{ClientError, Result};
use crate::events::{AbortBus, AbortReason};
use crate::media::{MediaProducer, ProducerEvents};

/// Attach the lifecycle monitor to a freshly created producer
///
/// Fails if the producer's signals were already taken. The two signals are
/// watched independently, so either or both may reach the bus.
pub(crate) fn monitor<P: MediaProducer>(producer: &mut P, abort: AbortBus) -> Result<()> {
    let ProducerEvents { transport_closed, track_ended } = producer
        .events()
        .ok_or_else(|| ClientError::Media("producer lifecycle signals already taken".into()))?;

    let bus = abort.clone();
    tokio::spawn(async move {
        if transport_closed.await.is_ok() {
            bus.publish(AbortReason::TransportClosed);
        } else {
            debug!("transport-closed signal dropped without firing");
        }
    });

    tokio::spawn(async move {
        if track_ended.await.is_ok() {
            abort.publish(AbortReason::TrackEnded);
        } else {
            debug!("track-ended signal dropped without firing");
        }
    });

    Ok(())
}
