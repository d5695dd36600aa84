//! Abort notification channel
//!
//! Transport-level disconnection and producer liveness failures are
//! reported through a single bus rather than as errors, so the low-level
//! signal sources stay decoupled from the teardown policy that reacts to
//! them.

pub mod types;

pub use types::AbortReason;

use tokio::sync::broadcast;
use tracing::warn;

/// Abort channel capacity (ring buffer size)
const ABORT_CHANNEL_CAPACITY: usize = 16;

/// Broadcast bus carrying session abort notifications
///
/// Cloning the bus shares the underlying channel; the orchestrator hands
/// clones to the transport and producer watchers and the caller subscribes
/// once.
///
/// # Example
///
/// ```no_run
/// use reclink::events::{AbortBus, AbortReason};
///
/// let bus = AbortBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(AbortReason::Disconnected);
///
/// tokio::spawn(async move {
///     while let Ok(reason) = rx.recv().await {
///         eprintln!("session aborted: {reason}");
///     }
/// });
/// ```
#[derive(Clone)]
pub struct AbortBus {
    tx: broadcast::Sender<AbortReason>,
}

impl AbortBus {
    /// Create a new abort bus
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(ABORT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an abort notification to all subscribers
    ///
    /// If there are no active subscribers the notification is dropped;
    /// aborts are fire-and-forget.
    pub fn publish(&self, reason: AbortReason) {
        warn!(%reason, "session abort");
        let _ = self.tx.send(reason);
    }

    /// Subscribe to abort notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AbortReason> {
        self.tx.subscribe()
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AbortBus {
    fn default() -> Self {
        Self::new()
    }
}
