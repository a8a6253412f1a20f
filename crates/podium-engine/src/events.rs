//! Engine event bus
//!
//! Fan-out channel between the engine and whatever notification layer is
//! listening. Publishing is synchronous and never fails the operation
//! that produced the event: a bus with no subscribers drops events, and
//! a slow subscriber lags on its own receiver without backpressure.

use tokio::sync::broadcast;
use tracing::trace;

use podium_core::EngineEvent;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` undelivered events per
    /// subscriber before the slowest one starts lagging
    pub fn new(capacity: usize) -> Self {
        // broadcast panics on zero capacity
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Open a subscription. Only events published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every current subscriber
    pub fn publish(&self, event: EngineEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(delivered) => {
                trace!(event_type, subscribers = delivered, "Event published");
            }
            Err(_) => {
                trace!(event_type, "Event dropped, no subscribers");
            }
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
