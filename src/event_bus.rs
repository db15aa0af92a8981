//! Event delivery for bootstrap observers.
//!
//! The orchestrator signals phase completion and final disposition through an
//! `EventBus`. Delivery is broadcast: every subscriber sees every event, and
//! emitting with no subscribers is a no-op, which keeps the signaling
//! fire-and-forget as far as the reconstruction pipeline is concerned.

use thiserror::Error;
use tokio::sync::broadcast;

/// Event-related errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Bus receiver failed: {0}")]
    ReceiveFailure(String),
}

type Result<T> = std::result::Result<T, Error>;

/// Broadcast bus carrying bootstrap events to any number of subscribers.
///
/// Built on tokio's broadcast channel. Late subscribers do not receive past
/// events; subscribe before starting the run to observe all phases.
#[derive(Debug, Clone)]
pub struct EventBus<T: Clone> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> EventBus<T> {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Capacity bounds how many events a slow subscriber can fall behind
    /// before it starts missing events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
        }
    }

    /// Create a new subscriber.
    pub fn subscribe(&self) -> EventReceiver<T> {
        EventReceiver::new(self.sender.subscribe())
    }

    /// Emit an event to all current subscribers.
    ///
    /// Having no subscribers is not an error.
    pub fn emit(&self, event: T) {
        let _ = self.sender.send(event);
    }
}

/// Receiving half of an [`EventBus`] subscription.
#[derive(Debug)]
pub struct EventReceiver<T: Clone> {
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> EventReceiver<T> {
    fn new(receiver: broadcast::Receiver<T>) -> Self {
        Self {
            receiver,
        }
    }

    /// Receive the next event, waiting if none is buffered.
    pub async fn recv(&mut self) -> Result<T> {
        match self.receiver.recv().await {
            Ok(event) => Ok(event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                Err(Error::ReceiveFailure(format!("lagged {} events", n)))
            }
            Err(broadcast::error::RecvError::Closed) => {
                Err(Error::ReceiveFailure("event bus closed".to_string()))
            }
        }
    }

    /// Receive the next event without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}
