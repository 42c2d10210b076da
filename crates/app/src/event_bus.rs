//! In-process event bus backed by a tokio broadcast channel.
//!
//! The bus is bounded and fan-out: every subscriber sees the full stream
//! independently. Publication never blocks — when a subscriber falls behind
//! by more than the capacity, the channel evicts that subscriber's oldest
//! events (drop-oldest; stale alerts are worse than missing intermediate
//! ones) and the loss surfaces in-stream as an `EventsDropped` marker.
//!
//! Ordering: total order per producer. Interleaving across distinct
//! producers is not guaranteed.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use manostat_domain::event::{Event, EventKind};

use crate::ports::EventPublisher;

/// Bounded, ordered, multi-producer fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus holding at most `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register an independent consumer.
    ///
    /// The subscriber receives every event published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber {
        Subscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: Event) {
        // send fails only when there are zero receivers, which is fine —
        // the event is simply dropped.
        let _ = self.sender.send(event);
    }
}

/// One consumer's view of the bus.
pub struct Subscriber {
    receiver: broadcast::Receiver<Event>,
}

impl Subscriber {
    /// Return everything currently buffered, in order, without blocking.
    ///
    /// If the bus evicted events because this consumer lagged, an
    /// [`EventKind::EventsDropped`] marker is inserted at the point of loss
    /// so the consumer can flag staleness.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(count)) => {
                    events.push(Event::new(EventKind::EventsDropped { count }));
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once all publishers are gone and the buffer is empty.
    /// A lag is reported the same way as in [`drain`](Self::drain).
    pub async fn next(&mut self) -> Option<Event> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(count)) => {
                Some(Event::new(EventKind::EventsDropped { count }))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
