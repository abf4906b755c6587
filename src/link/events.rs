//! Protocol events and the single-subscriber dispatcher
//!
//! The dispatcher forwards events produced by the link core to the one
//! currently registered subscriber:
//! - `subscribe()` hands out a fresh bounded channel and atomically
//!   replaces the previous subscriber (whose channel closes).
//! - Delivery is fire-and-forget: `try_send`, so a slow or gone
//!   subscriber never blocks the reader loop or a send call.
//! - Every event is tagged with the connection generation it belongs to;
//!   emissions from a superseded connection are dropped, so no stale
//!   event is deliverable once a newer connection's events have begun.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::trace;

/// Notification from the link core to the subscriber (UI layer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A connect attempt succeeded
    Connected { peer: String },
    /// A connect attempt failed; the link stays down
    ConnectFailed { peer: String },
    /// A frame arrived from the vehicle
    MessageReceived { text: String },
    /// A command was written to the vehicle
    MessageSent { text: String },
    /// The connection ended (requested, or transport failure)
    Disconnected,
}

/// Single-subscriber event channel with generation filtering
pub(crate) struct EventDispatcher {
    subscriber: Mutex<Option<mpsc::Sender<LinkEvent>>>,
    generation: AtomicU64,
    capacity: usize,
}

impl EventDispatcher {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            subscriber: Mutex::new(None),
            generation: AtomicU64::new(0),
            capacity,
        }
    }

    /// Register a new subscriber, replacing any previous one
    ///
    /// Replacement is atomic with respect to concurrent delivery: an event
    /// goes either to the old channel or to the new one, never to both.
    /// The previous subscriber's channel closes with no event history
    /// retained.
    pub(crate) fn subscribe(&self) -> mpsc::Receiver<LinkEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        *self.subscriber.lock() = Some(tx);
        rx
    }

    /// Generation of the connection currently allowed to emit
    pub(crate) fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Invalidate all outstanding producers and return the new generation
    pub(crate) fn advance_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Deliver an event produced under `generation`
    ///
    /// Dropped when the generation is stale (superseded connection) or
    /// when there is no subscriber / the subscriber's channel is full.
    pub(crate) fn emit(&self, generation: u64, event: LinkEvent) {
        // The lock also serializes emits from the reader loop and from
        // concurrent send calls, preserving production order.
        let subscriber = self.subscriber.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            trace!(generation, ?event, "dropping stale event");
            return;
        }
        if let Some(tx) = subscriber.as_ref() {
            let _ = tx.try_send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscriber() {
        let dispatcher = EventDispatcher::new(16);
        let mut rx = dispatcher.subscribe();
        let generation = dispatcher.advance_generation();

        dispatcher.emit(
            generation,
            LinkEvent::Connected {
                peer: "rover".into(),
            },
        );

        assert_eq!(
            rx.recv().await,
            Some(LinkEvent::Connected {
                peer: "rover".into()
            })
        );
    }

    #[tokio::test]
    async fn test_stale_generation_is_dropped() {
        let dispatcher = EventDispatcher::new(16);
        let mut rx = dispatcher.subscribe();

        let old = dispatcher.advance_generation();
        let current = dispatcher.advance_generation();

        dispatcher.emit(old, LinkEvent::Disconnected);
        dispatcher.emit(
            current,
            LinkEvent::Connected {
                peer: "rover".into(),
            },
        );

        // Only the current-generation event comes through
        assert_eq!(
            rx.recv().await,
            Some(LinkEvent::Connected {
                peer: "rover".into()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribe_replaces_previous_subscriber() {
        let dispatcher = EventDispatcher::new(16);
        let generation = dispatcher.advance_generation();

        let mut first = dispatcher.subscribe();
        let mut second = dispatcher.subscribe();

        dispatcher.emit(generation, LinkEvent::Disconnected);

        // Old channel closed, new one gets the event
        assert_eq!(first.recv().await, None);
        assert_eq!(second.recv().await, Some(LinkEvent::Disconnected));
    }

    #[tokio::test]
    async fn test_emit_without_subscriber_does_not_panic() {
        let dispatcher = EventDispatcher::new(16);
        let generation = dispatcher.advance_generation();
        dispatcher.emit(generation, LinkEvent::Disconnected);
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let dispatcher = EventDispatcher::new(16);
        let mut rx = dispatcher.subscribe();
        let generation = dispatcher.advance_generation();

        for text in ["DRIVE-2", "DRIVE-1", "HORN"] {
            dispatcher.emit(generation, LinkEvent::MessageSent { text: text.into() });
        }

        for text in ["DRIVE-2", "DRIVE-1", "HORN"] {
            assert_eq!(
                rx.recv().await,
                Some(LinkEvent::MessageSent { text: text.into() })
            );
        }
    }
}
