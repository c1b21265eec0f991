//! # Event Bus
//!
//! Fans committed registry events out to subscribers.
//!
//! Uses `tokio::sync::broadcast`, so a slow subscriber loses the oldest
//! events instead of blocking the writer. Subscribers that must not miss
//! anything can catch up from the service's event log by offset.

use crate::events::RecordedEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Maximum events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Topic filter for a subscription.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<&'static str>,
}

impl EventFilter {
    /// Accept every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only events on `topics`.
    #[must_use]
    pub fn topics(topics: Vec<&'static str>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, recorded: &RecordedEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&recorded.event.topic())
    }
}

/// A subscription handle for receiving events.
pub struct Subscription {
    receiver: broadcast::Receiver<RecordedEvent>,
    filter: EventFilter,
}

impl Subscription {
    /// Receive the next matching event; `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<RecordedEvent> {
        loop {
            let recorded = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&recorded) {
                return Some(recorded);
            }
        }
    }

    /// Receive the next matching event without waiting.
    pub fn try_recv(&mut self) -> Option<RecordedEvent> {
        loop {
            let recorded = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            };

            if self.filter.matches(&recorded) {
                return Some(recorded);
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

/// In-memory implementation of the event bus.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RecordedEvent>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Publish one event; returns the number of receivers.
    pub fn publish(&self, recorded: RecordedEvent) -> usize {
        let topic = recorded.event.topic();
        let offset = recorded.offset;
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(recorded) {
            Ok(receivers) => {
                debug!(topic, offset, receivers, "Event published");
                receivers
            }
            Err(_) => {
                // No receivers; the event log still holds it
                debug!(topic, offset, "Event not delivered (no subscribers)");
                0
            }
        }
    }

    /// Publish a batch in order.
    pub fn publish_all(&self, batch: &[RecordedEvent]) {
        for recorded in batch {
            self.publish(recorded.clone());
        }
        if batch.len() > self.capacity {
            warn!(
                batch = batch.len(),
                capacity = self.capacity,
                "Batch larger than channel capacity, slow subscribers will lag"
            );
        }
    }

    /// Subscribe to events matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    /// Total events published.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}
