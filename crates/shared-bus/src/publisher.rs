//! # Event Publisher
//!
//! The registry service is the only producer. Every committed, rejected or
//! failed call lands here in commit order and is fanned out to the current
//! subscribers; nothing is buffered for listeners that subscribe later.

use crate::events::{EventFilter, EventTopic, RegistryEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Sink side of the registry feed.
///
/// The registry service emits every committed notification through this
/// interface; listeners never call back into the engine.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event and return how many subscribers it reached.
    async fn publish(&self, event: RegistryEvent) -> usize;

    /// Total events published.
    fn events_published(&self) -> u64;
}

/// Per-topic delivery counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Publisher table notifications.
    pub publishers: u64,
    /// Seller table notifications.
    pub sellers: u64,
    /// Aborted calls.
    pub rejections: u64,
    /// Commit failures.
    pub critical: u64,
    /// Events published while nobody was subscribed.
    pub undelivered: u64,
}

impl BusStats {
    /// Total events published.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.publishers + self.sellers + self.rejections + self.critical
    }
}

#[derive(Default)]
struct TopicCounters {
    publishers: AtomicU64,
    sellers: AtomicU64,
    rejections: AtomicU64,
    critical: AtomicU64,
    undelivered: AtomicU64,
}

impl TopicCounters {
    fn record(&self, topic: EventTopic, delivered: bool) {
        let counter = match topic {
            EventTopic::Publishers => &self.publishers,
            EventTopic::Sellers => &self.sellers,
            EventTopic::Rejections => &self.rejections,
            EventTopic::DeadLetterQueue | EventTopic::All => &self.critical,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if !delivered {
            self.undelivered.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> BusStats {
        BusStats {
            publishers: self.publishers.load(Ordering::Relaxed),
            sellers: self.sellers.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            critical: self.critical.load(Ordering::Relaxed),
            undelivered: self.undelivered.load(Ordering::Relaxed),
        }
    }
}

/// Broadcast bus for a single registry host.
///
/// Each subscriber holds its own cursor into a ring of `capacity` events; a
/// subscriber that falls further behind is told how many it missed.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RegistryEvent>,
    counters: TopicCounters,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus retaining up to `capacity` undelivered events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `NodeConfig::validate` refuses that
    /// value before a bus is built.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            counters: TopicCounters::default(),
            capacity,
        }
    }

    /// Subscribe to events matching `filter`, starting with the next event
    /// published.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, publishers = filter.publishers.len(), "New subscription");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Subscribe and return the subscription as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Ring capacity per subscriber.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Delivery counters so far.
    #[must_use]
    pub fn stats(&self) -> BusStats {
        self.counters.snapshot()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: RegistryEvent) -> usize {
        let topic = event.topic();
        let publisher = event.publisher();

        match self.sender.send(event) {
            Ok(receivers) => {
                self.counters.record(topic, true);
                debug!(?topic, ?publisher, receivers, "Event published");
                receivers
            }
            Err(_) => {
                self.counters.record(topic, false);
                if topic == EventTopic::DeadLetterQueue {
                    warn!(?topic, "Critical event published with no listener");
                } else {
                    debug!(?topic, ?publisher, "Event published with no listener");
                }
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.counters.snapshot().total()
    }
}
