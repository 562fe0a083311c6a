//! # Notification Sink Adapters
//!
//! - `BusNotificationSink`: forwards to the shared event bus
//! - `RecordingSink`: append-only in-memory log

use crate::events::topics;
use crate::ports::outbound::NotificationSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{EventPublisher, EventTopic, RegistryEvent};
use shared_types::RegistryNotification;
use std::sync::Arc;
use tracing::debug;

/// Topic name for logging.
fn topic_name(topic: EventTopic) -> &'static str {
    match topic {
        EventTopic::Publishers => topics::PUBLISHERS,
        EventTopic::Sellers => topics::SELLERS,
        EventTopic::Rejections => topics::REJECTIONS,
        EventTopic::DeadLetterQueue | EventTopic::All => topics::DLQ,
    }
}

/// Publishes registry events onto an [`EventPublisher`].
pub struct BusNotificationSink<P: EventPublisher> {
    bus: Arc<P>,
}

impl<P: EventPublisher> BusNotificationSink<P> {
    /// Wrap a bus.
    pub fn new(bus: Arc<P>) -> Self {
        Self { bus }
    }

    /// The underlying bus.
    #[must_use]
    pub fn bus(&self) -> &Arc<P> {
        &self.bus
    }
}

#[async_trait]
impl<P: EventPublisher> NotificationSink for BusNotificationSink<P> {
    async fn publish(&self, event: RegistryEvent) {
        let topic = topic_name(event.topic());
        let receivers = self.bus.publish(event).await;
        debug!(topic, receivers, "Registry event forwarded to bus");
    }
}

/// Keeps every published event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingSink {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Only the committed notifications, in commit order.
    #[must_use]
    pub fn notifications(&self) -> Vec<RegistryNotification> {
        self.events
            .lock()
            .iter()
            .filter_map(RegistryEvent::notification)
            .copied()
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, event: RegistryEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    async fn publish(&self, event: RegistryEvent) {
        (**self).publish(event).await;
    }
}
