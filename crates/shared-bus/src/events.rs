//! # Registry Events
//!
//! Defines all event types that flow through the shared bus.
//! Committed notifications wrap `shared_types::RegistryNotification`.

use serde::{Deserialize, Serialize};
use shared_types::{Identity, RegistryNotification};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    // =========================================================================
    // COMMITTED TRANSITIONS
    // =========================================================================
    /// A mutation was committed and produced a notification.
    Committed {
        /// Ledger sequence of the call, when it arrived through an envelope.
        sequence: Option<u64>,
        /// State version after the commit.
        state_version: u64,
        /// The notification itself.
        notification: RegistryNotification,
    },

    // =========================================================================
    // REJECTIONS
    // =========================================================================
    /// A mutation was aborted before touching state.
    Rejected {
        /// The caller whose call was aborted.
        caller: Identity,
        /// Ledger sequence of the call, if any.
        sequence: Option<u64>,
        /// Human readable reason.
        reason: String,
    },

    // =========================================================================
    // CRITICAL EVENTS (DLQ)
    // =========================================================================
    /// The commit mechanism failed; operator attention required.
    CriticalError {
        /// Error description.
        error: String,
    },
}

impl RegistryEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Committed { notification, .. } if notification.is_publisher_event() => {
                EventTopic::Publishers
            }
            Self::Committed { .. } => EventTopic::Sellers,
            Self::Rejected { .. } => EventTopic::Rejections,
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }

    /// The publisher identity the event concerns, if any.
    #[must_use]
    pub fn publisher(&self) -> Option<Identity> {
        match self {
            Self::Committed { notification, .. } => Some(notification.publisher()),
            Self::Rejected { caller, .. } => Some(*caller),
            Self::CriticalError { .. } => None,
        }
    }

    /// The committed notification, if this event carries one.
    #[must_use]
    pub fn notification(&self) -> Option<&RegistryNotification> {
        match self {
            Self::Committed { notification, .. } => Some(notification),
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Publisher table changes.
    Publishers,
    /// Seller table changes.
    Sellers,
    /// Aborted calls.
    Rejections,
    /// Dead Letter Queue for commit failures.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Publisher identities to include. Empty means all publishers.
    pub publishers: Vec<Identity>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            publishers: Vec::new(),
        }
    }

    /// Create a filter for events concerning specific publishers.
    #[must_use]
    pub fn for_publishers(publishers: Vec<Identity>) -> Self {
        Self {
            topics: Vec::new(),
            publishers,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let publisher_match = self.publishers.is_empty()
            || event
                .publisher()
                .is_some_and(|p| self.publishers.contains(&p));

        topic_match && publisher_match
    }
}
