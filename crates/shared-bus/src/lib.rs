//! # Shared Bus - Registry Notification Channel
//!
//! The append-only outbound stream the registry publishes to after each
//! committed mutation. Listeners rebuild their view of the registry from it.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Registry Service │                    │ External Listener│
//! │                  │    publish()       │                  │
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! ## Guarantees
//!
//! - **Commit Order:** Events are published in the order mutations commit.
//! - **Decoupled Consumers:** The bus never calls back into the registry.
//! - **No Silent Gaps:** A subscriber that falls more than the channel
//!   capacity behind receives `SubscriptionError::Lagged` with the count.
//! - **Dead Letter Queue:** Commit failures are published on a DLQ topic.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, RegistryEvent};
pub use publisher::{BusStats, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Events retained per subscriber before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Dead Letter Queue topic for failed commits.
pub const DLQ_TOPIC: &str = "dlq.registry";
