//! # Adapters Layer
//!
//! Implementations of the ports for in-process hosting and tests.

pub mod event_handler;
pub mod memory_committer;
pub mod notification_sink;

pub use event_handler::RegistryEventHandler;
pub use memory_committer::{CommittedHead, InMemoryCommitter};
pub use notification_sink::{BusNotificationSink, RecordingSink};
