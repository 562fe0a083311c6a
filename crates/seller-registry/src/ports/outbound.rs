//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the registry service depends on.
//! The host ledger implements them to provide:
//! - Durable commit of each new state
//! - Delivery of notifications to external listeners

use crate::domain::entities::RegistryState;
use crate::errors::CommitError;
use async_trait::async_trait;
use shared_bus::RegistryEvent;

// =============================================================================
// STATE COMMIT (Host Ledger Dependency)
// =============================================================================

/// Interface for durably committing a new registry state.
///
/// The service calls `commit` with the complete post-transition state. If it
/// returns `Err`, the transition is discarded: readers keep seeing the
/// previous snapshot and no notification is emitted.
#[async_trait]
pub trait StateCommitter: Send + Sync {
    /// Commit `state` as the new head.
    async fn commit(&self, state: &RegistryState) -> Result<(), CommitError>;
}

// =============================================================================
// NOTIFICATION SINK
// =============================================================================

/// Append-only outbound notification channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Publish an event; delivery is best-effort and never fails the caller.
    async fn publish(&self, event: RegistryEvent);
}
