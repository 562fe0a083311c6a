//! # Event Schema
//!
//! Request/response payloads exchanged with the host ledger, and the bus
//! topics the registry publishes on.
//!
//! ## Identity
//!
//! Mutations arrive as `LedgerEnvelope<RegistryCommand>`: the caller lives in
//! the envelope, never in the payload.

use crate::domain::entities::{SellerInterchange, Transition};
use crate::domain::value_objects::Identity;
use serde::{Deserialize, Serialize};
use shared_types::RegistryNotification;
use uuid::Uuid;

pub use crate::domain::engine::RegistryCommand;

// =============================================================================
// RECEIPTS
// =============================================================================

/// Outcome of a submitted envelope, recorded by the ledger as a receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionReceipt {
    /// Correlation id of the envelope.
    pub correlation_id: Uuid,
    /// Ledger sequence of the envelope.
    pub sequence: u64,
    /// Whether the call committed a change.
    pub applied: bool,
    /// The emitted notification, if any.
    pub notification: Option<RegistryNotification>,
    /// Abort reason, if the call was rejected.
    pub error: Option<String>,
}

impl TransitionReceipt {
    /// Receipt for a call that did not abort.
    #[must_use]
    pub fn completed(correlation_id: Uuid, sequence: u64, transition: &Transition) -> Self {
        Self {
            correlation_id,
            sequence,
            applied: transition.is_applied(),
            notification: transition.notification(),
            error: None,
        }
    }

    /// Receipt for an aborted call.
    #[must_use]
    pub fn rejected(correlation_id: Uuid, sequence: u64, error: impl ToString) -> Self {
        Self {
            correlation_id,
            sequence,
            applied: false,
            notification: None,
            error: Some(error.to_string()),
        }
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Seller lookup, addressed either by identity or by publisher domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherRef {
    /// Look up directly under an identity.
    Identity(Identity),
    /// Resolve through the domain index first.
    Domain(String),
}

/// Request for a seller record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerLookupRequest {
    /// Which publisher's table to read.
    pub publisher: PublisherRef,
    /// Advertising system domain.
    pub seller_domain: String,
    /// Seller account id.
    pub seller_id: String,
}

/// Response carrying the record in interchange form.
///
/// A default-valued record means "absent".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerLookupResponse {
    /// The record (relationship as ordinal).
    pub record: SellerInterchange,
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Event topics for the registry.
pub mod topics {
    /// Topic for publisher table notifications.
    pub const PUBLISHERS: &str = "registry.publishers";

    /// Topic for seller table notifications.
    pub const SELLERS: &str = "registry.sellers";

    /// Topic for aborted calls.
    pub const REJECTIONS: &str = "registry.rejections";

    /// Dead letter queue for failed commits.
    pub const DLQ: &str = shared_bus::DLQ_TOPIC;
}
