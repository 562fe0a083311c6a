//! # `LedgerEnvelope` Wrapper
//!
//! The wrapper the host ledger uses to hand an ordered call to the registry.
//!
//! ## Properties
//!
//! - **Total Order**: `sequence` is assigned by the ledger's ordering layer.
//!   Consumers reject any sequence that does not strictly increase.
//! - **Explicit Caller**: `caller` is the sole source of truth for identity.
//!   Payloads MUST NOT carry a redundant caller field.
//! - **Correlation**: `correlation_id` ties receipts back to submissions.

use crate::entities::Identity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered call delivered by the host ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEnvelope<T> {
    /// Protocol version for forward compatibility.
    #[serde(default = "default_version")]
    pub version: u16,

    /// Position of this call in the ledger's total order.
    pub sequence: u64,

    /// The identity that signed the call.
    pub caller: Identity,

    /// Identifier for correlating receipts with submissions.
    #[serde(default = "Uuid::new_v4")]
    pub correlation_id: Uuid,

    /// The call itself.
    pub payload: T,
}

fn default_version() -> u16 {
    1
}

impl<T> LedgerEnvelope<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Wrap a payload with a fresh correlation id.
    pub fn new(sequence: u64, caller: Identity, payload: T) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            sequence,
            caller,
            correlation_id: Uuid::new_v4(),
            payload,
        }
    }

    /// Returns true if this envelope uses a supported protocol version.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}
