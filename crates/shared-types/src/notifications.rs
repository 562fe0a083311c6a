//! # Registry Notifications
//!
//! The append-only notification log emitted by the registry engine after
//! every committed mutation. External listeners rebuild their view of the
//! registry from this stream alone.
//!
//! | Notification | Payload | Emitted when |
//! |---|---|---|
//! | `PublisherRegistered` | identity | `register_publisher` succeeds |
//! | `PublisherDeregistered` | identity | `deregister_publisher` completes, even if absent |
//! | `SellerAdded` | (publisher, seller key) | `add_seller` succeeds |
//! | `SellerRemoved` | (publisher, seller key) | `remove_seller` completes, even if absent |

use crate::entities::{Hash, Identity};
use serde::{Deserialize, Serialize};

/// A notification produced by a committed registry transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryNotification {
    /// A publisher record was created or overwritten.
    PublisherRegistered {
        /// The registered publisher identity.
        identity: Identity,
    },

    /// A publisher record was removed (or was already absent).
    PublisherDeregistered {
        /// The deregistered publisher identity.
        identity: Identity,
    },

    /// A seller record was created or overwritten.
    SellerAdded {
        /// The publisher that owns the record.
        publisher: Identity,
        /// `hash(seller_domain, seller_id)`.
        seller_key: Hash,
    },

    /// A seller record was removed (or was already absent).
    SellerRemoved {
        /// The publisher that owned the record.
        publisher: Identity,
        /// `hash(seller_domain, seller_id)`.
        seller_key: Hash,
    },
}

impl RegistryNotification {
    /// Stable notification name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PublisherRegistered { .. } => "PublisherRegistered",
            Self::PublisherDeregistered { .. } => "PublisherDeregistered",
            Self::SellerAdded { .. } => "SellerAdded",
            Self::SellerRemoved { .. } => "SellerRemoved",
        }
    }

    /// The publisher identity this notification concerns.
    #[must_use]
    pub const fn publisher(&self) -> Identity {
        match self {
            Self::PublisherRegistered { identity } | Self::PublisherDeregistered { identity } => {
                *identity
            }
            Self::SellerAdded { publisher, .. } | Self::SellerRemoved { publisher, .. } => {
                *publisher
            }
        }
    }

    /// True for notifications about the publisher table.
    #[must_use]
    pub const fn is_publisher_event(&self) -> bool {
        matches!(
            self,
            Self::PublisherRegistered { .. } | Self::PublisherDeregistered { .. }
        )
    }
}
