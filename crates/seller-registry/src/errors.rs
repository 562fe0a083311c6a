//! # Error Types
//!
//! All error types for the registry engine and its service layer.

use crate::domain::invariants::InvariantViolation;
use crate::domain::value_objects::Identity;
use thiserror::Error;

// =============================================================================
// ENGINE ERRORS
// =============================================================================

/// Aborts raised by the state-transition engine.
///
/// Every variant is raised before any store is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Register/deregister from anyone but the administrator.
    #[error("caller {caller} is not the registry administrator")]
    NotAdministrator { caller: Identity },

    /// Seller mutation from an unregistered identity (strict policy only).
    #[error("caller {caller} is not a registered publisher")]
    PublisherNotRegistered { caller: Identity },

    /// Domain is still claimed by another registered publisher.
    #[error("domain {domain:?} is already claimed by {owner}")]
    DomainClaimed { domain: String, owner: Identity },

    /// Registration arguments are unusable.
    #[error("invalid publisher: {reason}")]
    InvalidPublisher { reason: String },

    /// Seller arguments are unusable.
    #[error("invalid seller: {reason}")]
    InvalidSeller { reason: String },
}

impl RegistryError {
    /// Returns true for permission failures (as opposed to bad input).
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            Self::NotAdministrator { .. } | Self::PublisherNotRegistered { .. }
        )
    }
}

// =============================================================================
// COMMIT ERRORS
// =============================================================================

/// Failures of the host ledger's commit mechanism.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// The ledger refused the new state.
    #[error("commit rejected: {0}")]
    Rejected(String),

    /// The ledger could not be reached.
    #[error("commit backend unavailable")]
    Unavailable,
}

// =============================================================================
// RESTORE ERRORS
// =============================================================================

/// A committed head that cannot be resumed from.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The bytes are not an encoded registry state.
    #[error("committed head does not decode: {0}")]
    Decode(#[from] bincode::Error),

    /// The decoded stores are not reachable through the engine's operations
    /// under the requested configuration.
    #[error("committed head is inconsistent: {} violation(s)", .0.len())]
    Inconsistent(Vec<InvariantViolation>),
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors returned by the registry service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The engine aborted the call.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Commit failed; the call had no visible effect.
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Envelope sequence did not strictly increase.
    #[error("stale sequence: received {received}, expected greater than {last}")]
    StaleSequence { received: u64, last: u64 },

    /// Envelope version is not supported.
    #[error("unsupported envelope version: received {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },
}

// =============================================================================
// TESTS
// =============================================================================
