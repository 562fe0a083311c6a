//! # Seller Registry - Authorized Seller State Machine
//!
//! **Role:** Permissioned publisher/seller registry hosted by a replicated ledger
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Lets publishers declare which advertising sellers are authorized to sell
//! their inventory, in the shape of an `ads.txt` line, and lets anyone query
//! those declarations. A single administrator curates the publisher table;
//! each publisher curates its own seller table.
//!
//! ## Stores
//!
//! | Store | Key | Value |
//! |-------|-----|-------|
//! | Publishers | `Identity` | `Publisher { identity, domain, name }` |
//! | Domain index | `keccak256(domain)` | `Identity` |
//! | Sellers | `Identity` → `seller_key(domain, id)` | `SellerRecord` |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Administrator fixed at creation | `domain/entities.rs` - no setter on `RegistryState` |
//! | Only the administrator mutates publishers | `domain/engine.rs` - `ensure_administrator()` |
//! | A publisher only mutates its own sellers | `domain/engine.rs` - caller is the table key |
//! | Aborts leave every store unchanged | `domain/engine.rs` - checks precede writes |
//! | Registered domains are indexed | `domain/invariants.rs` - `check_domain_index_invariant()` |
//! | No index entry for an unregistered identity | `domain/invariants.rs` - `check_no_orphan_index_entries()` |
//! | Commit before visibility | `service.rs` - snapshot swapped after `commit()` |
//! | State only enters through the engine or a checked restore | `domain/entities.rs` - `RegistryState::restore()` |
//!
//! ## Compatibility Modes
//!
//! | Switch | Default | `RegistryConfig::legacy()` |
//! |--------|---------|----------------------------|
//! | `unregistered_seller_policy` | `Reject` | `Ignore` |
//! | `reindex_on_domain_change` | on | off |
//! | `guard_domain_index` | on | off |
//! | `exclusive_domains` | on | off |
//! | `validate_inputs` | on | off |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `StateCommitter` | Durable commit of each new state |
//! | `NotificationSink` | Delivery of committed notifications |
//!
//! ## Usage Example
//!
//! ```ignore
//! use seller_registry::prelude::*;
//!
//! let service = RegistryService::new(admin, InMemoryCommitter::new(), RecordingSink::new(),
//!     ServiceConfig::default());
//! service.register_publisher(admin, publisher, "example.com".into(), "Example".into()).await?;
//! service.add_seller(publisher, "ssp.com".into(), "1".into(), Relationship::Direct,
//!     String::new()).await?;
//!
//! let record = service.get_seller_for_publisher_domain("example.com", "ssp.com", "1");
//! assert!(!record.is_absent());
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Publisher, RegistryConfig, RegistryState, SellerInterchange, SellerPolicy, SellerRecord,
        Transition,
    };

    // Value objects
    pub use crate::domain::value_objects::{DomainHash, Hash, Identity, Relationship, SellerKey};

    // Domain services
    pub use crate::domain::services::{domain_hash, keccak256, seller_key};

    // Engine
    pub use crate::domain::engine::{RegistryCommand, RegistryEngine};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::RegistryApi;
    pub use crate::ports::outbound::{NotificationSink, StateCommitter};

    // Events
    pub use crate::events::{
        topics, PublisherRef, SellerLookupRequest, SellerLookupResponse, TransitionReceipt,
    };

    // Errors
    pub use crate::errors::{CommitError, RegistryError, RestoreError, ServiceError};

    // Adapters
    pub use crate::adapters::{
        BusNotificationSink, CommittedHead, InMemoryCommitter, RecordingSink,
        RegistryEventHandler,
    };

    // Service
    pub use crate::service::{RegistryService, ServiceConfig, ServiceStats};

    // Shared
    pub use shared_types::{LedgerEnvelope, RegistryNotification};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name.
pub const NAME: &str = "seller-registry";

// =============================================================================
// TESTS
// =============================================================================
