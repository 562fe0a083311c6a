//! # Value Objects
//!
//! Immutable domain primitives for the registry.
//! `Identity`, `Hash` and `Relationship` live in `shared-types` because they
//! cross crate boundaries; this module names the registry-specific roles.

pub use shared_types::{Hash, Identity, Relationship};

/// `hash(domain)`: key of the domain index.
pub type DomainHash = Hash;

/// `hash(seller_domain, seller_id)`: key of a seller record under a publisher.
pub type SellerKey = Hash;
