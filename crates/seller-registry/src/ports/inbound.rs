//! # Driving Ports (API - Inbound)
//!
//! The public API of the registry. The host ledger drives the mutating
//! half in its total order; anyone may call the query half.

use crate::domain::entities::{SellerRecord, Transition};
use crate::domain::engine::RegistryCommand;
use crate::domain::value_objects::{Identity, Relationship};
use crate::errors::ServiceError;
use async_trait::async_trait;
use shared_types::LedgerEnvelope;

/// Primary registry API.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    // === Mutations (serialized) ===

    /// Upsert a publisher. Administrator only.
    async fn register_publisher(
        &self,
        caller: Identity,
        identity: Identity,
        domain: String,
        name: String,
    ) -> Result<Transition, ServiceError>;

    /// Remove a publisher. Administrator only.
    async fn deregister_publisher(
        &self,
        caller: Identity,
        identity: Identity,
    ) -> Result<Transition, ServiceError>;

    /// Authorize a seller on the caller's behalf.
    async fn add_seller(
        &self,
        caller: Identity,
        seller_domain: String,
        seller_id: String,
        relationship: Relationship,
        tag_id: String,
    ) -> Result<Transition, ServiceError>;

    /// Revoke a seller on the caller's behalf.
    async fn remove_seller(
        &self,
        caller: Identity,
        seller_domain: String,
        seller_id: String,
    ) -> Result<Transition, ServiceError>;

    /// Apply a ledger-sequenced command.
    async fn submit(
        &self,
        envelope: LedgerEnvelope<RegistryCommand>,
    ) -> Result<Transition, ServiceError>;

    // === Queries (snapshot, lock-free for writers) ===

    /// Is `identity` a registered publisher?
    fn is_registered_publisher(&self, identity: &Identity) -> bool;

    /// Is `domain` claimed in the domain index?
    fn is_registered_publisher_domain(&self, domain: &str) -> bool;

    /// Seller record under a publisher identity (default if absent).
    fn get_seller_for_publisher(
        &self,
        identity: &Identity,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord;

    /// Seller record under the publisher owning `publisher_domain`.
    fn get_seller_for_publisher_domain(
        &self,
        publisher_domain: &str,
        seller_domain: &str,
        seller_id: &str,
    ) -> SellerRecord;
}
